pub mod rdata;
pub mod reader;
pub mod response;
pub mod writer;

pub use rdata::{rdata_from_text, rdata_to_text};
pub use reader::{
    decode_answer, decode_header, decode_message, decode_name, decode_question, HEADER_LEN,
};
pub use response::{
    build_answer_response, build_error_response, client_payload_limit, encode_response,
    BASE_UDP_PAYLOAD,
};
pub use writer::{encode_message, encode_name, write_name};
