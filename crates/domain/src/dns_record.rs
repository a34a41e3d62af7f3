pub mod record;
pub mod record_type;

pub use record::{ResourceRecord, CLASS_IN};
pub use record_type::RecordType;
