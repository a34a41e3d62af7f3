pub mod handle_client_request;
pub mod resolve_name;

pub use handle_client_request::HandleClientRequestUseCase;
pub use resolve_name::{AnswerSource, Resolution, ResolveNameUseCase};
