pub mod file_provider;
pub mod node;
pub mod store;

pub use file_provider::ZoneFileProvider;
pub use node::ZoneNode;
pub use store::{ZoneStore, MAX_DELEGATION_DEPTH};
