mod completion_service;
mod key_value_store;

pub use completion_service::*;
pub use key_value_store::*;
