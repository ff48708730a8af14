//! Storage implementations for persistence.

mod json_file_store;
mod memory;

pub use json_file_store::*;
pub use memory::*;
