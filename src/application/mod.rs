//! # Application Layer
//!
//! The chat repository, the interfaces it depends on, and the use cases that
//! coordinate it with user input.

pub mod chat_repository;
pub mod interfaces;
pub mod use_cases;

pub use chat_repository::*;
pub use interfaces::*;
pub use use_cases::*;
