//! # Domain Layer
//!
//! Conversation models, input validation, and the crate-wide error type.
//! This layer is independent of storage backends and HTTP clients.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
