//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion (OpenAI-compatible HTTP client, offline mock)
//! - Storage (JSON file per key, in-memory)
//! - Container wiring for the binary

pub mod adapter;
pub mod container;
pub mod storage;

pub use adapter::*;
pub use container::*;
pub use storage::*;
