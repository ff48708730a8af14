use async_trait::async_trait;

use crate::domain::DomainError;

/// A single-slot-per-key string store, the persistence seam for chat history.
///
/// Adapters decide where the value lives (a file, memory). A missing key is
/// `Ok(None)`, never an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Replaces the whole value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
