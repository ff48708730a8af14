use async_trait::async_trait;

use crate::domain::{ChatLog, CompletionParams, DomainError};

/// Sends a conversation to a language model and returns the assistant's reply.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. `Ok(None)` means the provider answered but the message content was
/// null; transport and protocol failures are errors.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatLog],
        params: &CompletionParams,
    ) -> Result<Option<String>, DomainError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &str;
}
