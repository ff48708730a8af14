use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CompletionService;
use crate::domain::{ChatLog, ChatLogRole, CompletionParams, DomainError};

/// One scripted outcome for [`MockCompletion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Content(String),
    /// Provider answered with a null message.
    Null,
    /// Provider could not be reached.
    Unavailable(String),
}

/// Offline completion service.
///
/// Scripted replies are consumed in order; once the script runs out the mock
/// echoes the last user turn. Every request is recorded for inspection.
pub struct MockCompletion {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<Vec<ChatLog>>>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answering(content: impl Into<String>) -> Self {
        Self::with_replies([MockReply::Content(content.into())])
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_replies([MockReply::Unavailable(reason.into())])
    }

    /// Conversations received so far, oldest first.
    pub async fn requests(&self) -> Vec<Vec<ChatLog>> {
        self.requests.lock().await.clone()
    }

    fn echo(messages: &[ChatLog]) -> String {
        let question = messages
            .iter()
            .rev()
            .find(|log| log.role() == ChatLogRole::User)
            .and_then(|log| log.content())
            .unwrap_or_default();
        format!("echo: {question}")
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(
        &self,
        messages: &[ChatLog],
        params: &CompletionParams,
    ) -> Result<Option<String>, DomainError> {
        self.requests.lock().await.push(messages.to_vec());

        let reply = self.script.lock().await.pop_front();
        debug!(
            "MockCompletion: {} turns for model {} -> {:?}",
            messages.len(),
            params.model(),
            reply
        );

        match reply {
            Some(MockReply::Content(content)) => Ok(Some(content)),
            Some(MockReply::Null) => Ok(None),
            Some(MockReply::Unavailable(reason)) => Err(DomainError::service_unavailable(reason)),
            None => Ok(Some(Self::echo(messages))),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_is_consumed_then_echoes() {
        let mock = MockCompletion::with_replies([MockReply::Content("first".into()), MockReply::Null]);
        let params = CompletionParams::default();
        let log = vec![ChatLog::user("ping")];

        assert_eq!(mock.complete(&log, &params).await.unwrap().as_deref(), Some("first"));
        assert_eq!(mock.complete(&log, &params).await.unwrap(), None);
        assert_eq!(
            mock.complete(&log, &params).await.unwrap().as_deref(),
            Some("echo: ping")
        );
        assert_eq!(mock.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn failing_reports_service_unavailable() {
        let mock = MockCompletion::failing("offline");
        let err = mock
            .complete(&[ChatLog::user("hi")], &CompletionParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ServiceUnavailable(_)));
    }
}
