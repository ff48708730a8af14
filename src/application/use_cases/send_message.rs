use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::ChatRepository;
use crate::domain::{ChatLog, DomainError, MessageInput};

/// Which conversation a submitted message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatTarget {
    /// Start a new conversation.
    #[default]
    New,
    /// Continue the conversation with this id.
    Existing(String),
    /// Continue the last stored conversation, or start one if none exists.
    Last,
}

/// Outcome of one submitted message: the conversation it landed in and the
/// full log including the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub chat_id: String,
    pub chat_log_list: Vec<ChatLog>,
}

impl ChatTurn {
    pub fn answer(&self) -> Option<&str> {
        self.chat_log_list.last().and_then(|log| log.content())
    }
}

/// Validate → create/update → get answer.
///
/// The user turn is persisted before the completion request is made, so a
/// failed request leaves the question stored without an answer.
pub struct SendMessageUseCase {
    chat_repo: Arc<ChatRepository>,
}

impl SendMessageUseCase {
    pub fn new(chat_repo: Arc<ChatRepository>) -> Self {
        Self { chat_repo }
    }

    pub async fn execute(&self, text: &str, target: ChatTarget) -> Result<ChatTurn, DomainError> {
        let input = MessageInput::parse(text)?;
        debug!("Accepted message input ({} bytes)", input.as_str().len());

        let start_time = Instant::now();

        let chat = match self.resolve_target(target).await? {
            Some(id) => self.chat_repo.update_chat(input.as_str(), &id).await?,
            None => {
                let id = self.chat_repo.create_chat(input.as_str()).await?;
                self.chat_repo
                    .find(&id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(format!("Chat not found: {}", id)))?
            }
        };

        let chat_log_list = self
            .chat_repo
            .get_answer(chat.chat_log_list(), chat.id())
            .await?;

        info!(
            "Chat {} answered in {:.2?} ({} turns)",
            chat.id(),
            start_time.elapsed(),
            chat_log_list.len()
        );

        Ok(ChatTurn {
            chat_id: chat.id().to_string(),
            chat_log_list,
        })
    }

    async fn resolve_target(&self, target: ChatTarget) -> Result<Option<String>, DomainError> {
        match target {
            ChatTarget::New => Ok(None),
            ChatTarget::Existing(id) => Ok(Some(id)),
            ChatTarget::Last => Ok(self
                .chat_repo
                .last_chat()
                .await?
                .map(|chat| chat.id().to_string())),
        }
    }
}
