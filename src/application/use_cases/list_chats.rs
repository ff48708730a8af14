use std::sync::Arc;

use crate::application::ChatRepository;
use crate::domain::{Chat, DomainError};

pub struct ListChatsUseCase {
    chat_repo: Arc<ChatRepository>,
}

impl ListChatsUseCase {
    pub fn new(chat_repo: Arc<ChatRepository>) -> Self {
        Self { chat_repo }
    }

    pub async fn execute(&self) -> Result<Vec<Chat>, DomainError> {
        self.chat_repo.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Chat, DomainError> {
        self.chat_repo
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Chat not found: {}", id)))
    }

    pub async fn get_last(&self) -> Result<Option<Chat>, DomainError> {
        self.chat_repo.last_chat().await
    }
}
