use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::application::{
    ChatRepository, CompletionService, KeyValueStore, ListChatsUseCase, SendMessageUseCase,
};
use crate::connector::{InMemoryStore, JsonFileStore, MockCompletion, OpenAiClient};
use crate::domain::CompletionParams;

pub struct ContainerConfig {
    pub data_dir: String,
    /// Answer locally instead of calling the completion API.
    pub mock_completions: bool,
    /// Keep chats in memory only; nothing is written under `data_dir`.
    pub memory_storage: bool,
    /// Model override. Falls back to `OPENAI_MODEL`, then the built-in default.
    pub model: Option<String>,
}

/// Wires storage, the completion client, and the repository together.
pub struct Container {
    chat_repo: Arc<ChatRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if config.memory_storage {
            debug!("Using in-memory chat storage");
            Arc::new(InMemoryStore::new())
        } else {
            let dir = PathBuf::from(&config.data_dir);
            debug!("Using JSON file storage at {}", dir.display());
            Arc::new(JsonFileStore::new(dir))
        };

        let completion_service: Arc<dyn CompletionService> = if config.mock_completions {
            debug!("Using mock completion service");
            Arc::new(MockCompletion::new())
        } else {
            let client = OpenAiClient::from_env().ok_or_else(|| {
                anyhow!("OPENAI_API_KEY is not set. Export it, or pass --mock-completions to chat offline.")
            })?;
            debug!("Using OpenAI completion service at {}", client.url());
            Arc::new(client)
        };

        let params = match config.model.clone().or_else(OpenAiClient::model_from_env) {
            Some(model) => CompletionParams::new(model),
            None => CompletionParams::default(),
        };

        let chat_repo = Arc::new(ChatRepository::new(store, completion_service).with_params(params));

        Ok(Self { chat_repo, config })
    }

    pub fn chat_repository(&self) -> Arc<ChatRepository> {
        self.chat_repo.clone()
    }

    pub fn send_message_use_case(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.chat_repo.clone())
    }

    pub fn list_use_case(&self) -> ListChatsUseCase {
        ListChatsUseCase::new(self.chat_repo.clone())
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}
