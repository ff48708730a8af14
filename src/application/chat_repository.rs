use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::{CompletionService, KeyValueStore};
use crate::domain::{Chat, ChatLog, CompletionParams, DomainError};

/// Storage key holding the serialized chat collection.
pub const CHAT_LIST_KEY: &str = "chatList";

/// Sole owner of persisted conversation state and the single point of contact
/// with the completion service.
///
/// The whole collection is read from the store on every call and written back
/// in full on every mutation; there is no cache. Two repositories sharing a
/// store therefore see each other's writes, and concurrent writers race with
/// last-write-wins semantics.
pub struct ChatRepository {
    store: Arc<dyn KeyValueStore>,
    completion_service: Arc<dyn CompletionService>,
    params: CompletionParams,
    storage_key: String,
}

impl ChatRepository {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        completion_service: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            store,
            completion_service,
            params: CompletionParams::default(),
            storage_key: CHAT_LIST_KEY.to_string(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    /// All persisted chats in stored order. An absent or blank slot is an
    /// empty collection.
    pub async fn list(&self) -> Result<Vec<Chat>, DomainError> {
        match self.store.get(&self.storage_key).await? {
            Some(blob) if !blob.trim().is_empty() => serde_json::from_str(&blob).map_err(|e| {
                DomainError::serialization(format!(
                    "stored chat list under '{}' is malformed: {e}",
                    self.storage_key
                ))
            }),
            _ => Ok(Vec::new()),
        }
    }

    /// The last chat in stored order. Persisted state is never touched.
    pub async fn last_chat(&self) -> Result<Option<Chat>, DomainError> {
        Ok(self.list().await?.pop())
    }

    /// The first chat whose id matches.
    pub async fn find(&self, id: &str) -> Result<Option<Chat>, DomainError> {
        Ok(self.list().await?.into_iter().find(|chat| chat.id() == id))
    }

    /// Upsert: replaces a chat with the same id in place, otherwise appends.
    pub async fn save(&self, chat: &Chat) -> Result<(), DomainError> {
        let mut chats = self.list().await?;

        let mut replaced = false;
        for existing in chats.iter_mut().filter(|c| c.id() == chat.id()) {
            *existing = chat.clone();
            replaced = true;
        }
        if !replaced {
            chats.push(chat.clone());
        }

        let blob = serde_json::to_string(&chats)?;
        self.store.set(&self.storage_key, &blob).await?;

        debug!(
            "Saved chat {} ({} turns, {}); collection size {}",
            chat.id(),
            chat.len(),
            if replaced { "replaced" } else { "appended" },
            chats.len()
        );
        Ok(())
    }

    /// Starts a conversation with a single user turn and returns its new id.
    pub async fn create_chat(&self, content: &str) -> Result<String, DomainError> {
        let chat = Chat::start(content);
        self.save(&chat).await?;
        info!("Created chat {}", chat.id());
        Ok(chat.id().to_string())
    }

    /// Appends a user turn to an existing chat and returns the updated chat.
    pub async fn update_chat(&self, content: &str, id: &str) -> Result<Chat, DomainError> {
        let chat = self
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Chat not found: {}", id)))?
            .with_log(ChatLog::user(content));

        self.save(&chat).await?;
        Ok(chat)
    }

    /// Sends `chat_log_list` as context, appends the assistant reply, persists
    /// the result as chat `id`, and returns the extended log.
    ///
    /// Nothing is persisted when the completion fails or comes back null.
    pub async fn get_answer(
        &self,
        chat_log_list: &[ChatLog],
        id: &str,
    ) -> Result<Vec<ChatLog>, DomainError> {
        debug!(
            "Requesting completion for chat {} ({} turns) from {} using {}",
            id,
            chat_log_list.len(),
            self.completion_service.provider_name(),
            self.params.model()
        );

        let content = self
            .completion_service
            .complete(chat_log_list, &self.params)
            .await?
            .ok_or_else(|| DomainError::invalid_response("completion returned null content"))?;

        let mut answered = chat_log_list.to_vec();
        answered.push(ChatLog::assistant(content));

        let chat = Chat::reconstitute(id, answered);
        self.save(&chat).await?;

        Ok(chat.into_chat_log_list())
    }

    /// Like [`Self::get_answer`], but any failure is logged and reported as an
    /// empty log.
    pub async fn answer_or_empty(&self, chat_log_list: &[ChatLog], id: &str) -> Vec<ChatLog> {
        match self.get_answer(chat_log_list, id).await {
            Ok(log) => log,
            Err(e) => {
                error!("Failed to get an answer for chat {}: {}", id, e);
                Vec::new()
            }
        }
    }
}
