use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a given log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatLogRole {
    #[default]
    User,
    Assistant,
    System,
}

impl ChatLogRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatLogRole::User => "user",
            ChatLogRole::Assistant => "assistant",
            ChatLogRole::System => "system",
        }
    }
}

impl std::fmt::Display for ChatLogRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation.
///
/// `content` is `None` only when a provider answered with a null message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLog {
    role: ChatLogRole,
    content: Option<String>,
}

impl ChatLog {
    pub fn new(role: ChatLogRole, content: Option<String>) -> Self {
        Self { role, content }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatLogRole::User, Some(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatLogRole::Assistant, Some(content.into()))
    }

    pub fn role(&self) -> ChatLogRole {
        self.role
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A persisted conversation. Identity is the `id`; the log only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    id: String,
    chat_log_list: Vec<ChatLog>,
}

impl Chat {
    /// Starts a new conversation with a freshly minted id and a single user turn.
    pub fn start(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_log_list: vec![ChatLog::user(content)],
        }
    }

    /// Reconstitutes from persisted data or a caller-supplied log.
    pub fn reconstitute(id: impl Into<String>, chat_log_list: Vec<ChatLog>) -> Self {
        Self {
            id: id.into(),
            chat_log_list,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chat_log_list(&self) -> &[ChatLog] {
        &self.chat_log_list
    }

    pub fn into_chat_log_list(self) -> Vec<ChatLog> {
        self.chat_log_list
    }

    pub fn len(&self) -> usize {
        self.chat_log_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chat_log_list.is_empty()
    }

    pub fn with_log(mut self, log: ChatLog) -> Self {
        self.chat_log_list.push(log);
        self
    }

    /// The first user turn, used as a title in listings.
    pub fn first_user_message(&self) -> Option<&str> {
        self.chat_log_list
            .iter()
            .find(|log| log.role() == ChatLogRole::User)
            .and_then(|log| log.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_serializes_with_camel_case_keys() {
        let chat = Chat::reconstitute("abc", vec![ChatLog::user("hi")]);
        let json = serde_json::to_string(&chat).unwrap();
        assert_eq!(
            json,
            r#"{"id":"abc","chatLogList":[{"role":"user","content":"hi"}]}"#
        );
    }

    #[test]
    fn null_content_deserializes_to_none() {
        let json = r#"{"id":"x","chatLogList":[{"role":"assistant","content":null}]}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.chat_log_list()[0].role(), ChatLogRole::Assistant);
        assert_eq!(chat.chat_log_list()[0].content(), None);
    }

    #[test]
    fn start_mints_distinct_ids() {
        let a = Chat::start("one");
        let b = Chat::start("one");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.chat_log_list(), &[ChatLog::user("one")]);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let json = r#"{"role":"narrator","content":"hi"}"#;
        assert!(serde_json::from_str::<ChatLog>(json).is_err());
    }

    #[test]
    fn first_user_message_skips_system_turns() {
        let chat = Chat::reconstitute(
            "id",
            vec![
                ChatLog::new(ChatLogRole::System, Some("be brief".into())),
                ChatLog::user("question"),
            ],
        );
        assert_eq!(chat.first_user_message(), Some("question"));
    }
}
