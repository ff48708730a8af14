pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    ChatRepository, ChatTarget, ChatTurn, CompletionService, KeyValueStore, ListChatsUseCase,
    SendMessageUseCase, CHAT_LIST_KEY,
};

pub use connector::{
    Container, ContainerConfig, InMemoryStore, JsonFileStore, MockCompletion, MockReply,
    OpenAiClient,
};

pub use domain::{
    Chat, ChatLog, ChatLogRole, CompletionParams, DomainError, MessageInput, MAX_MESSAGE_CHARS,
    MIN_MESSAGE_CHARS,
};
