mod chat;
mod completion;
mod message_input;

pub use chat::*;
pub use completion::*;
pub use message_input::*;
