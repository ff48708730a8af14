mod list_chats;
mod send_message;

pub use list_chats::*;
pub use send_message::*;
