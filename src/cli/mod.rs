use clap::{Args, Subcommand};

use chatlog::ChatTarget;

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the answer
    Ask {
        message: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Read messages from stdin until an empty line or EOF
    Chat {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List stored chats
    List,

    /// Print one chat's log
    Show {
        /// Chat id
        id: String,
    },

    /// Print the most recent chat
    Last,
}

#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Continue the chat with this id
    #[arg(short, long, conflicts_with = "last")]
    pub chat: Option<String>,

    /// Continue the most recent chat
    #[arg(short, long)]
    pub last: bool,
}

impl TargetArgs {
    pub fn into_target(self) -> ChatTarget {
        match (self.chat, self.last) {
            (Some(id), _) => ChatTarget::Existing(id),
            (None, true) => ChatTarget::Last,
            (None, false) => ChatTarget::New,
        }
    }
}
