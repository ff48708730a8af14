use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use chatlog::{Chat, ChatTarget, Container, ContainerConfig, DomainError, SendMessageUseCase};

mod cli;

use cli::Commands;

#[derive(Parser)]
#[command(name = "chatlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.chatlog")]
    data_dir: String,

    #[arg(long, global = true)]
    mock_completions: bool,

    #[arg(long, global = true)]
    memory_storage: bool,

    /// Completion model (defaults to OPENAI_MODEL, then gpt-3.5-turbo)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);

    // Read-only commands never call the completion API, so they need no key.
    let needs_completions = matches!(cli.command, Commands::Ask { .. } | Commands::Chat { .. });

    let container = Container::new(ContainerConfig {
        data_dir,
        mock_completions: cli.mock_completions || !needs_completions,
        memory_storage: cli.memory_storage,
        model: cli.model,
    })?;

    match cli.command {
        Commands::Ask { message, target } => {
            let use_case = container.send_message_use_case();
            let turn = use_case.execute(&message, target.into_target()).await?;
            println!("{}", turn.answer().unwrap_or_default());
            println!();
            println!("(chat {})", turn.chat_id);
        }

        Commands::Chat { target } => {
            let use_case = container.send_message_use_case();
            run_chat_loop(&use_case, target.into_target()).await?;
        }

        Commands::List => {
            let chats = container.list_use_case().execute().await?;

            if chats.is_empty() {
                println!("No chats stored.");
            } else {
                println!("Stored chats:\n");
                for chat in chats {
                    let title = chat.first_user_message().unwrap_or("(no user message)");
                    println!("  {} ({} turns)", chat.id(), chat.len());
                    println!("    {}", preview(title, 60));
                }
            }
        }

        Commands::Show { id } => {
            let chat = container.list_use_case().get_by_id(&id).await?;
            print_chat(&chat);
        }

        Commands::Last => match container.list_use_case().get_last().await? {
            Some(chat) => print_chat(&chat),
            None => println!("No chats stored."),
        },
    }

    if !container.memory_storage() {
        info!("Chats stored in {}", container.data_dir());
    }

    Ok(())
}

async fn run_chat_loop(use_case: &SendMessageUseCase, mut target: ChatTarget) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.is_empty() {
            break;
        }

        match use_case.execute(&line, target.clone()).await {
            Ok(turn) => {
                println!("{}\n", turn.answer().unwrap_or_default());
                target = ChatTarget::Existing(turn.chat_id);
            }
            Err(DomainError::InvalidInput(msg)) => {
                println!("{}", msg);
            }
            Err(e) if e.is_completion_failure() => {
                eprintln!("No answer: {}", e);
                // The question was stored; keep appending to the chat it created.
                if target == ChatTarget::New {
                    target = ChatTarget::Last;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn print_chat(chat: &Chat) {
    println!("Chat {}\n", chat.id());
    for log in chat.chat_log_list() {
        println!("[{}] {}", log.role(), log.content().unwrap_or("(no content)"));
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > max_chars {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn chat_and_last_conflict() {
        let res = Cli::try_parse_from(["chatlog", "ask", "hello", "--chat", "abc", "--last"]);
        assert!(res.is_err(), "--chat and --last should be mutually exclusive");
    }

    #[test]
    fn ask_defaults_to_new_chat() {
        let cli = Cli::try_parse_from(["chatlog", "--mock-completions", "ask", "hello"]).unwrap();
        assert!(cli.mock_completions);
        match cli.command {
            Commands::Ask { message, target } => {
                assert_eq!(message, "hello");
                assert_eq!(target.into_target(), ChatTarget::New);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn every_subcommand_has_help_text() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        for name in ["ask", "chat", "list", "show", "last"] {
            let sub = cmd.find_subcommand(name).expect("subcommand exists");
            assert!(sub.get_about().is_some(), "{name} has no about text");
        }
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("안녕하세요", 2), "안녕...");
        assert_eq!(preview("short\nsecond line", 60), "short");
    }
}
