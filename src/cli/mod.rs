//! CLI module for gptchat.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Interactive commands typed at the prompt
//! - Incremental reply rendering
//!
//! # Usage
//!
//! ```ignore
//! use gptchat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Version => println!("{}", version_line()),
//!     CliCommand::Chat(args) => run_chat(args).await?,
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod render;
pub mod version;

pub use args::{parse_args, ChatArgs, CliCommand, USAGE};
pub use render::{print_history, Renderer};
pub use version::{version_line, VERSION};

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Send this text
    Prompt(String),
    Clear,
    History,
    Exit,
    /// Blank line
    Empty,
    /// A `/command` that does not exist
    Unknown(String),
}

/// Interpret one input line.
pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    match line {
        "" => ReplCommand::Empty,
        "/clear" => ReplCommand::Clear,
        "/history" => ReplCommand::History,
        "/exit" | "/quit" => ReplCommand::Exit,
        cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) => {
            ReplCommand::Unknown(cmd.to_string())
        }
        text => ReplCommand::Prompt(text.to_string()),
    }
}
