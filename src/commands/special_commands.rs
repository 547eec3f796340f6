//! Special commands parser for interactive chat mode
//!
//! Special commands let the user manage conversations without leaving the
//! session:
//! - Start a new conversation
//! - List and select conversations
//! - Dismiss the error banner
//! - View session status and help
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything else
//! is sent to the answering service as a question.

use crate::conversation::{ConversationId, ConversationStore};
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command was given an argument it does not take
    #[error("Command {command} does not take an argument: {arg}")]
    UnexpectedArgument { command: String, arg: String },
}

/// Which conversation a `/select` refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based position in the conversation list
    Index(usize),
    /// Conversation id
    Id(ConversationId),
}

impl Selector {
    /// Resolve to a conversation id against the current snapshot
    ///
    /// Ids are returned as given, known or not; positions outside the list
    /// resolve to `None`.
    pub fn resolve(&self, store: &ConversationStore) -> Option<ConversationId> {
        match self {
            Self::Index(position) => position
                .checked_sub(1)
                .and_then(|i| store.conversations().get(i))
                .map(|c| c.id.clone()),
            Self::Id(id) => Some(id.clone()),
        }
    }
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new conversation and make it active
    NewConversation,

    /// Show all conversations with their message counts
    ListConversations,

    /// Switch the active conversation
    Select(Selector),

    /// Hide the error banner
    DismissError,

    /// Display session status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; the input is a question
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognised `/` commands,
/// `CommandError::MissingArgument` for `/select` without a target, and
/// `CommandError::UnexpectedArgument` when a bare command gets arguments.
///
/// # Examples
///
/// ```
/// use medai::commands::special_commands::{parse_special_command, Selector, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewConversation);
/// assert_eq!(
///     parse_special_command("/select 2").unwrap(),
///     SpecialCommand::Select(Selector::Index(2))
/// );
/// assert_eq!(
///     parse_special_command("What is acne?").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();

    if !trimmed.starts_with('/')
        && !trimmed.eq_ignore_ascii_case("exit")
        && !trimmed.eq_ignore_ascii_case("quit")
    {
        return Ok(SpecialCommand::None);
    }

    let (head, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let command = head.to_lowercase();
    let command = command.as_str();

    let bare = |result: SpecialCommand| {
        if arg.is_empty() {
            Ok(result)
        } else {
            Err(CommandError::UnexpectedArgument {
                command: command.to_string(),
                arg: arg.to_string(),
            })
        }
    };

    match command {
        "/new" => bare(SpecialCommand::NewConversation),
        "/list" | "/chats" => bare(SpecialCommand::ListConversations),
        "/dismiss" => bare(SpecialCommand::DismissError),
        "/status" => bare(SpecialCommand::ShowStatus),
        "/help" | "/?" => bare(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => bare(SpecialCommand::Exit),
        "/select" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/select".to_string(),
                    usage: "/select <#|conversation-id>".to_string(),
                });
            }
            let selector = match arg.parse::<usize>() {
                Ok(position) => Selector::Index(position),
                Err(_) => Selector::Id(ConversationId::from(arg)),
            };
            Ok(SpecialCommand::Select(selector))
        }
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Print help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CONVERSATIONS:
  /new            - Start a new conversation
  /list           - List conversations with message counts
  /chats          - Same as /list
  /select <#>     - Switch to conversation number # from /list
  /select <id>    - Switch to a conversation by id

SESSION:
  /dismiss        - Hide the error banner
  /status         - Show session status
  /help           - Show this help message
  exit, quit      - Exit the session

Anything else is sent to the assistant as a question.
"#
    );
}
