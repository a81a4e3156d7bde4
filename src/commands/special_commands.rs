//! Slash commands for the interactive chat
//!
//! Lines starting with `/` manage sessions instead of being sent to the
//! assistant. The command word is case-insensitive; arguments keep their
//! case so session ids and titles survive intact. Bare `exit` and `quit`
//! also leave the chat.

use thiserror::Error;

/// Errors that can occur when parsing slash commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands that act on the session list rather than the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new empty session and make it active
    NewSession,

    /// Show all sessions
    ListSessions,

    /// Make another session active
    Switch(String),

    /// Rename a session; an empty title restores the derived title
    Rename { id: String, title: String },

    /// Delete a session
    Delete(String),

    /// Remove all messages from the active session
    Clear,

    /// Show the active session's transcript
    History,

    /// Display help information
    Help,

    /// Leave the chat
    Exit,

    /// Not a command; send the line to the assistant
    None,
}

/// Parse a line of chat input
///
/// # Examples
///
/// ```
/// use careerchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(
///     parse_special_command("/switch 01HZX").unwrap(),
///     SpecialCommand::Switch("01HZX".to_string())
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return match trimmed.to_lowercase().as_str() {
            "exit" | "quit" => Ok(SpecialCommand::Exit),
            _ => Ok(SpecialCommand::None),
        };
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    let word = word.to_lowercase();

    match word.as_str() {
        "/new" => no_argument(&word, rest, SpecialCommand::NewSession),
        "/list" | "/sessions" => no_argument(&word, rest, SpecialCommand::ListSessions),
        "/clear" => no_argument(&word, rest, SpecialCommand::Clear),
        "/history" => no_argument(&word, rest, SpecialCommand::History),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        "/switch" => single_id(&word, rest, "/switch <id>").map(SpecialCommand::Switch),
        "/delete" => single_id(&word, rest, "/delete <id>").map(SpecialCommand::Delete),

        "/rename" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: word,
                    usage: "/rename <id> [title]".to_string(),
                });
            }
            let (id, title) = match rest.split_once(char::is_whitespace) {
                Some((id, title)) => (id, title.trim()),
                None => (rest, ""),
            };
            Ok(SpecialCommand::Rename {
                id: id.to_string(),
                title: title.to_string(),
            })
        }

        _ => Err(CommandError::UnknownCommand(word)),
    }
}

fn no_argument(
    command: &str,
    rest: &str,
    parsed: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: rest.to_string(),
        })
    }
}

fn single_id(command: &str, rest: &str, usage: &str) -> Result<String, CommandError> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (None, _) => Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        }),
        (Some(id), None) => Ok(id.to_string()),
        (Some(_), Some(extra)) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: extra.to_string(),
        }),
    }
}

/// Display help for the interactive chat
pub fn print_help() {
    println!(
        r#"
Chat Commands
=============

SESSIONS:
  /new                 - Start a new chat session
  /list                - List sessions (* marks the active one)
  /switch <id>         - Switch to another session (unique id prefix is enough)
  /rename <id> [title] - Rename a session; omit the title to restore the default
  /delete <id>         - Delete a session
  /clear               - Remove all messages from the active session
  /history             - Show the active session's transcript

OTHER:
  /help                - Show this help message
  /exit, /quit, exit   - Leave the chat

Anything else is sent to the career assistant.
"#
    );
}
