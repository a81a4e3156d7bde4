/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`    : Interactive multi-session chat
- `sessions`: Inspect and manage saved chat sessions
- `career`  : Roadmap generation and keyword extraction
- `history` : Saved career artifacts

Handlers are thin: they open the configured stores, call the library and
print the result.
*/

use crate::chat::{ChatSession, ChatSessionStore};
use crate::config::Config;
use crate::error::{CareerError, Result};
use crate::storage::{FileKeyValueStore, SqliteHistoryStore};

// Slash commands for the interactive chat
pub mod special_commands;

// Session management commands
pub mod sessions;

// Roadmap and keyword commands
pub mod career;

// Artifact history commands
pub mod history;

/// Open the chat session store at the configured state path
pub fn open_session_store(config: &Config) -> Result<ChatSessionStore> {
    let path = config.chat.resolve_state_path()?;
    tracing::debug!("Opening chat state at {}", path.display());
    let storage = FileKeyValueStore::open(path)?;
    Ok(ChatSessionStore::load(Box::new(storage)).with_title_max_chars(config.chat.title_max_chars))
}

/// Open the artifact history database
pub fn open_history_store(config: &Config) -> Result<SqliteHistoryStore> {
    match &config.history.db_path {
        Some(path) => SqliteHistoryStore::new_with_path(path),
        None => SqliteHistoryStore::new(),
    }
}

/// Resolve a session id typed by the user
///
/// An exact id wins; otherwise a prefix matching exactly one session is
/// accepted.
///
/// # Errors
///
/// Returns [`CareerError::SessionNotFound`] when nothing matches and
/// [`CareerError::InvalidInput`] when the prefix is ambiguous.
pub fn resolve_session_id(sessions: &[ChatSession], input: &str) -> Result<String> {
    let input = input.trim();
    if let Some(session) = sessions.iter().find(|s| s.id == input) {
        return Ok(session.id.clone());
    }

    let upper = input.to_uppercase();
    let mut matches = sessions
        .iter()
        .filter(|s| !upper.is_empty() && s.id.to_uppercase().starts_with(&upper));

    match (matches.next(), matches.next()) {
        (Some(session), None) => Ok(session.id.clone()),
        (Some(_), Some(_)) => Err(CareerError::InvalidInput(format!(
            "Session id prefix '{}' is ambiguous",
            input
        ))
        .into()),
        (None, _) => Err(CareerError::SessionNotFound(input.to_string()).into()),
    }
}

/// Format a millisecond timestamp for tables
pub(crate) fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Shorten `text` to `max` characters for table cells
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Creates the provider and the chat service, then runs a readline loop.
    //! Plain lines go to the assistant; slash commands manage sessions.

    use super::*;
    use crate::chat::{ChatService, Rejection, Role, SendOutcome};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::providers::create_provider;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive chat
    ///
    /// Resumes the last active session, or starts a new one when there is
    /// none.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let provider = create_provider(&config.provider)?;
        let service = ChatService::new(open_session_store(&config)?, provider);

        if service.active_id()?.is_none() {
            service.create_session()?;
        }

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(&service)?;

        loop {
            let prompt = format!("{} ", ">>".cyan().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => send(&service, trimmed).await,
                        Ok(SpecialCommand::Exit) => break,
                        Ok(command) => {
                            if let Err(e) = handle_command(&service, command) {
                                eprintln!("{}\n", format!("Error: {}", e).red());
                            }
                        }
                        Err(e) => eprintln!("{}\n", e.to_string().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn send(service: &ChatService, text: &str) {
        println!("{}", "Thinking...".dimmed());
        match service.send_message(text).await {
            Ok(SendOutcome::Replied { message, .. }) => println!("\n{}\n", message.content),
            Ok(SendOutcome::Discarded { session_id }) => println!(
                "{}\n",
                format!("Session {} was deleted; reply discarded", session_id).yellow()
            ),
            Ok(SendOutcome::Ignored(Rejection::NoActiveSession)) => println!(
                "{}\n",
                "No active session. Type /new to start one.".yellow()
            ),
            Ok(SendOutcome::Ignored(reason)) => println!("{}\n", reason.to_string().yellow()),
            Err(e) => {
                let retry = e
                    .downcast_ref::<CareerError>()
                    .is_some_and(CareerError::is_retryable);
                eprintln!("{}", format!("Error: {}", e).red());
                if retry {
                    eprintln!("Your message was kept. Send it again to retry.");
                }
                eprintln!();
            }
        }
    }

    fn handle_command(service: &ChatService, command: SpecialCommand) -> Result<()> {
        match command {
            SpecialCommand::NewSession => {
                let id = service.create_session()?;
                println!("{}\n", format!("Started new session {}", id).green());
            }
            SpecialCommand::ListSessions => {
                let sessions = service.sessions()?;
                let active = service.active_id()?;
                super::sessions::print_session_table(&sessions, active.as_deref());
            }
            SpecialCommand::Switch(input) => {
                let id = resolve_session_id(&service.sessions()?, &input)?;
                service.switch_session(&id)?;
                print_transcript(service)?;
            }
            SpecialCommand::Rename { id, title } => {
                let id = resolve_session_id(&service.sessions()?, &id)?;
                service.rename_session(&id, &title)?;
                println!("{}\n", "Session renamed".green());
            }
            SpecialCommand::Delete(input) => {
                let id = resolve_session_id(&service.sessions()?, &input)?;
                service.delete_session(&id)?;
                println!("{}", format!("Deleted session {}", id).green());
                match service.active_id()? {
                    Some(active) => println!("Active session: {}\n", active),
                    None => println!("No sessions left. Type /new to start one.\n"),
                }
            }
            SpecialCommand::Clear => {
                service.clear_active_session()?;
                println!("{}\n", "Session cleared".green());
            }
            SpecialCommand::History => print_transcript(service)?,
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    fn print_transcript(service: &ChatService) -> Result<()> {
        let title = service.with_store(|store| store.active_session().map(|s| s.title.clone()))?;
        let Some(title) = title else {
            println!("No active session.\n");
            return Ok(());
        };

        println!("\n{}\n", title.bold());
        for message in service.active_messages()? {
            let speaker = match message.role {
                Role::User => "You".cyan().bold(),
                Role::Assistant => "Assistant".green().bold(),
            };
            println!("{}: {}\n", speaker, message.content);
        }
        Ok(())
    }

    fn print_welcome_banner(service: &ChatService) -> Result<()> {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              CareerChat - your career assistant              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let count = service.sessions()?.len();
        if let Some(id) = service.active_id()? {
            println!("Session: {} ({} saved)", id.cyan(), count);
        }
        println!("Type '/help' for available commands, 'exit' to quit\n");

        if !service.active_messages()?.is_empty() {
            print_transcript(service)?;
        }
        Ok(())
    }
}
