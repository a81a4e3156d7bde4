use crate::chat::{ChatSession, Role};
use crate::cli::SessionCommand;
use crate::commands::{format_timestamp, open_session_store, resolve_session_id, truncate};
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle `sessions` subcommands
pub fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let mut store = open_session_store(config)?;

    match command {
        SessionCommand::List => {
            print_session_table(store.sessions(), store.active_id());
        }
        SessionCommand::Show { id } => {
            let id = resolve_session_id(store.sessions(), &id)?;
            if let Some(session) = store.session(&id) {
                print_session(session);
            }
        }
        SessionCommand::Rename { id, title } => {
            let id = resolve_session_id(store.sessions(), &id)?;
            store.rename_session(&id, &title)?;
            let new_title = store.session(&id).map(|s| s.title.clone()).unwrap_or_default();
            println!("{}", format!("Renamed {} to \"{}\"", id, new_title).green());
        }
        SessionCommand::Delete { id } => {
            let id = resolve_session_id(store.sessions(), &id)?;
            store.delete_session(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}

/// Print sessions as a table, marking the active one
pub fn print_session_table(sessions: &[ChatSession], active_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No chat sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Last Updated".bold()
    ]);

    for session in sessions {
        let marker = if Some(session.id.as_str()) == active_id {
            "*".green().bold()
        } else {
            "".normal()
        };

        table.add_row(prettytable::row![
            marker,
            session.id.cyan(),
            truncate(&session.title, 40),
            session.messages.len(),
            format_timestamp(session.updated_at)
        ]);
    }

    println!("\nChat Sessions:");
    table.printstd();
    println!();
}

fn print_session(session: &ChatSession) {
    println!("\n{} ({})", session.title.bold(), session.id.cyan());
    println!(
        "Created {}, updated {}\n",
        format_timestamp(session.created_at),
        format_timestamp(session.updated_at)
    );

    if session.messages.is_empty() {
        println!("{}", "(no messages)".dimmed());
        return;
    }

    for message in &session.messages {
        let speaker = match message.role {
            Role::User => "You".cyan().bold(),
            Role::Assistant => "Assistant".green().bold(),
        };
        println!("[{}] {}: {}\n", format_timestamp(message.timestamp), speaker, message.content);
    }
}
