use crate::career::export_to_dir;
use crate::cli::HistoryCommand;
use crate::commands::{format_timestamp, open_history_store, truncate};
use crate::config::Config;
use crate::error::{CareerError, Result};
use colored::Colorize;
use prettytable::{format, Table};
use std::path::PathBuf;

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = open_history_store(config)?;

    match command {
        HistoryCommand::List { user } => {
            let items = store.list_for_user(&user)?;

            if items.is_empty() {
                println!("{}", format!("No saved history for {}.", user).yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Kind".bold(),
                "Query".bold(),
                "Saved".bold()
            ]);

            for item in items {
                table.add_row(prettytable::row![
                    item.id.cyan(),
                    item.kind,
                    truncate(&item.query, 40),
                    format_timestamp(item.timestamp)
                ]);
            }

            println!("\nSaved History:");
            table.printstd();
            println!();
            println!(
                "Use {} to write one to a document.",
                "careerchat history export <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Delete { id } => {
            if store.delete(&id)? {
                println!("{}", format!("Deleted history item {}", id).green());
            } else {
                println!("{}", format!("No history item {}", id).yellow());
            }
        }
        HistoryCommand::Export { id, out } => {
            let item = store
                .get(&id)?
                .ok_or_else(|| CareerError::HistoryNotFound(id.clone()))?;
            let dir = out.unwrap_or_else(|| PathBuf::from(&config.history.export_dir));
            let path = export_to_dir(&item, &dir)?;
            println!("{}", format!("Exported to {}", path.display()).green());
        }
    }

    Ok(())
}
