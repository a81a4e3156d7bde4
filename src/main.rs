//! careerchat - career guidance CLI
//!
#![doc = "careerchat - career guidance CLI"]
#![doc = "Main entry point for the careerchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careerchat::cli::{Cli, Commands};
use careerchat::commands;
use careerchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { provider } => {
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::debug!("Starting sessions command");
            commands::sessions::handle_sessions(&config, command)?;
            Ok(())
        }
        Commands::Roadmap { goal, user, save } => {
            tracing::debug!("Starting roadmap command");
            commands::career::run_roadmap(&config, &goal, &user, save).await?;
            Ok(())
        }
        Commands::Keywords {
            file,
            text,
            user,
            save,
        } => {
            tracing::debug!("Starting keywords command");
            commands::career::run_keywords(&config, file.as_deref(), text.as_deref(), &user, save)
                .await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::debug!("Starting history command");
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "careerchat=debug"
    } else {
        "careerchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
