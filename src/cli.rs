//! Command-line interface definition for careerchat
//!
//! This module defines the CLI structure using clap's derive API: the
//! interactive chat, session management, the career tools and the
//! artifact history.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// User id recorded on history artifacts when `--user` is omitted
pub const DEFAULT_USER: &str = "local";

/// careerchat - career guidance from the terminal
///
/// Chat with an AI career assistant across multiple saved sessions,
/// generate learning roadmaps and pull keywords out of job descriptions.
#[derive(Parser, Debug, Clone)]
#[command(name = "careerchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat session state file
    #[arg(long, global = true)]
    pub state_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for careerchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat with the career assistant
    Chat {
        /// Override the provider from config
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Manage saved chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Generate a learning roadmap for a career goal
    Roadmap {
        /// Career goal, e.g. "data engineer"
        goal: String,

        /// User the artifact is recorded for
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,

        /// Save the roadmap to history
        #[arg(short, long)]
        save: bool,
    },

    /// Extract keywords and skills from a job description
    #[command(group(ArgGroup::new("source").required(true).args(["file", "text"])))]
    Keywords {
        /// Read the job description from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Job description text
        #[arg(short, long)]
        text: Option<String>,

        /// User the artifact is recorded for
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,

        /// Save the extraction to history
        #[arg(short, long)]
        save: bool,
    },

    /// Browse saved roadmaps and keyword extractions
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// Chat session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, newest first
    List,

    /// Print a session transcript
    Show {
        /// Session id
        id: String,
    },

    /// Rename a session (an empty title restores the derived title)
    Rename {
        /// Session id
        id: String,

        /// New title
        title: String,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List a user's artifacts, newest first
    List {
        /// User id
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Delete an artifact
    Delete {
        /// Artifact id
        id: String,
    },

    /// Export an artifact to a Markdown document
    Export {
        /// Artifact id
        id: String,

        /// Output directory (defaults to history.export_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            state_path: None,
            command: Commands::Sessions {
                command: SessionCommand::List,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.state_path.is_none());
        assert!(matches!(
            cli.command,
            Commands::Sessions {
                command: SessionCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["careerchat", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { provider: None }));
    }

    #[test]
    fn test_cli_parse_global_state_path_after_subcommand() {
        let cli =
            Cli::try_parse_from(["careerchat", "sessions", "list", "--state-path", "s.json"])
                .unwrap();
        assert_eq!(cli.state_path, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_cli_parse_session_rename() {
        let cli = Cli::try_parse_from(["careerchat", "sessions", "rename", "abc", "Interview prep"])
            .unwrap();
        match cli.command {
            Commands::Sessions {
                command: SessionCommand::Rename { id, title },
            } => {
                assert_eq!(id, "abc");
                assert_eq!(title, "Interview prep");
            }
            other => panic!("Expected sessions rename, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_roadmap_defaults() {
        let cli = Cli::try_parse_from(["careerchat", "roadmap", "data engineer"]).unwrap();
        match cli.command {
            Commands::Roadmap { goal, user, save } => {
                assert_eq!(goal, "data engineer");
                assert_eq!(user, DEFAULT_USER);
                assert!(!save);
            }
            other => panic!("Expected roadmap, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_keywords_requires_a_source() {
        assert!(Cli::try_parse_from(["careerchat", "keywords"]).is_err());
        assert!(
            Cli::try_parse_from(["careerchat", "keywords", "--file", "jd.txt", "--text", "x"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["careerchat", "keywords", "--text", "Rust dev"]).is_ok());
    }

    #[test]
    fn test_cli_parse_history_export() {
        let cli =
            Cli::try_parse_from(["careerchat", "history", "export", "01H", "--out", "docs"])
                .unwrap();
        match cli.command {
            Commands::History {
                command: HistoryCommand::Export { id, out },
            } => {
                assert_eq!(id, "01H");
                assert_eq!(out, Some(PathBuf::from("docs")));
            }
            other => panic!("Expected history export, got {:?}", other),
        }
    }
}
