//! Configuration management for careerchat
//!
//! Configuration is read from a YAML file, then overridden by environment
//! variables, then by CLI flags, and finally validated.

use crate::error::{CareerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for careerchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AI provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Artifact history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Base URL of the Generative Language API (overridable for tests and proxies)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// API key; usually supplied through `GEMINI_API_KEY` instead of the file
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

/// Chat session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// JSON file holding the saved sessions; defaults to the platform data directory
    #[serde(default)]
    pub state_path: Option<String>,

    /// Characters of the first message kept in a derived session title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_title_max_chars() -> usize {
    crate::chat::DEFAULT_TITLE_MAX_CHARS
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            state_path: None,
            title_max_chars: default_title_max_chars(),
        }
    }
}

impl ChatConfig {
    /// Resolved location of the session state file
    pub fn resolve_state_path(&self) -> Result<PathBuf> {
        match &self.state_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(crate::storage::default_data_dir()?.join("chat_sessions.json")),
        }
    }
}

/// Artifact history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// SQLite database path; defaults to the platform data directory
    #[serde(default)]
    pub db_path: Option<String>,

    /// Directory exported documents are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

fn default_export_dir() -> String {
    "exports".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            export_dir: default_export_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CareerError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CareerError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.provider.gemini.api_key = Some(api_key);
        }

        if let Ok(provider_type) = std::env::var("CAREERCHAT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("CAREERCHAT_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("CAREERCHAT_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(state_path) = std::env::var("CAREERCHAT_STATE_PATH") {
            self.chat.state_path = Some(state_path);
        }

        if let Ok(db_path) = std::env::var("CAREERCHAT_HISTORY_DB") {
            self.history.db_path = Some(db_path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(state_path) = &cli.state_path {
            self.chat.state_path = Some(state_path.to_string_lossy().into_owned());
        }

        if let crate::cli::Commands::Chat {
            provider: Some(provider),
        } = &cli.command
        {
            self.provider.provider_type = provider.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`CareerError::Config`] naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let providers = crate::providers::SUPPORTED_PROVIDERS;
        if !providers.contains(&self.provider.provider_type.as_str()) {
            return Err(CareerError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                providers.join(", ")
            ))
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(CareerError::Config("gemini.model cannot be empty".to_string()).into());
        }

        url::Url::parse(&self.provider.gemini.api_base).map_err(|e| {
            CareerError::Config(format!(
                "gemini.api_base is not a valid URL ({}): {}",
                self.provider.gemini.api_base, e
            ))
        })?;

        if self.provider.gemini.timeout_seconds == 0 {
            return Err(CareerError::Config(
                "gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(CareerError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "GEMINI_API_KEY",
        "CAREERCHAT_PROVIDER",
        "CAREERCHAT_GEMINI_MODEL",
        "CAREERCHAT_GEMINI_API_BASE",
        "CAREERCHAT_STATE_PATH",
        "CAREERCHAT_HISTORY_DB",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "gemini");
        assert_eq!(config.provider.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.provider.gemini.timeout_seconds, 60);
        assert_eq!(config.chat.title_max_chars, 30);
        assert_eq!(config.history.export_dir, "exports");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_api_base() {
        let mut config = Config::default();
        config.provider.gemini.api_base = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.provider.gemini.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_title_length() {
        let mut config = Config::default();
        config.chat.title_max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  type: gemini
  gemini:
    model: gemini-1.5-pro
    timeout_seconds: 30

chat:
  state_path: /tmp/careerchat/sessions.json
  title_max_chars: 40

history:
  export_dir: out
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.provider.gemini.timeout_seconds, 30);
        assert_eq!(
            config.provider.gemini.api_base,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            config.chat.state_path.as_deref(),
            Some("/tmp/careerchat/sessions.json")
        );
        assert_eq!(config.chat.title_max_chars, 40);
        assert_eq!(config.history.export_dir, "out");
        assert!(config.history.db_path.is_none());
    }

    #[test]
    fn test_api_key_is_never_written_back() {
        let mut config = Config::default();
        config.provider.gemini.api_key = Some("secret".to_string());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();
        assert_eq!(config.provider.provider_type, "gemini");
        assert!(config.provider.gemini.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_load_rejects_malformed_yaml() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "provider: [unclosed").unwrap();

        let err = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CareerError>(),
            Some(CareerError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "provider:\n  gemini:\n    model: from-file\n").unwrap();

        std::env::set_var("GEMINI_API_KEY", "env-key");
        std::env::set_var("CAREERCHAT_GEMINI_MODEL", "from-env");
        std::env::set_var("CAREERCHAT_HISTORY_DB", "/tmp/h.db");

        let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.provider.gemini.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.provider.gemini.model, "from-env");
        assert_eq!(config.history.db_path.as_deref(), Some("/tmp/h.db"));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        clear_env();
        std::env::set_var("CAREERCHAT_STATE_PATH", "/tmp/from-env.json");

        let cli = Cli {
            state_path: Some(PathBuf::from("/tmp/from-cli.json")),
            command: Commands::Chat {
                provider: Some("other".to_string()),
            },
            ..Cli::default()
        };
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        clear_env();

        assert_eq!(config.chat.state_path.as_deref(), Some("/tmp/from-cli.json"));
        assert_eq!(config.provider.provider_type, "other");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_state_path_prefers_configured_path() {
        let chat = ChatConfig {
            state_path: Some("state.json".to_string()),
            ..ChatConfig::default()
        };
        assert_eq!(chat.resolve_state_path().unwrap(), PathBuf::from("state.json"));
    }
}
