//! AI providers
//!
//! [`Provider`] is the seam between the application and whichever model
//! backend is configured. Gemini is the only backend shipped today.

pub mod base;
pub mod gemini;

pub use base::Provider;
#[cfg(test)]
pub use base::MockProvider;
pub use gemini::GeminiProvider;

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::{CareerError, Result};

/// Provider types accepted in `provider.type`
pub const SUPPORTED_PROVIDERS: &[&str] = &["gemini"];

/// Create the provider named by `config.provider_type`
///
/// # Errors
///
/// Returns [`CareerError::Provider`] for an unknown provider type and
/// [`CareerError::MissingCredentials`] when the backend has no API key.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.gemini.clone())?)),
        other => Err(CareerError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[test]
    fn test_create_provider_invalid_type() {
        let config = ProviderConfig {
            provider_type: "openai".to_string(),
            gemini: GeminiConfig::default(),
        };

        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider type"));
    }

    #[test]
    fn test_create_provider_gemini() {
        let config = ProviderConfig {
            provider_type: "gemini".to_string(),
            gemini: GeminiConfig {
                api_key: Some("test-key".to_string()),
                ..GeminiConfig::default()
            },
        };

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_without_key_is_missing_credentials() {
        let config = ProviderConfig {
            provider_type: "gemini".to_string(),
            gemini: GeminiConfig {
                api_key: None,
                ..GeminiConfig::default()
            },
        };

        let err = create_provider(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CareerError>(),
            Some(CareerError::MissingCredentials(_))
        ));
    }
}
