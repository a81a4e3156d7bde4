//! Gemini provider implementation
//!
//! Talks to the Generative Language REST API
//! (`/v1beta/models/{model}:generateContent`) with a single user turn and
//! returns the concatenated text of the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::{CareerError, Result};
use crate::providers::Provider;

/// Google Gemini API provider
///
/// # Examples
///
/// ```
/// use careerchat::config::GeminiConfig;
/// use careerchat::providers::{GeminiProvider, Provider};
///
/// let config = GeminiConfig {
///     api_key: Some("my-key".to_string()),
///     ..GeminiConfig::default()
/// };
/// let provider = GeminiProvider::new(config).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// ```
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, or `None` when there is nothing to show
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns [`CareerError::MissingCredentials`] when no API key is
    /// configured, or [`CareerError::Provider`] if the HTTP client cannot be
    /// built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CareerError::MissingCredentials(
                    "Gemini API key not set (provider.gemini.api_key or GEMINI_API_KEY)"
                        .to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("careerchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CareerError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn respond(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            "Sending Gemini request: model={}, prompt_chars={}",
            self.config.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                CareerError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(CareerError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CareerError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = body.into_text().ok_or_else(|| {
            tracing::error!("Gemini response contained no candidate text");
            CareerError::Provider("Gemini response contained no candidate text".to_string())
        })?;

        tracing::debug!("Gemini response: {} chars", text.chars().count());
        Ok(text)
    }
}
