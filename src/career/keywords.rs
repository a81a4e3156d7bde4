//! Keyword extraction from job descriptions

use serde::{Deserialize, Serialize};

use crate::career::parse_reply;
use crate::error::{CareerError, Result};
use crate::providers::Provider;

/// What a job description asks for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordExtraction {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub analysis: String,
}

fn keywords_prompt(job_description: &str) -> String {
    format!(
        r#"Analyze this job description and extract important information. Return the response in this JSON format:
{{
  "keywords": ["list", "of", "important", "keywords"],
  "skills": ["required", "and", "preferred", "skills"],
  "technologies": ["specific", "technologies", "mentioned"],
  "analysis": "A brief analysis of the key requirements and qualifications"
}}

Job Description:
{job_description}

Important: Return only the JSON data without any markdown code blocks or additional text."#
    )
}

/// Ask the provider to pull keywords, skills and technologies out of a job description
///
/// # Errors
///
/// - [`CareerError::InvalidInput`] when `job_description` is blank
/// - [`CareerError::Provider`] when the provider call fails
/// - [`CareerError::Parse`] when the reply is not the expected JSON
pub async fn extract_keywords(
    provider: &dyn Provider,
    job_description: &str,
) -> Result<KeywordExtraction> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(
            CareerError::InvalidInput("job description cannot be empty".to_string()).into(),
        );
    }

    tracing::info!(
        "Extracting keywords from job description ({} chars)",
        job_description.chars().count()
    );
    let reply = provider.respond(&keywords_prompt(job_description)).await?;
    parse_reply(&reply, "keywords")
}
