//! Career guidance flows built on the AI provider
//!
//! - [`roadmap`]: step-by-step learning roadmaps for a career goal
//! - [`keywords`]: keyword and skill extraction from job descriptions
//! - [`export`]: Markdown documents for saved artifacts

pub mod export;
pub mod keywords;
pub mod roadmap;

pub use export::{export_filename, export_to_dir, render_markdown};
pub use keywords::{extract_keywords, KeywordExtraction};
pub use roadmap::{generate_roadmap, Resource, RoadmapData, RoadmapStep};

use crate::error::{CareerError, Result};
use serde::de::DeserializeOwned;

/// Remove a Markdown code fence the model wrapped around its JSON
///
/// Handles ```` ```json ```` and bare ```` ``` ```` fences. When the text
/// still does not start with `{`, the outermost `{ ... }` span is used.
///
/// # Examples
///
/// ```
/// use careerchat::career::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("Sure! {\"a\": 1} Enjoy."), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.trim_start();
        if let Some(inner) = body.trim_end().strip_suffix("```") {
            body = inner;
        }
        body = body.trim();
    }

    if !body.starts_with('{') {
        if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
            if start < end {
                return &body[start..=end];
            }
        }
    }

    body
}

/// Parse a model reply into `T` after stripping code fences
pub(crate) fn parse_reply<T: DeserializeOwned>(reply: &str, what: &str) -> Result<T> {
    serde_json::from_str(strip_code_fences(reply)).map_err(|e| {
        tracing::warn!("Failed to parse {} JSON: {}", what, e);
        tracing::debug!("Raw {} reply: {}", what, reply);
        CareerError::Parse(format!("Failed to parse the generated {}: {}", what, e)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_json_untouched() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_without_trailing_newline() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_text_without_braces_is_returned_trimmed() {
        assert_eq!(strip_code_fences(" sorry, I can't "), "sorry, I can't");
    }

    #[test]
    fn test_parse_reply_reports_parse_error() {
        let err = parse_reply::<serde_json::Value>("not json", "roadmap").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CareerError>(),
            Some(CareerError::Parse(_))
        ));
    }
}
