//! Career roadmap generation

use serde::{Deserialize, Serialize};

use crate::career::parse_reply;
use crate::error::{CareerError, Result};
use crate::providers::Provider;

/// A learning resource attached to a roadmap step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub link: String,
}

/// One stage of a roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// An ordered plan for reaching a career goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub steps: Vec<RoadmapStep>,
}

fn roadmap_prompt(goal: &str) -> String {
    format!(
        r#"Generate a detailed career roadmap for becoming a {goal}.
The response should be in JSON format with the following structure:
{{
  "title": "Career Title",
  "steps": [
    {{
      "title": "Step Title",
      "description": "Detailed description of what to learn/do in this step",
      "resources": [
        {{
          "name": "Resource Name",
          "link": "Resource URL"
        }}
      ]
    }}
  ]
}}
Include 6-8 steps with 2-3 relevant resources for each step. Make sure the steps are in logical order
and the resources are real, high-quality learning materials (courses, documentation, tutorials, etc).
Important: Return only the JSON data without any markdown code blocks or additional text."#
    )
}

/// Ask the provider for a roadmap towards `goal`
///
/// # Errors
///
/// - [`CareerError::InvalidInput`] when `goal` is blank
/// - [`CareerError::Provider`] when the provider call fails
/// - [`CareerError::Parse`] when the reply is not roadmap JSON or has no steps
pub async fn generate_roadmap(provider: &dyn Provider, goal: &str) -> Result<RoadmapData> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(CareerError::InvalidInput("career goal cannot be empty".to_string()).into());
    }

    tracing::info!("Generating roadmap for goal: {}", goal);
    let reply = provider.respond(&roadmap_prompt(goal)).await?;
    let roadmap: RoadmapData = parse_reply(&reply, "roadmap")?;

    if roadmap.steps.is_empty() {
        return Err(CareerError::Parse("generated roadmap has no steps".to_string()).into());
    }

    tracing::debug!("Roadmap has {} steps", roadmap.steps.len());
    Ok(roadmap)
}
