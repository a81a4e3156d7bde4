//! Roadmap and keyword extraction commands

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use crate::career::{extract_keywords, generate_roadmap, KeywordExtraction, RoadmapData};
use crate::commands::open_history_store;
use crate::config::Config;
use crate::error::{CareerError, Result};
use crate::providers::create_provider;
use crate::storage::{HistoryKind, NewHistoryItem};

/// Generate and print a roadmap, optionally saving it to history
pub async fn run_roadmap(config: &Config, goal: &str, user: &str, save: bool) -> Result<()> {
    let provider = create_provider(&config.provider)?;

    println!("{}", "Generating roadmap...".dimmed());
    let roadmap = generate_roadmap(provider.as_ref(), goal).await?;
    print_roadmap(&roadmap);

    if save {
        save_artifact(config, user, HistoryKind::Roadmap, goal.trim(), &roadmap)?;
    }
    Ok(())
}

/// Extract and print keywords, optionally saving them to history
///
/// The job description comes from `file` when given, otherwise from `text`.
pub async fn run_keywords(
    config: &Config,
    file: Option<&Path>,
    text: Option<&str>,
    user: &str,
    save: bool,
) -> Result<()> {
    let job_description = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job description from {}", path.display()))?,
        (None, Some(text)) => text.to_string(),
        (None, None) => {
            return Err(CareerError::InvalidInput(
                "a job description is required (--file or --text)".to_string(),
            )
            .into())
        }
    };

    let provider = create_provider(&config.provider)?;

    println!("{}", "Analyzing job description...".dimmed());
    let extraction = extract_keywords(provider.as_ref(), &job_description).await?;
    print_keywords(&extraction);

    if save {
        let label = history_label(&job_description);
        save_artifact(config, user, HistoryKind::Keywords, &label, &extraction)?;
    }
    Ok(())
}

fn save_artifact<T: Serialize>(
    config: &Config,
    user: &str,
    kind: HistoryKind,
    query: &str,
    data: &T,
) -> Result<()> {
    let store = open_history_store(config)?;
    let id = store.add(NewHistoryItem {
        user_id: user.to_string(),
        kind,
        query: query.to_string(),
        data: serde_json::to_value(data)?,
    })?;
    println!("{}", format!("Saved {} to history as {}", kind, id).green());
    Ok(())
}

/// Short label for a job description: its first non-empty line, capped at 60 chars
fn history_label(job_description: &str) -> String {
    let first_line = job_description
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Job description");
    crate::commands::truncate(first_line, 60)
}

fn print_roadmap(roadmap: &RoadmapData) {
    if let Some(title) = &roadmap.title {
        println!("\n{}\n", title.bold());
    }

    for (index, step) in roadmap.steps.iter().enumerate() {
        println!("{} {}", format!("{}.", index + 1).cyan().bold(), step.title.bold());
        if !step.description.is_empty() {
            println!("   {}", step.description);
        }
        for resource in &step.resources {
            println!("   • {} {}", resource.name, resource.link.dimmed());
        }
        println!();
    }
}

fn print_keywords(extraction: &KeywordExtraction) {
    println!();
    for (heading, values) in [
        ("Keywords", &extraction.keywords),
        ("Skills", &extraction.skills),
        ("Technologies", &extraction.technologies),
    ] {
        if values.is_empty() {
            continue;
        }
        println!("{}: {}", heading.bold(), values.join(", "));
    }

    if !extraction.analysis.is_empty() {
        println!("\n{}\n{}", "Analysis".bold(), extraction.analysis);
    }
    println!();
}
