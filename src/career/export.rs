//! Markdown export of saved artifacts

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::career::{KeywordExtraction, RoadmapData};
use crate::error::{CareerError, Result};
use crate::storage::{HistoryItem, HistoryKind};

/// File name for an exported artifact: `{kind}-{slug}.md`
///
/// The slug is the query lower-cased with whitespace runs collapsed to `-`.
///
/// # Examples
///
/// ```
/// use careerchat::career::export_filename;
/// use careerchat::storage::HistoryKind;
///
/// assert_eq!(
///     export_filename(HistoryKind::Roadmap, "Data   Engineer"),
///     "roadmap-data-engineer.md"
/// );
/// ```
pub fn export_filename(kind: HistoryKind, query: &str) -> String {
    let slug = query
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !std::path::is_separator(*c))
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        format!("{}.md", kind)
    } else {
        format!("{}-{}.md", kind, slug)
    }
}

/// Render a history artifact as a Markdown document
///
/// # Errors
///
/// Returns [`CareerError::Parse`] when the stored data does not match the
/// artifact kind.
pub fn render_markdown(item: &HistoryItem) -> Result<String> {
    match item.kind {
        HistoryKind::Roadmap => {
            let roadmap: RoadmapData = decode(item)?;
            Ok(render_roadmap(&item.query, &roadmap))
        }
        HistoryKind::Keywords => {
            let extraction: KeywordExtraction = decode(item)?;
            Ok(render_keywords(&item.query, &extraction))
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(item: &HistoryItem) -> Result<T> {
    serde_json::from_value(item.data.clone()).map_err(|e| {
        CareerError::Parse(format!(
            "History item {} is not valid {} data: {}",
            item.id, item.kind, e
        ))
        .into()
    })
}

fn render_roadmap(query: &str, roadmap: &RoadmapData) -> String {
    let mut out = String::new();
    let title = roadmap.title.as_deref().unwrap_or(query);
    let _ = writeln!(out, "# {} Roadmap\n", title);

    for (index, step) in roadmap.steps.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}\n", index + 1, step.title);
        if !step.description.is_empty() {
            let _ = writeln!(out, "{}\n", step.description);
        }
        if !step.resources.is_empty() {
            let _ = writeln!(out, "Resources:\n");
            for resource in &step.resources {
                if resource.link.is_empty() {
                    let _ = writeln!(out, "- {}", resource.name);
                } else {
                    let _ = writeln!(out, "- [{}]({})", resource.name, resource.link);
                }
            }
            out.push('\n');
        }
    }

    out
}

fn render_keywords(query: &str, extraction: &KeywordExtraction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Job Description Analysis\n");
    let _ = writeln!(out, "> {}\n", query);

    if !extraction.analysis.is_empty() {
        let _ = writeln!(out, "## Analysis\n\n{}\n", extraction.analysis);
    }

    for (heading, values) in [
        ("Keywords", &extraction.keywords),
        ("Skills", &extraction.skills),
        ("Technologies", &extraction.technologies),
    ] {
        if values.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {}\n", heading);
        for value in values {
            let _ = writeln!(out, "- {}", value);
        }
        out.push('\n');
    }

    out
}

/// Write `item` as Markdown into `dir`, creating the directory if needed
///
/// Returns the path of the written file.
pub fn export_to_dir(item: &HistoryItem, dir: &Path) -> Result<PathBuf> {
    let document = render_markdown(item)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_filename(item.kind, &item.query));
    std::fs::write(&path, document)
        .with_context(|| format!("Failed to write export file {}", path.display()))?;

    tracing::info!("Exported {} {} to {}", item.kind, item.id, path.display());
    Ok(path)
}
