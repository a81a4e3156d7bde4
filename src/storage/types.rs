use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CareerError;

/// Kind of career artifact stored in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// A generated career roadmap
    Roadmap,
    /// A job-description keyword analysis
    Keywords,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roadmap => "roadmap",
            Self::Keywords => "keywords",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = CareerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roadmap" => Ok(Self::Roadmap),
            "keywords" => Ok(Self::Keywords),
            other => Err(CareerError::Storage(format!(
                "unknown history kind: {}",
                other
            ))),
        }
    }
}

/// A history record as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Unique identifier (ULID)
    pub id: String,
    /// Owner of the artifact
    pub user_id: String,
    pub kind: HistoryKind,
    /// Free-text label the artifact was generated for
    pub query: String,
    /// The artifact itself
    pub data: serde_json::Value,
    /// Creation time in milliseconds since the epoch
    pub timestamp: i64,
}

/// A history record before the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewHistoryItem {
    pub user_id: String,
    pub kind: HistoryKind,
    pub query: String,
    pub data: serde_json::Value,
}
