//! Task records shared by the store, the API and the summary engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task that is not backed by the store (snapshots, tests).
    pub fn new(id: u64, title: impl Into<String>, is_done: bool) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            is_done,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Payload for creating or replacing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
