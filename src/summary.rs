//! Summary struct - the structured output expected from the model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured summary of a task snapshot.
///
/// Field names are a fixed wire contract. The JSON schema derived from this
/// type is sent to the model as the required response shape. Extra keys in
/// a reply are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// Total number of tasks provided
    pub count: usize,
    /// Number of completed tasks
    pub done_count: usize,
    /// Number of incomplete tasks
    pub pending_count: usize,
    /// Summary of completed tasks
    pub description_done: String,
    /// Summary of pending tasks
    pub description_pending: String,
    /// Task titles ordered by suggested priority, copied verbatim
    pub priority_order: Vec<String>,
}

impl Summary {
    /// True when both descriptions carry some text.
    pub fn has_descriptions(&self) -> bool {
        !self.description_done.trim().is_empty() && !self.description_pending.trim().is_empty()
    }

    /// JSON schema of the contract, as sent to the model.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Summary)).unwrap_or_default()
    }
}
