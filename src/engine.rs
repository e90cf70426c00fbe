//! Summary engine: model call, validation, bounded retries and fallback.
//!
//! [`SummaryEngine::summarize`] is total. Every attempt produces a typed
//! [`AttemptFailure`] or an accepted [`Summary`]; once the attempts are used
//! up the engine returns [`fallback::synthesize`] instead of an error.

use std::time::Duration;

use thiserror::Error;

use crate::client::{ModelClient, ModelError, StructuredRequest};
use crate::config::EngineConfig;
use crate::fallback;
use crate::summary::Summary;
use crate::task::Task;
use crate::validator::{self, Rejection};

/// Default number of model attempts per summary.
pub const MAX_RETRIES: u32 = 3;

/// Attempt `n` is followed by a wait of `n * BACKOFF_UNIT`.
pub const BACKOFF_UNIT: Duration = Duration::from_millis(500);

const SCHEMA_NAME: &str = "task_summary";

const SYSTEM_INSTRUCTION: &str = "You MUST respond only with valid JSON. No extra text.";

/// Why a single attempt did not yield an accepted summary.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    #[error("model request failed: {0}")]
    Transport(#[from] ModelError),
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),
    #[error("response is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("response does not match the summary schema: {0}")]
    Schema(String),
    #[error("summary rejected: {0}")]
    Validation(#[from] Rejection),
}

impl AttemptFailure {
    /// Short category name used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            AttemptFailure::Transport(_) | AttemptFailure::Timeout(_) => "transport",
            AttemptFailure::Parse(_) => "parse",
            AttemptFailure::Schema(_) => "schema",
            AttemptFailure::Validation(_) => "validation",
        }
    }
}

/// Where the returned summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Model,
    Fallback,
}

/// Summary plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Summarized {
    pub summary: Summary,
    pub source: Source,
    /// Model attempts made, including the successful one
    pub attempts: u32,
}

/// Retry and sampling settings.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub temperature: f32,
    /// Abort an attempt that takes longer than this
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            backoff: BACKOFF_UNIT,
            temperature: 0.3,
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.backoff_ms),
            temperature: config.temperature,
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// Wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

/// Orchestrates model attempts for one or more summary requests.
///
/// Holds no per-request state, so a single engine can serve concurrent
/// requests.
#[derive(Debug, Clone, Default)]
pub struct SummaryEngine {
    policy: RetryPolicy,
}

impl SummaryEngine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Summarize `tasks`, always returning a valid summary.
    pub async fn summarize(&self, tasks: &[Task], client: &dyn ModelClient) -> Summary {
        self.run(tasks, client).await.summary
    }

    /// Like [`summarize`](Self::summarize) but also reports the source.
    pub async fn run(&self, tasks: &[Task], client: &dyn ModelClient) -> Summarized {
        let request = self.build_request(tasks);
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.attempt(tasks, &request, client).await {
                Ok(summary) => {
                    tracing::info!(attempt, "model summary accepted");
                    return Summarized {
                        summary,
                        source: Source::Model,
                        attempts: attempt,
                    };
                }
                Err(failure) => {
                    tracing::warn!(
                        attempt,
                        category = failure.category(),
                        error = %failure,
                        "summary attempt failed"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        tracing::info!(
            attempts = max_attempts,
            tasks = tasks.len(),
            "model attempts exhausted, using fallback summary"
        );
        Summarized {
            summary: fallback::synthesize(tasks),
            source: Source::Fallback,
            attempts: max_attempts,
        }
    }

    /// Build the structured-output request for a snapshot.
    pub fn build_request(&self, tasks: &[Task]) -> StructuredRequest {
        let prompt = format!(
            r#"You are an AI assistant summarizing a user's to-do list.
Respond ONLY in valid JSON matching the schema.
Fields: count, done_count, pending_count, description_done, description_pending, priority_order.

CRITICAL RULE: The 'priority_order' list MUST contain ONLY the exact, unmodified task titles (e.g., "Stretch", not "Stretch: description"). Do not include any descriptions, numbers, or bullet points in that list.

TASK LIST:
{}"#,
            render_tasks(tasks)
        );

        StructuredRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            schema: Summary::json_schema(),
            schema_name: SCHEMA_NAME.to_string(),
            temperature: self.policy.temperature,
        }
    }

    async fn attempt(
        &self,
        tasks: &[Task],
        request: &StructuredRequest,
        client: &dyn ModelClient,
    ) -> Result<Summary, AttemptFailure> {
        let body = match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, client.complete(request))
                .await
                .map_err(|_| AttemptFailure::Timeout(limit))??,
            None => client.complete(request).await?,
        };

        let summary = decode(&body)?;
        validator::check(tasks, &summary)?;
        Ok(summary)
    }
}

/// Parse the response body and decode it into the summary contract.
fn decode(body: &str) -> Result<Summary, AttemptFailure> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(AttemptFailure::Parse)?;
    let summary: Summary =
        serde_json::from_value(value).map_err(|e| AttemptFailure::Schema(e.to_string()))?;
    if !summary.has_descriptions() {
        return Err(AttemptFailure::Schema("empty description".to_string()));
    }
    Ok(summary)
}

/// One line per task: completion marker, title, description.
fn render_tasks(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| {
            format!(
                "- [{}] {}: {}",
                if t.is_done { 'x' } else { ' ' },
                t.title,
                t.description.as_deref().unwrap_or("No description")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
