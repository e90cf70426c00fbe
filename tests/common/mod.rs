//! Scripted model client shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use taskbrief::{ModelClient, ModelError, StructuredRequest, Task};

/// Replays queued responses; once the queue is empty it keeps returning
/// transport errors.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    calls: AtomicU32,
    last_request: Mutex<Option<StructuredRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering.
    pub fn hanging(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<StructuredRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn complete(&self, request: &StructuredRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ModelError::RequestFailed("connection refused".to_string())))
    }
}

pub fn ok(body: serde_json::Value) -> Result<String, ModelError> {
    Ok(body.to_string())
}

/// A model answer that is consistent with `tasks`.
pub fn valid_answer(tasks: &[Task]) -> serde_json::Value {
    let done = tasks.iter().filter(|t| t.is_done).count();
    let pending: Vec<&str> = tasks
        .iter()
        .filter(|t| !t.is_done)
        .map(|t| t.title.as_str())
        .collect();
    serde_json::json!({
        "count": tasks.len(),
        "done_count": done,
        "pending_count": tasks.len() - done,
        "description_done": "Good progress on the finished items.",
        "description_pending": "A few errands are still open.",
        "priority_order": pending,
    })
}

pub fn scenario_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "Buy milk", false),
        Task::new(2, "Pay rent", true),
    ]
}
