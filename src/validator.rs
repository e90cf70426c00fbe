//! Business validation of a candidate summary against the task snapshot.

use std::collections::HashSet;

use thiserror::Error;

use crate::summary::Summary;
use crate::task::Task;

/// Why a well-formed summary was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("count is {got}, snapshot has {expected} tasks")]
    Count { expected: usize, got: usize },
    #[error("done_count is {got}, snapshot has {expected} completed")]
    DoneCount { expected: usize, got: usize },
    #[error("pending_count is {got}, snapshot has {expected} pending")]
    PendingCount { expected: usize, got: usize },
    #[error("priority_order contains unknown title {0:?}")]
    UnknownTitle(String),
}

/// Check a candidate, reporting the first violated rule.
pub fn check(tasks: &[Task], candidate: &Summary) -> Result<(), Rejection> {
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.is_done).count();
    let pending = total - done;

    if candidate.count != total {
        return Err(Rejection::Count {
            expected: total,
            got: candidate.count,
        });
    }
    if candidate.done_count != done {
        return Err(Rejection::DoneCount {
            expected: done,
            got: candidate.done_count,
        });
    }
    if candidate.pending_count != pending {
        return Err(Rejection::PendingCount {
            expected: pending,
            got: candidate.pending_count,
        });
    }

    let titles: HashSet<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    if let Some(unknown) = candidate
        .priority_order
        .iter()
        .find(|title| !titles.contains(title.as_str()))
    {
        return Err(Rejection::UnknownTitle(unknown.clone()));
    }

    Ok(())
}

/// Returns true when the candidate is factually consistent with `tasks`.
pub fn validate(tasks: &[Task], candidate: &Summary) -> bool {
    check(tasks, candidate).is_ok()
}
