//! Deterministic summary used when the model never produces a valid one.

use crate::summary::Summary;
use crate::task::Task;

const UNAVAILABLE: &str = "[AI Summary Unavailable]";

/// Derive a summary directly from the snapshot.
///
/// Counts come from the done/pending partition, so the result always passes
/// [`crate::validator::validate`]. `priority_order` lists pending titles in
/// snapshot order.
pub fn synthesize(tasks: &[Task]) -> Summary {
    let (done, pending): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|t| t.is_done);

    let description_pending = if pending.is_empty() {
        format!("{UNAVAILABLE}: All tasks are complete!")
    } else {
        format!(
            "{UNAVAILABLE}: You have {} pending tasks: {}.",
            pending.len(),
            join_titles(&pending)
        )
    };

    let description_done = if done.is_empty() {
        format!("{UNAVAILABLE}: No tasks have been completed yet.")
    } else {
        format!(
            "{UNAVAILABLE}: You have completed {} tasks: {}.",
            done.len(),
            join_titles(&done)
        )
    };

    Summary {
        count: tasks.len(),
        done_count: done.len(),
        pending_count: pending.len(),
        description_done,
        description_pending,
        priority_order: pending.iter().map(|t| t.title.clone()).collect(),
    }
}

fn join_titles(tasks: &[&Task]) -> String {
    tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
