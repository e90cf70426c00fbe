//! Entry point used by the CLI and the HTTP handlers.

use crate::client::ModelClient;
use crate::engine::{Summarized, SummaryEngine};
use crate::summary::Summary;
use crate::task::Task;

/// Summarize a task snapshot with the default engine settings.
pub async fn generate_task_summary(tasks: &[Task], client: &dyn ModelClient) -> Summary {
    SummaryEngine::default().summarize(tasks, client).await
}

/// Summarize with a configured engine, reporting whether the fallback was used.
pub async fn generate_task_summary_with(
    engine: &SummaryEngine,
    tasks: &[Task],
    client: &dyn ModelClient,
) -> Summarized {
    engine.run(tasks, client).await
}
