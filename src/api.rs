//! HTTP API: task CRUD plus the summary endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::ModelClient;
use crate::config::Config;
use crate::engine::{RetryPolicy, SummaryEngine};
use crate::service;
use crate::storage::{StorageError, TaskStore};
use crate::summary::Summary;
use crate::task::{NewTask, Task};

/// Shared application state.
pub struct AppState {
    pub store: TaskStore,
    pub engine: SummaryEngine,
    /// Injected model client; tests substitute a scripted one
    pub client: Arc<dyn ModelClient>,
}

type ApiError = (StatusCode, String);

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/llm/summary", post(summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(
    config: &Config,
    store: TaskStore,
    client: Arc<dyn ModelClient>,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        store,
        engine: SummaryEngine::new(RetryPolicy::from_config(&config.engine)),
        client,
    });

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    tracing::info!("Listening on http://{}", config.server.bind);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

fn storage_error(e: StorageError) -> ApiError {
    match e {
        StorageError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Task {} not found", id)),
        StorageError::EmptyTitle => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        other => {
            tracing::error!("Storage failure: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Run a store operation on the blocking pool; sled flushes to disk.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&TaskStore) -> Result<T, StorageError> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| {
            tracing::error!("Store task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map_err(storage_error)
}

/// GET / - Health check.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Task list API is running. POST /llm/summary for a summary."
    }))
}

/// GET /tasks - List all tasks.
async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    with_store(&state, |store| store.list()).await.map(Json)
}

/// POST /tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = with_store(&state, move |store| store.create(req)).await?;
    tracing::info!("Created task {} ({})", task.id, task.title);
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/:id - Get one task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    with_store(&state, move |store| store.get(id))
        .await?
        .map(Json)
        .ok_or_else(|| storage_error(StorageError::NotFound(id)))
}

/// PUT /tasks/:id - Replace a task.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<NewTask>,
) -> Result<Json<Task>, ApiError> {
    with_store(&state, move |store| store.update(id, req))
        .await
        .map(Json)
}

/// DELETE /tasks/:id - Delete a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if with_store(&state, move |store| store.delete(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(storage_error(StorageError::NotFound(id)))
    }
}

/// POST /llm/summary - Summarize the current task list.
async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<Summary>, ApiError> {
    let tasks = with_store(&state, |store| store.list()).await?;
    let result =
        service::generate_task_summary_with(&state.engine, &tasks, state.client.as_ref()).await;
    tracing::info!(source = ?result.source, attempts = result.attempts, "summary served");
    Ok(Json(result.summary))
}
