mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{ok, valid_answer, ScriptedClient};
use taskbrief::api::{router, AppState};
use taskbrief::{ModelClient, Summary, SummaryEngine, Task, TaskStore};
use tower::ServiceExt;

fn app(client: Arc<dyn ModelClient>) -> (tempfile::TempDir, TaskStore, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::open(dir.path().join("tasks")).unwrap();
    let state = Arc::new(AppState {
        store: store.clone(),
        engine: SummaryEngine::default(),
        client,
    });
    (dir, store, router(state))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn health_check() {
    let (_dir, _store, app) = app(Arc::new(ScriptedClient::failing()));
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn task_crud_round() {
    let (_dir, _store, app) = app(Arc::new(ScriptedClient::failing()));

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(serde_json::json!({"title": "Buy milk", "description": "2 litres"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Task = serde_json::from_slice(&body).unwrap();
    assert!(!created.is_done);

    let (status, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks: Vec<Task> = serde_json::from_slice(&body).unwrap();
    assert_eq!(tasks, vec![created.clone()]);

    let uri = format!("/tasks/{}", created.id);
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(serde_json::json!({"title": "Buy milk", "is_done": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Task = serde_json::from_slice(&body).unwrap();
    assert!(updated.is_done);
    assert_eq!(updated.description, None);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_title_is_unprocessable() {
    let (_dir, _store, app) = app(Arc::new(ScriptedClient::failing()));
    let (status, _) = send(&app, "POST", "/tasks", Some(serde_json::json!({"title": " "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn summary_uses_model_answer() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::open(dir.path().join("tasks")).unwrap();
    store.create(taskbrief::NewTask::new("Buy milk")).unwrap();
    let tasks = store.list().unwrap();

    let client = Arc::new(ScriptedClient::new(vec![ok(valid_answer(&tasks))]));
    let state = Arc::new(AppState {
        store,
        engine: SummaryEngine::default(),
        client: client.clone(),
    });
    let app = router(state);

    let (status, body) = send(&app, "POST", "/llm/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Summary = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.priority_order, vec!["Buy milk".to_string()]);
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn summary_falls_back_when_model_is_down() {
    let (_dir, store, app) = app(Arc::new(ScriptedClient::failing()));
    store.create(taskbrief::NewTask::new("Buy milk")).unwrap();
    store
        .create(taskbrief::NewTask {
            title: "Pay rent".to_string(),
            description: None,
            is_done: true,
        })
        .unwrap();

    let (status, body) = send(&app, "POST", "/llm/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Summary = serde_json::from_slice(&body).unwrap();
    assert_eq!((summary.count, summary.done_count, summary.pending_count), (2, 1, 1));
    assert!(summary.description_pending.starts_with("[AI Summary Unavailable]"));
    assert_eq!(summary.priority_order, vec!["Buy milk".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_creates_are_all_stored() {
    let (_dir, store, app) = app(Arc::new(ScriptedClient::failing()));

    let requests = (0..8).map(|i| {
        let app = app.clone();
        async move {
            send(
                &app,
                "POST",
                "/tasks",
                Some(serde_json::json!({"title": format!("Task {i}")})),
            )
            .await
            .0
        }
    });
    let statuses = spawn_all(requests).await;

    assert!(statuses.iter().all(|s| *s == StatusCode::CREATED));
    assert_eq!(store.count(), 8);
    let (status, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks: Vec<Task> = serde_json::from_slice(&body).unwrap();
    assert_eq!(tasks.len(), 8);
}

async fn spawn_all<F>(futures: impl Iterator<Item = F>) -> Vec<StatusCode>
where
    F: std::future::Future<Output = StatusCode> + Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    statuses
}
