//! # Taskbrief
//!
//! A task list with AI-generated summaries that are checked against the data.
//!
//! ## Features
//!
//! - **Structured Output**: the model must return a typed `Summary` matching a JSON schema
//! - **Business Validation**: counts and priority titles are checked against the real task list
//! - **Always Answers**: bounded retries with linear backoff, then a deterministic fallback
//! - **Provider Agnostic**: Supports Gemini and OpenAI via rstructor
//! - **Storage**: sled-backed task store behind a CLI and an axum HTTP API

pub mod agent;
pub mod api;
pub mod client;
pub mod config;
pub mod engine;
pub mod fallback;
pub mod service;
pub mod storage;
pub mod summary;
pub mod task;
pub mod validator;

pub use client::{ModelClient, ModelError, StructuredRequest};
pub use config::Config;
pub use engine::{Source, Summarized, SummaryEngine};
pub use storage::TaskStore;
pub use summary::Summary;
pub use task::{NewTask, Task};
