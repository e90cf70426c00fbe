//! Model client seam used by the summary engine.
//!
//! The engine only needs "send this structured-output request, give me the
//! raw text back". Keeping that behind a trait lets tests drive the engine
//! with scripted responses.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to the model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("empty response from model")]
    EmptyResponse,
}

/// A structured-output request.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// System instruction constraining the response format
    pub system: String,
    /// User prompt including the task listing
    pub prompt: String,
    /// JSON schema the response must match
    pub schema: serde_json::Value,
    /// Name given to the schema
    pub schema_name: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Anything that can answer a [`StructuredRequest`] with response text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: &StructuredRequest) -> Result<String, ModelError>;
}

