//! LLM agent backed by rstructor.
//!
//! Implements [`ModelClient`] for the Gemini and OpenAI providers.

use async_trait::async_trait;
use rstructor::{GeminiClient, GeminiModel, LLMClient, OpenAIClient, OpenAIModel};

use crate::client::{ModelClient, ModelError, StructuredRequest};
use crate::config::Config;

/// Model client configured from [`Config`].
///
/// A missing API key is reported per request, so the engine can still fall
/// back to a local summary.
#[derive(Debug, Clone)]
pub struct RstructorClient {
    provider: String,
    model: String,
    api_key: Option<String>,
}

impl RstructorClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.agent.provider.clone(),
            model: config.agent.model.clone(),
            api_key: config.api_key().ok().map(str::to_string),
        }
    }

    fn api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ModelError::MissingApiKey(self.provider.clone()))
    }
}

#[async_trait]
impl ModelClient for RstructorClient {
    async fn complete(&self, request: &StructuredRequest) -> Result<String, ModelError> {
        let api_key = self.api_key()?;
        let prompt = render_prompt(request);

        tracing::debug!(provider = %self.provider, model = %self.model, "sending summary request");

        let text = match self.provider.as_str() {
            "gemini" => {
                let client = GeminiClient::new(api_key)
                    .map_err(|e| ModelError::RequestFailed(e.to_string()))?
                    .model(parse_gemini_model(&self.model))
                    .temperature(request.temperature);
                client
                    .generate_with_metadata(&prompt)
                    .await
                    .map_err(|e| ModelError::RequestFailed(e.to_string()))?
                    .text
            }
            "openai" => {
                let client = OpenAIClient::new(api_key)
                    .map_err(|e| ModelError::RequestFailed(e.to_string()))?
                    .model(parse_openai_model(&self.model))
                    .temperature(request.temperature);
                client
                    .generate_with_metadata(&prompt)
                    .await
                    .map_err(|e| ModelError::RequestFailed(e.to_string()))?
                    .text
            }
            other => return Err(ModelError::UnsupportedProvider(other.to_string())),
        };

        let cleaned = strip_markdown_json(&text);
        if cleaned.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(cleaned)
    }
}

/// Fold the system instruction and schema into a single prompt.
fn render_prompt(request: &StructuredRequest) -> String {
    let schema = serde_json::to_string_pretty(&request.schema).unwrap_or_default();
    format!(
        r#"{}

You MUST respond with valid JSON matching the schema "{}":
{}

Do not include any markdown formatting, code blocks, or explanations. Only output the raw JSON object.

---

{}"#,
        request.system, request.schema_name, schema, request.prompt
    )
}

/// Strip markdown code block wrappers from JSON response
fn strip_markdown_json(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end_idx) = body.rfind("```") {
            return body[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}

fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        _ => GeminiModel::Gemini20Flash,
    }
}

fn parse_openai_model(model: &str) -> OpenAIModel {
    match model {
        "gpt-4o-mini" => OpenAIModel::Gpt4OMini,
        _ => OpenAIModel::Gpt4O,
    }
}
