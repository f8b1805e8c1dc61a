//! Creative-idea generation backed by the Gemini `generateContent` API.

use crate::{ServiceConfig, ServiceError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str =
    "You are a creative assistant for music producers. You provide short, actionable ideas.";
const TEMPERATURE: f32 = 0.8;
const MAX_OUTPUT_TOKENS: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait IdeaGenerator: Send + Sync {
    fn generate_idea(&self, topic: &str) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub thinking_config: ThinkingConfig,
}

/// Zero budget keeps suggestions low-latency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn text_content(role: Option<&str>, text: String) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text }],
    }
}

pub fn build_prompt(topic: &str) -> String {
    format!(
        "Generate a creative idea for a music producer related to: \"{topic}\". Be concise and inspiring. \
         For example, if the topic is 'drum beat', suggest a specific rhythm or style."
    )
}

pub fn build_request(topic: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![text_content(Some("user"), build_prompt(topic))],
        system_instruction: text_content(None, SYSTEM_INSTRUCTION.to_string()),
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        },
    }
}

/// Text of the first candidate, or `None` when the model returned nothing.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Pull the human-readable message out of an API error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub struct GeminiClient {
    api_key: Option<String>,
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            http,
            endpoint: GEMINI_ENDPOINT.to_string(),
            model: GEMINI_MODEL.to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Self::new(config.gemini_api_key().map(str::to_string))?;
        if !client.is_configured() {
            warn!("Gemini API key not set; the creative assistant will not work");
        }
        Ok(client)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl IdeaGenerator for GeminiClient {
    async fn generate_idea(&self, topic: &str) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::ConfigurationMissing("Gemini API key"))?;

        debug!(topic, model = %self.model, "Requesting creative idea");

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&build_request(topic))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            warn!(status_code = status.as_u16(), %message, "Gemini request failed");
            return Err(ServiceError::Api {
                service: "Gemini",
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_text(&body).ok_or(ServiceError::EmptyResponse("Gemini"))
    }
}
