//! AI completion interface.
//!
//! A narrow seam to an external completion service: build a
//! [`CompletionRequest`] (prompt, optional image, optional JSON schema
//! for structured answers), send it through a [`CompletionClient`], and
//! get text or schema-shaped JSON back. The service is treated as
//! unreliable; failures surface once as [`AssistError`] with no retry
//! or backoff, and callers decide what to do.

use async_trait::async_trait;
use secplan_core::error::AssistError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// The prompt text
    pub prompt: String,
    /// Optional image payload, base64-encoded by the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    /// When present, the response must be JSON matching this schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    /// A plain text prompt.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            schema: None,
        }
    }

    /// Attach an image to the prompt.
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    /// Require a JSON answer matching the given schema.
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// A completion answer.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResponse {
    /// Free-form text answer
    Text(String),
    /// Structured answer for schema-carrying requests
    Json(serde_json::Value),
}

impl CompletionResponse {
    /// The text form, for callers that asked for prose.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CompletionResponse::Text(s) => Some(s),
            CompletionResponse::Json(_) => None,
        }
    }
}

/// The completion seam. Production uses the HTTP client; tests use
/// canned implementations.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one request and wait for the answer.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AssistError>;
}

/// Wire shape of the webhook's answer.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    json: Option<serde_json::Value>,
}

/// HTTP implementation posting JSON to a configured completion webhook.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    /// Client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AssistError> {
        let wants_json = request.schema.is_some();
        debug!(endpoint = %self.endpoint, wants_json, "sending completion request");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| AssistError::Transport {
            reason: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssistError::Status {
                status: status.as_u16(),
            });
        }

        let wire: WireResponse =
            response.json().await.map_err(|e| AssistError::BadResponse {
                reason: e.to_string(),
            })?;

        match (wants_json, wire.json, wire.text) {
            (true, Some(json), _) => Ok(CompletionResponse::Json(json)),
            (true, None, _) => Err(AssistError::SchemaMismatch {
                reason: "schema requested but no json field in response".to_string(),
            }),
            (false, _, Some(text)) => Ok(CompletionResponse::Text(text)),
            (false, _, None) => Err(AssistError::BadResponse {
                reason: "response carried neither text nor json".to_string(),
            }),
        }
    }
}
