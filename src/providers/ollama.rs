//! Client for a locally-reachable Ollama server.
//!
//! Speaks Ollama's native API: single-shot (non-streaming) chat completion
//! at `/api/chat` and model listing at `/api/tags`.
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md>
//!
//! Status-code policy, shared by both operations:
//! - 429 is retried with exponential backoff up to the shared ceiling.
//! - Any other status ≥ 400 fails immediately with the response body.
//! - Timeouts and connection failures fail immediately, naming the
//!   endpoint so the user can check whether Ollama is running.
//! - Any other transport failure (resets, interrupted reads) is treated
//!   as transient and retried — a deliberately broad catch-all.
//! - A 2xx body that fails to decode is terminal (`UnexpectedFormat`),
//!   never retried.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::parse_retry_after;
use super::retry::{RetryConfig, with_retry};
use crate::config::OLLAMA_TIMEOUT;
use crate::{MuninnError, Result};

/// Client for the local Ollama chat API.
///
/// Each instance holds one endpoint and one HTTP client; configuration is
/// read at construction time and never cached beyond the instance.
#[derive(Clone)]
pub struct OllamaClient {
    endpoint: String,
    timeout: Duration,
    retry: RetryConfig,
    http: Client,
}

impl OllamaClient {
    /// Create a client for the given endpoint with the default (180s) timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, OLLAMA_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            endpoint: endpoint.into(),
            timeout,
            retry: RetryConfig::default(),
            http,
        }
    }

    /// Override the retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a chat response for a single user-role prompt.
    ///
    /// Sends a non-streaming completion request with the temperature in
    /// Ollama's per-request options object. A 2xx body missing
    /// `message.content` is an `UnexpectedFormat` error, not retried.
    pub async fn chat(&self, prompt: &str, model: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/api/chat", self.endpoint);
        debug!(endpoint = %url, model, "sending chat request to ollama");

        with_retry(&self.retry, "ollama", "chat", || {
            self.chat_once(&url, prompt, model, temperature)
        })
        .await
    }

    async fn chat_once(
        &self,
        url: &str,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        let response = self
            .http
            .post(url)
            .json(&ChatRequestBody {
                model,
                messages: vec![MessageBody {
                    role: "user",
                    content: prompt,
                }],
                stream: false,
                options: OptionsBody { temperature },
            })
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.endpoint, self.timeout))?;

        let response = self.reject_error_status(response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.endpoint, self.timeout))?;

        let body: ChatResponseBody = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "unexpected ollama response format");
            MuninnError::UnexpectedFormat(format!("ollama chat response: {e}"))
        })?;

        let content = body
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                error!(body = %text, "ollama response missing message.content");
                MuninnError::UnexpectedFormat(
                    "ollama chat response missing message.content".to_string(),
                )
            })?;

        debug!(model, "ollama chat response received");
        Ok(content)
    }

    /// Fetch the list of available models from the local server.
    ///
    /// Preserves server-provided order; entries without a name are skipped.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.endpoint);
        debug!(endpoint = %url, "fetching ollama model list");

        with_retry(&self.retry, "ollama", "list_models", || {
            self.list_models_once(&url)
        })
        .await
    }

    async fn list_models_once(&self, url: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.endpoint, self.timeout))?;

        let response = self.reject_error_status(response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.endpoint, self.timeout))?;

        let body: TagsBody = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "unexpected ollama tags response format");
            MuninnError::UnexpectedFormat(format!("ollama tags response: {e}"))
        })?;

        let names: Vec<String> = body
            .models
            .into_iter()
            .filter_map(|m| m.name)
            .filter(|n| !n.is_empty())
            .collect();

        debug!(count = names.len(), "ollama models discovered");
        Ok(names)
    }

    /// Map 429 and error statuses to the matching taxonomy entries.
    async fn reject_error_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status().as_u16();

        if status == 429 {
            debug!(endpoint = %self.endpoint, "got a 429 from ollama");
            return Err(MuninnError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, endpoint = %self.endpoint, "ollama API error");
            return Err(MuninnError::Provider { status, body });
        }

        Ok(response)
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<MessageBody<'a>>,
    stream: bool,
    options: OptionsBody,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OptionsBody {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    message: Option<ResponseMessageBody>,
}

#[derive(Deserialize)]
struct ResponseMessageBody {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TagsBody {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: Option<String>,
}
