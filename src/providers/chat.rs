//! Chat capability client.
//!
//! Routes `ollama` requests to the local client and everything else to the
//! remote chat proxy, normalising both into a plain text response.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::ollama::OllamaClient;
use super::parse_retry_after;
use super::retry::{RetryConfig, with_retry};
use crate::config::ClientConfig;
use crate::telemetry;
use crate::types::{ChatProvider, ChatRequest, validate_chat_model};
use crate::{MuninnError, Result};

/// Chat capability client.
pub struct ChatClient {
    config: ClientConfig,
    retry: RetryConfig,
    http: Client,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.chat_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            retry: RetryConfig::default(),
            http,
        }
    }

    /// Override the retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Get a chat response for the request.
    ///
    /// Provider `ollama` delegates to the local client and its errors
    /// propagate unmodified; cloud providers go through the remote chat
    /// proxy, where an empty `messages` list is a valid "no answer" and
    /// yields an empty string.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let start = Instant::now();
        let result = self.dispatch(request).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => request.provider.as_str(),
            "operation" => "chat",
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => request.provider.as_str(),
            "operation" => "chat",
        )
        .record(start.elapsed().as_secs_f64());

        result
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<String> {
        if request.provider == ChatProvider::Ollama {
            let endpoint = self.config.effective_ollama_endpoint();
            debug!(model = %request.model, endpoint, note_id = request.note_id, "using ollama chat provider");

            let client = OllamaClient::with_timeout(endpoint, self.config.ollama_timeout)
                .retry_config(self.retry.clone());
            return client
                .chat(&request.prompt, &request.model, request.temperature)
                .await;
        }

        validate_chat_model(request.provider, &request.model)?;

        let server_url = self.config.server_url.as_deref().ok_or_else(|| {
            MuninnError::Configuration(
                "chat proxy URL is not configured; set server_url or use the ollama provider"
                    .to_string(),
            )
        })?;
        let url = format!("{server_url}/chat");

        let msg = with_retry(&self.retry, request.provider.as_str(), "chat", || {
            self.proxy_chat_once(&url, request)
        })
        .await?;

        debug!(
            provider = %request.provider,
            model = %request.model,
            temperature = request.temperature,
            note_id = request.note_id,
            "chat proxy response received"
        );
        Ok(msg)
    }

    async fn proxy_chat_once(&self, url: &str, request: &ChatRequest) -> Result<String> {
        let response = self
            .http
            .post(url)
            .json(&ProxyChatBody {
                provider: request.provider,
                model: &request.model,
                message: &request.prompt,
                temperature: request.temperature,
                note_id: request.note_id,
            })
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, url, self.config.chat_timeout))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(MuninnError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, provider = %request.provider, "chat proxy error");
            return Err(MuninnError::Provider { status, body });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, url, self.config.chat_timeout))?;
        let body: ProxyChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "unexpected chat proxy response format");
            MuninnError::UnexpectedFormat(format!("chat proxy response: {e}"))
        })?;

        // An empty message list is a valid "no answer", not an error.
        match body.messages.into_iter().next() {
            Some(msg) => Ok(msg),
            None => {
                debug!(provider = %request.provider, "empty response from chat provider");
                Ok(String::new())
            }
        }
    }
}

#[derive(Serialize)]
struct ProxyChatBody<'a> {
    provider: ChatProvider,
    model: &'a str,
    message: &'a str,
    temperature: f32,
    note_id: i64,
}

#[derive(Deserialize)]
struct ProxyChatResponse {
    messages: Vec<String>,
}
