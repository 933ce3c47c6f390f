//! Text-to-speech capability client.
//!
//! Local-first: when an Ollama endpoint is configured (or explicitly
//! requested) the local provider is attempted before any remote call, and
//! a local failure is logged and swallowed rather than propagated.

use std::time::Instant;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use super::ollama::OllamaClient;
use super::retry::RetryConfig;
use crate::config::ClientConfig;
use crate::telemetry;
use crate::types::{TtsProvider, TtsRequest};
use crate::{MuninnError, Result};

/// Default base URL for the OpenAI speech API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Text-to-speech capability client.
pub struct TtsClient {
    config: ClientConfig,
    retry: RetryConfig,
    http: Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom remote base URL (for testing with wiremock).
    pub fn with_base_url(config: ClientConfig, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(config.tts_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            retry: RetryConfig::default(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Override the retry policy used by the local attempt.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Get speech audio for the request.
    pub async fn tts(&self, request: &TtsRequest) -> Result<Vec<u8>> {
        let start = Instant::now();
        let result = self.dispatch(request).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => request.provider.as_str(),
            "operation" => "tts",
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => request.provider.as_str(),
            "operation" => "tts",
        )
        .record(start.elapsed().as_secs_f64());

        result
    }

    async fn dispatch(&self, request: &TtsRequest) -> Result<Vec<u8>> {
        let input = if request.strip_html {
            strip_html(&request.input)
        } else {
            request.input.clone()
        };

        // Local attempt whenever an endpoint is configured, or on explicit
        // request. Failure here falls through to the remote provider.
        if self.config.has_local_endpoint() || request.provider == TtsProvider::Ollama {
            let endpoint = self.config.effective_ollama_endpoint();
            debug!(model = %request.model, endpoint, note_id = request.note_id, "attempting ollama tts");

            let client = OllamaClient::with_timeout(endpoint, self.config.ollama_timeout)
                .retry_config(self.retry.clone());
            match client
                .chat(&format!("Convert to speech: {input}"), &request.model, 1.0)
                .await
            {
                Ok(text) => return Ok(text.into_bytes()),
                Err(e) => {
                    debug!(error = %e, "ollama tts failed, falling through");
                    metrics::counter!(telemetry::LOCAL_FALLBACKS_TOTAL, "operation" => "tts")
                        .increment(1);
                }
            }
        }

        match request.provider {
            TtsProvider::OpenAi => {
                let api_key = self.config.openai_api_key.as_deref().ok_or_else(|| {
                    MuninnError::MissingCredentials {
                        provider: "openai".to_string(),
                        capability: "tts",
                    }
                })?;

                debug!(model = %request.model, voice = %request.voice, "using openai tts");
                self.call_openai(&input, &request.model, &request.voice, api_key)
                    .await
            }
            // The local attempt above already failed or was unavailable.
            other => Err(MuninnError::UnsupportedProvider {
                provider: other.to_string(),
                capability: "tts",
                options: "local Ollama, or openai with an API key configured".to_string(),
            }),
        }
    }

    async fn call_openai(
        &self,
        input: &str,
        model: &str,
        voice: &str,
        api_key: &str,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/v1/audio/speech", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&SpeechBody {
                model,
                input,
                voice,
            })
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.base_url, self.config.tts_timeout))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, "openai tts error");
            return Err(MuninnError::Provider { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.base_url, self.config.tts_timeout))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

/// Drop HTML tags from note content before speaking it.
fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
