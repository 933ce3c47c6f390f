//! Image generation capability client.
//!
//! Local-first: when an Ollama endpoint is configured the local provider is
//! attempted first regardless of the requested provider, and a local
//! failure is logged and swallowed. The remote path creates a Replicate
//! prediction and downloads the first output URL.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::ollama::OllamaClient;
use super::parse_retry_after;
use super::retry::{RetryConfig, with_retry};
use crate::config::ClientConfig;
use crate::telemetry;
use crate::types::{ImageProvider, ImageRequest};
use crate::{MuninnError, Result};

/// Default base URL for the Replicate API.
const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Fallback prediction version for unrecognized models.
const DEFAULT_VERSION: &str = "black-forest-labs/flux-schnell";

/// Image generation capability client.
pub struct ImageClient {
    config: ClientConfig,
    retry: RetryConfig,
    http: Client,
    base_url: String,
}

impl ImageClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom remote base URL (for testing with wiremock).
    pub fn with_base_url(config: ClientConfig, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(config.image_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            retry: RetryConfig::default(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Override the retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Generate an image for the request.
    pub async fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let start = Instant::now();
        let result = self.dispatch(request).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => request.provider.as_str(),
            "operation" => "image",
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => request.provider.as_str(),
            "operation" => "image",
        )
        .record(start.elapsed().as_secs_f64());

        result
    }

    async fn dispatch(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        // Local attempt whenever an endpoint is configured, even if the
        // user selected a different provider. Failure falls through.
        if self.config.has_local_endpoint() {
            let endpoint = self.config.effective_ollama_endpoint();
            debug!(model = %request.model, endpoint, note_id = request.note_id, "attempting ollama image generation");

            let client = OllamaClient::with_timeout(endpoint, self.config.ollama_timeout)
                .retry_config(self.retry.clone());
            match client
                .chat(
                    &format!("Generate an image of: {}", request.prompt),
                    &request.model,
                    1.0,
                )
                .await
            {
                Ok(text) => return Ok(text.into_bytes()),
                Err(e) => {
                    debug!(error = %e, "ollama image generation failed, falling through");
                    metrics::counter!(telemetry::LOCAL_FALLBACKS_TOTAL, "operation" => "image")
                        .increment(1);
                }
            }
        }

        match request.provider {
            ImageProvider::Replicate => {
                let api_key = self.config.replicate_api_key.as_deref().ok_or_else(|| {
                    MuninnError::MissingCredentials {
                        provider: "replicate".to_string(),
                        capability: "image",
                    }
                })?;

                debug!(model = %request.model, "using replicate image provider");
                with_retry(&self.retry, "replicate", "image", || {
                    self.call_replicate(&request.prompt, &request.model, api_key)
                })
                .await
            }
            other => Err(MuninnError::UnsupportedProvider {
                provider: other.to_string(),
                capability: "image",
                options: "local Ollama with image models (flux-schnell, etc.), \
                          or replicate with an API key configured"
                    .to_string(),
            }),
        }
    }

    /// One prediction-creation attempt followed by the output download.
    async fn call_replicate(&self, prompt: &str, model: &str, api_key: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/predictions", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&PredictionBody {
                version: replicate_version(model),
                input: PredictionInput { prompt },
            })
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.base_url, self.config.image_timeout))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(MuninnError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status != 201 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, "replicate API error");
            return Err(MuninnError::Provider { status, body });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &self.base_url, self.config.image_timeout))?;
        // A malformed creation body is terminal: re-posting would create a
        // fresh (billable) prediction per retry.
        let body: PredictionResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "unexpected replicate response format");
            MuninnError::UnexpectedFormat(format!("replicate prediction response: {e}"))
        })?;

        let output_url = body
            .output
            .and_then(|urls| urls.into_iter().flatten().next())
            .ok_or(MuninnError::NoOutput)?;

        debug!(url = %output_url, "downloading replicate output");
        let image = self
            .http
            .get(&output_url)
            .send()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &output_url, self.config.image_timeout))?
            .bytes()
            .await
            .map_err(|e| MuninnError::from_reqwest(e, &output_url, self.config.image_timeout))?;

        Ok(image.to_vec())
    }
}

/// Map a model name to its Replicate prediction version.
fn replicate_version(model: &str) -> &'static str {
    match model {
        "flux-dev" => "black-forest-labs/flux-dev",
        "flux-schnell" => "black-forest-labs/flux-schnell",
        _ => DEFAULT_VERSION,
    }
}

#[derive(Serialize)]
struct PredictionBody<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct PredictionResponse {
    // Entries may be null; only non-null URLs count as output.
    output: Option<Vec<Option<String>>>,
}
