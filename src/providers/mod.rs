//! Capability clients and the local Ollama client.
//!
//! Each capability (chat, TTS, image) has one concrete client that routes
//! between the local Ollama server and its remote provider; `retry.rs`
//! holds the shared backoff loop they all delegate to.

pub mod chat;
pub mod image;
pub mod ollama;
pub mod retry;
pub mod tts;

pub use chat::ChatClient;
pub use image::ImageClient;
pub use ollama::OllamaClient;
pub use retry::RetryConfig;
pub use tts::TtsClient;

use std::time::Duration;

use reqwest::header::HeaderMap;

/// Parse a `Retry-After` header (seconds form) from a rate-limit response.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
