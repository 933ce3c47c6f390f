//! Host-owned configuration surface and shared constants.
//!
//! The embedding application (options UI, note storage) owns these values
//! and hands them to the capability clients at construction time; nothing
//! here is persisted or cached by the library beyond a single client
//! instance.

use std::time::Duration;

use crate::types::ChatProvider;

/// Well-known local Ollama address, used when no override is configured.
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Retry attempts after the initial request, shared by every client.
pub const MAX_RETRIES: u32 = 10;

/// Base backoff delay; attempt `n` waits `RETRY_BASE * 2^n`.
pub const RETRY_BASE: Duration = Duration::from_secs(5);

/// Per-capability request timeouts.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
pub const TTS_TIMEOUT: Duration = Duration::from_secs(30);
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(45);
pub const OLLAMA_TIMEOUT: Duration = Duration::from_secs(180);

/// Default selections the host falls back to when the user has not chosen.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHAT_PROVIDER: ChatProvider = ChatProvider::OpenAi;
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_TTS_VOICE: &str = "alloy";

/// Configuration consumed by the capability clients.
///
/// Read at call time; the library never writes it. Timeouts are
/// independently configurable per capability and default to the shared
/// constants above.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Local Ollama endpoint override. `None` means the well-known default
    /// is used wherever a local attempt is made.
    pub ollama_endpoint: Option<String>,
    /// Base URL of the remote chat proxy. Remote chat without it is a
    /// configuration error.
    pub server_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub replicate_api_key: Option<String>,
    pub chat_timeout: Duration,
    pub tts_timeout: Duration,
    pub image_timeout: Duration,
    pub ollama_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ollama_endpoint: None,
            server_url: None,
            openai_api_key: None,
            replicate_api_key: None,
            chat_timeout: CHAT_TIMEOUT,
            tts_timeout: TTS_TIMEOUT,
            image_timeout: IMAGE_TIMEOUT,
            ollama_timeout: OLLAMA_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ollama_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ollama_endpoint = Some(endpoint.into());
        self
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    pub fn replicate_api_key(mut self, key: impl Into<String>) -> Self {
        self.replicate_api_key = Some(key.into());
        self
    }

    pub fn chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    pub fn tts_timeout(mut self, timeout: Duration) -> Self {
        self.tts_timeout = timeout;
        self
    }

    pub fn image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    pub fn ollama_timeout(mut self, timeout: Duration) -> Self {
        self.ollama_timeout = timeout;
        self
    }

    /// Configured Ollama endpoint, or the well-known local default.
    pub fn effective_ollama_endpoint(&self) -> &str {
        self.ollama_endpoint
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_ENDPOINT)
    }

    /// Whether any local endpoint has been explicitly configured.
    ///
    /// The TTS and image clients attempt the local provider first whenever
    /// this is true, regardless of the requested provider.
    pub fn has_local_endpoint(&self) -> bool {
        self.ollama_endpoint.is_some()
    }
}
