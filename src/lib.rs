//! Muninn - Local-first client layer for LLM chat, TTS, and image APIs
//!
//! This crate is the outbound-call layer of a note-editing assistant: one
//! client per capability (chat, text-to-speech, image generation) that
//! routes between a locally-running Ollama server and cloud providers,
//! with bounded exponential-backoff retry for rate limits and transient
//! failures. The embedding application owns configuration (endpoint,
//! API keys, model selections) and consumes the clients' return values.
//!
//! # Chat Example
//!
//! ```rust,no_run
//! use muninn::{ChatClient, ChatRequest, ClientConfig, types::ChatProvider};
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let config = ClientConfig::new().ollama_endpoint("http://localhost:11434");
//!     let client = ChatClient::new(config);
//!
//!     let reply = client
//!         .chat(&ChatRequest::new(
//!             "Give a mnemonic for the capital of France.",
//!             "llama3.2",
//!             ChatProvider::Ollama,
//!         ))
//!         .await?;
//!
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! Calls suspend only at network I/O and backoff sleeps; dropping a call
//! future aborts both the in-flight request and any pending retry.

pub mod config;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use config::{ClientConfig, OLLAMA_DEFAULT_ENDPOINT};
pub use error::{MuninnError, Result};
pub use providers::{ChatClient, ImageClient, OllamaClient, RetryConfig, TtsClient};
pub use types::{ChatRequest, ImageRequest, TtsRequest};
