//! Static model lists and the provider → model mapping.
//!
//! Cloud model lists are closed: a request for a model outside its
//! provider's list is rejected before any network call. The Ollama list is
//! only a fallback for hosts that could not reach the live server —
//! [`OllamaClient::list_models`](crate::providers::OllamaClient::list_models)
//! is the source of truth and may legitimately differ from it.

use crate::types::ChatProvider;
use crate::{MuninnError, Result};

pub const OPENAI_CHAT_MODELS: &[&str] = &[
    "gpt-5-mini",
    "gpt-5-chat-latest",
    "gpt-5",
    "gpt-5-nano",
    "gpt-4o-mini",
];

pub const ANTHROPIC_CHAT_MODELS: &[&str] = &[
    "claude-opus-4-1",
    "claude-sonnet-4-0",
    "claude-3-5-haiku-latest",
];

pub const DEEPSEEK_CHAT_MODELS: &[&str] = &["deepseek-v3"];

/// Fallback list shown when live Ollama model discovery is unavailable.
pub const OLLAMA_FALLBACK_CHAT_MODELS: &[&str] = &[
    "llama3.2",
    "llama3.1",
    "llama2",
    "mistral",
    "phi3",
    "gemma2",
    "qwen2.5",
    "codellama",
];

pub const OPENAI_TTS_MODELS: &[&str] = &["tts-1", "tts-1-hd"];

pub const OPENAI_TTS_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

pub const REPLICATE_IMAGE_MODELS: &[&str] = &["flux-dev", "flux-schnell"];

/// Declared chat model list for a provider.
///
/// For Ollama this is only the static fallback; the live list comes from
/// the server.
pub fn chat_models_for(provider: ChatProvider) -> &'static [&'static str] {
    match provider {
        ChatProvider::OpenAi => OPENAI_CHAT_MODELS,
        ChatProvider::Anthropic => ANTHROPIC_CHAT_MODELS,
        ChatProvider::DeepSeek => DEEPSEEK_CHAT_MODELS,
        ChatProvider::Ollama => OLLAMA_FALLBACK_CHAT_MODELS,
    }
}

/// Validate that a cloud chat model belongs to its provider's declared list.
///
/// Ollama models are accepted as-is: the live server's list is authoritative
/// and refreshed dynamically.
pub fn validate_chat_model(provider: ChatProvider, model: &str) -> Result<()> {
    if provider == ChatProvider::Ollama {
        return Ok(());
    }
    if chat_models_for(provider).contains(&model) {
        Ok(())
    } else {
        Err(MuninnError::Configuration(format!(
            "unknown model '{model}' for chat provider '{provider}' (available: {})",
            chat_models_for(provider).join(", ")
        )))
    }
}
