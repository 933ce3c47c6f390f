//! Shared types: provider sets, model lists, and per-call requests.

pub mod model;
pub mod provider;
pub mod request;

pub use model::{
    ANTHROPIC_CHAT_MODELS, DEEPSEEK_CHAT_MODELS, OLLAMA_FALLBACK_CHAT_MODELS, OPENAI_CHAT_MODELS,
    OPENAI_TTS_MODELS, OPENAI_TTS_VOICES, REPLICATE_IMAGE_MODELS, chat_models_for,
    validate_chat_model,
};
pub use provider::{ChatProvider, ImageProvider, TtsProvider};
pub use request::{ChatRequest, ImageRequest, TtsRequest};
