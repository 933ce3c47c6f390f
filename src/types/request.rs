//! Per-call request types.
//!
//! Immutable once built; `note_id` correlates a call with the host's note
//! for logging and the chat proxy's telemetry field, defaulting to -1 for
//! calls made outside a note context.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_TEMPERATURE, DEFAULT_TTS_VOICE};
use crate::types::{ChatProvider, ImageProvider, TtsProvider};

/// A single chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub model: String,
    pub provider: ChatProvider,
    pub note_id: i64,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, provider: ChatProvider) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            provider,
            note_id: -1,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn note_id(mut self, note_id: i64) -> Self {
        self.note_id = note_id;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A single text-to-speech request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    pub input: String,
    pub model: String,
    pub provider: TtsProvider,
    pub voice: String,
    pub strip_html: bool,
    pub note_id: i64,
}

impl TtsRequest {
    pub fn new(input: impl Into<String>, model: impl Into<String>, provider: TtsProvider) -> Self {
        Self {
            input: input.into(),
            model: model.into(),
            provider,
            voice: DEFAULT_TTS_VOICE.to_string(),
            strip_html: false,
            note_id: -1,
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn strip_html(mut self, strip: bool) -> Self {
        self.strip_html = strip;
        self
    }

    pub fn note_id(mut self, note_id: i64) -> Self {
        self.note_id = note_id;
        self
    }
}

/// A single image generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    pub provider: ImageProvider,
    pub note_id: i64,
}

impl ImageRequest {
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        provider: ImageProvider,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            provider,
            note_id: -1,
        }
    }

    pub fn note_id(mut self, note_id: i64) -> Self {
        self.note_id = note_id;
        self
    }
}
