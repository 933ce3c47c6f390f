//! Closed provider sets per capability.
//!
//! Each capability routes over a small fixed set of provider names; an
//! unrecognized name is a configuration error listing the valid options,
//! never a panic. Ollama model names are discovered live and are the only
//! open-ended part of the surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MuninnError, Result};

fn unsupported(provider: &str, capability: &'static str, options: &[&str]) -> MuninnError {
    MuninnError::UnsupportedProvider {
        provider: provider.to_string(),
        capability,
        options: options.join(", "),
    }
}

// ============================================================================
// Chat
// ============================================================================

/// Chat completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    OpenAi,
    Anthropic,
    DeepSeek,
    Ollama,
}

impl ChatProvider {
    pub const ALL: [ChatProvider; 4] = [
        ChatProvider::OpenAi,
        ChatProvider::Anthropic,
        ChatProvider::DeepSeek,
        ChatProvider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatProvider::OpenAi => "openai",
            ChatProvider::Anthropic => "anthropic",
            ChatProvider::DeepSeek => "deepseek",
            ChatProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatProvider {
    type Err = MuninnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(ChatProvider::OpenAi),
            "anthropic" => Ok(ChatProvider::Anthropic),
            "deepseek" => Ok(ChatProvider::DeepSeek),
            "ollama" => Ok(ChatProvider::Ollama),
            other => Err(unsupported(
                other,
                "chat",
                &["openai", "anthropic", "deepseek", "ollama"],
            )),
        }
    }
}

// ============================================================================
// TTS
// ============================================================================

/// Text-to-speech providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    OpenAi,
    Ollama,
}

impl TtsProvider {
    pub const ALL: [TtsProvider; 2] = [TtsProvider::OpenAi, TtsProvider::Ollama];

    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProvider::OpenAi => "openai",
            TtsProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for TtsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TtsProvider {
    type Err = MuninnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(TtsProvider::OpenAi),
            "ollama" => Ok(TtsProvider::Ollama),
            other => Err(unsupported(other, "tts", &["openai", "ollama"])),
        }
    }
}

// ============================================================================
// Image
// ============================================================================

/// Image generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    Replicate,
    Ollama,
}

impl ImageProvider {
    pub const ALL: [ImageProvider; 2] = [ImageProvider::Replicate, ImageProvider::Ollama];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageProvider::Replicate => "replicate",
            ImageProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageProvider {
    type Err = MuninnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "replicate" => Ok(ImageProvider::Replicate),
            "ollama" => Ok(ImageProvider::Ollama),
            other => Err(unsupported(other, "image", &["replicate", "ollama"])),
        }
    }
}
