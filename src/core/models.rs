//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;

/// Translation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Tencent Cloud machine translation (TMT)
    Tencent,
    /// Aliyun machine translation (alimt)
    Aliyun,
}

impl Engine {
    /// Every known engine, in default preference order
    pub const ALL: [Engine; 2] = [Engine::Tencent, Engine::Aliyun];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Tencent => "tencent",
            Engine::Aliyun => "aliyun",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = TranslationError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Engine::ALL
            .into_iter()
            .find(|e| e.as_str() == tag)
            .ok_or_else(|| TranslationError::UnknownEngine {
                engine: s.to_string(),
            })
    }
}

/// Result of a single-engine translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleTranslationResult {
    /// Source language as requested, possibly `auto`
    pub source: String,
    /// Source language actually used
    pub auto_src: String,
    /// Target language actually used
    pub target: String,
    pub text: String,
}

/// One engine's outcome within a multi-engine translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTranslationResult {
    pub engine: Engine,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EngineTranslationResult {
    pub fn success(engine: Engine, text: impl Into<String>) -> Self {
        Self {
            engine,
            text: text.into(),
            error: None,
        }
    }

    pub fn failure(engine: Engine, error: impl Into<String>) -> Self {
        Self {
            engine,
            text: String::new(),
            error: Some(error.into()),
        }
    }

    /// Populated, non-blank text and no error
    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.text.trim().is_empty()
    }
}

/// Result of a multi-engine translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTranslationResult {
    pub source: String,
    pub auto_src: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_engine: Option<Engine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_text: Option<String>,
    /// Keyed by engine; iteration order carries no meaning
    pub results: HashMap<Engine, EngineTranslationResult>,
}
