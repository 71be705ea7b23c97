//! Custom error types for translation operations

use thiserror::Error;

use crate::core::models::Engine;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Source language could not be detected
    #[error("Language identification failed: {reason}")]
    LanguageIdentification {
        reason: String,
    },

    /// Engine identifier outside the known set
    #[error("Unknown engine: {engine}")]
    UnknownEngine {
        engine: String,
    },

    /// Engine could not be constructed from its configuration
    #[error("Engine {engine} unavailable: {reason}")]
    EngineUnavailable {
        engine: Engine,
        reason: String,
    },

    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Provider returned an error envelope
    #[error("Provider error: {code} - {message}")]
    ProviderError {
        code: String,
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
