//! Simple Translate - multi-engine translation orchestration
//!
//! This library resolves source/target languages, dispatches a request to
//! one or several cloud translation engines concurrently, and optionally
//! picks a single best result. Tencent and Aliyun bindings, an HTTP API
//! and a CLI are included.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

// Re-export key types for convenience
pub use core::{
    client::TranslateClient,
    config::{CloudConfig, ServiceConfig},
    errors::{Result, TranslationError},
    models::{Engine, EngineTranslationResult, MultiTranslationResult, SingleTranslationResult},
    translator::{Translator, TranslatorFactory, TranslatorRegistry},
};

pub use providers::DefaultTranslatorFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
