//! Source/target language resolution

use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Engine;
use crate::core::translator::{Translator, TranslatorRegistry};

/// Source value asking for detection instead of a caller-supplied code
pub const AUTO: &str = "auto";

/// Whether `source` requests auto-detection (empty or `auto`)
pub fn is_auto(source: &str) -> bool {
    let source = source.trim();
    source.is_empty() || source.eq_ignore_ascii_case(AUTO)
}

/// Target used when the resolved source equals the requested target
pub fn fallback_target(source: &str) -> &'static str {
    match source {
        "zh" => "en",
        "en" => "zh",
        _ => "en",
    }
}

/// Concrete language pair a translation runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    /// Apply the same-language fallback to an already resolved source
    pub fn resolve(source: impl Into<String>, target: &str) -> Self {
        let source = source.into();
        let target = if source == target {
            fallback_target(&source).to_string()
        } else {
            target.to_string()
        };
        Self { source, target }
    }
}

/// Detect with one engine; an error or an empty answer is an identification failure
pub async fn detect_with(translator: &dyn Translator, text: &str) -> Result<String> {
    let engine = translator.engine();
    match translator.detect_language(text).await {
        Ok(lang) if !lang.trim().is_empty() => {
            debug!("Engine {} detected language {}", engine, lang);
            Ok(lang.trim().to_string())
        }
        Ok(_) => Err(TranslationError::LanguageIdentification {
            reason: format!("{} returned no language", engine),
        }),
        Err(e) => Err(TranslationError::LanguageIdentification {
            reason: format!("{}: {}", engine, e),
        }),
    }
}

/// Detect once for a whole engine set, trying engines in preference order
pub async fn detect_best_effort(
    registry: &TranslatorRegistry,
    engines: &[Engine],
    text: &str,
) -> Result<String> {
    let mut failures = Vec::with_capacity(engines.len());

    for &engine in engines {
        let outcome = match registry.require(engine) {
            Ok(translator) => detect_with(translator.as_ref(), text).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(lang) => return Ok(lang),
            Err(e) => {
                warn!("Language detection via {} failed: {}", engine, e);
                failures.push(e.to_string());
            }
        }
    }

    Err(TranslationError::LanguageIdentification {
        reason: format!("no engine could detect the language ({})", failures.join("; ")),
    })
}

/// Resolve the source from the request, detecting with `detect` when asked to
pub async fn resolve_source<F, Fut>(source: &str, detect: F) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<String>>,
{
    if is_auto(source) {
        detect().await
    } else {
        Ok(source.to_string())
    }
}
