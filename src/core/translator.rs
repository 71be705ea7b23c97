//! Provider capability consumed by the orchestrator

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::core::config::CloudConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::Engine;

/// A translation provider bound to one engine
#[async_trait]
pub trait Translator: Send + Sync {
    /// Engine this binding talks to
    fn engine(&self) -> Engine;

    /// Translate `text` between two concrete language codes
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;

    /// Detect the language of `text`
    async fn detect_language(&self, text: &str) -> Result<String>;
}

/// Builds a provider binding from the persisted configuration
pub trait TranslatorFactory: Send + Sync {
    fn build(&self, engine: Engine, config: &CloudConfig) -> Result<Arc<dyn Translator>>;
}

/// Stand-in for an engine whose construction failed.
///
/// Every call fails with the construction error, so a misconfigured
/// provider shows up as an ordinary provider failure.
pub struct UnavailableTranslator {
    engine: Engine,
    reason: String,
}

impl UnavailableTranslator {
    pub fn new(engine: Engine, reason: impl Into<String>) -> Self {
        Self {
            engine,
            reason: reason.into(),
        }
    }

    fn error(&self) -> TranslationError {
        TranslationError::EngineUnavailable {
            engine: self.engine,
            reason: self.reason.clone(),
        }
    }
}

#[async_trait]
impl Translator for UnavailableTranslator {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
        Err(self.error())
    }

    async fn detect_language(&self, _text: &str) -> Result<String> {
        Err(self.error())
    }
}

/// Engine to binding map handed to the orchestrator
#[derive(Clone, Default)]
pub struct TranslatorRegistry {
    translators: HashMap<Engine, Arc<dyn Translator>>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a binding for every known engine.
    ///
    /// A failed build is logged and replaced by an [`UnavailableTranslator`].
    pub fn from_config(config: &CloudConfig, factory: &dyn TranslatorFactory) -> Self {
        let mut registry = Self::new();
        for engine in Engine::ALL {
            let translator = match factory.build(engine, config) {
                Ok(translator) => translator,
                Err(e) => {
                    warn!("Engine {} not configured: {}", engine, e);
                    Arc::new(UnavailableTranslator::new(engine, e.to_string()))
                }
            };
            registry.insert(translator);
        }
        registry
    }

    /// Register a binding under its own engine, replacing any previous one
    pub fn insert(&mut self, translator: Arc<dyn Translator>) {
        self.translators.insert(translator.engine(), translator);
    }

    pub fn with(mut self, translator: Arc<dyn Translator>) -> Self {
        self.insert(translator);
        self
    }

    pub fn get(&self, engine: Engine) -> Option<Arc<dyn Translator>> {
        self.translators.get(&engine).cloned()
    }

    /// Binding for `engine`, or an `EngineUnavailable` error
    pub fn require(&self, engine: Engine) -> Result<Arc<dyn Translator>> {
        self.get(engine)
            .ok_or_else(|| TranslationError::EngineUnavailable {
                engine,
                reason: "no translator registered".to_string(),
            })
    }

    pub fn engines(&self) -> Vec<Engine> {
        Engine::ALL
            .into_iter()
            .filter(|e| self.translators.contains_key(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTranslator(Engine);

    #[async_trait]
    impl Translator for EchoTranslator {
        fn engine(&self) -> Engine {
            self.0
        }

        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(text.to_string())
        }

        async fn detect_language(&self, _text: &str) -> Result<String> {
            Ok("en".to_string())
        }
    }

    struct TencentOnlyFactory;

    impl TranslatorFactory for TencentOnlyFactory {
        fn build(&self, engine: Engine, _config: &CloudConfig) -> Result<Arc<dyn Translator>> {
            match engine {
                Engine::Tencent => Ok(Arc::new(EchoTranslator(engine))),
                Engine::Aliyun => Err(TranslationError::ConfigError {
                    message: "missing access key".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_registry_from_config_marks_failed_engines_unavailable() {
        let registry = TranslatorRegistry::from_config(&CloudConfig::default(), &TencentOnlyFactory);
        assert_eq!(registry.engines(), vec![Engine::Tencent, Engine::Aliyun]);

        let tencent = registry.require(Engine::Tencent).unwrap();
        assert_eq!(tencent.translate("hi", "en", "zh").await.unwrap(), "hi");

        let aliyun = registry.require(Engine::Aliyun).unwrap();
        let err = aliyun.translate("hi", "en", "zh").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::EngineUnavailable { engine: Engine::Aliyun, ref reason }
                if reason.contains("missing access key")
        ));
        assert!(aliyun.detect_language("hi").await.is_err());
    }

    #[test]
    fn test_registry_require_missing_engine() {
        let registry = TranslatorRegistry::new().with(Arc::new(EchoTranslator(Engine::Aliyun)));
        assert!(registry.get(Engine::Aliyun).is_some());
        assert!(matches!(
            registry.require(Engine::Tencent),
            Err(TranslationError::EngineUnavailable { engine: Engine::Tencent, .. })
        ));
    }
}
