//! Cloud provider bindings

pub mod aliyun;
pub mod signing;
pub mod tencent;

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::CloudConfig;
use crate::core::errors::Result;
use crate::core::models::Engine;
use crate::core::translator::{Translator, TranslatorFactory};

pub use aliyun::AliyunTranslator;
pub use tencent::TencentTranslator;

/// Builds the HTTP bindings for Tencent and Aliyun
#[derive(Debug, Clone, Default)]
pub struct DefaultTranslatorFactory;

impl DefaultTranslatorFactory {
    fn http_client(config: &CloudConfig) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(client)
    }
}

impl TranslatorFactory for DefaultTranslatorFactory {
    fn build(&self, engine: Engine, config: &CloudConfig) -> Result<Arc<dyn Translator>> {
        let http = Self::http_client(config)?;
        let service = config.service(engine);
        let translator: Arc<dyn Translator> = match engine {
            Engine::Tencent => Arc::new(TencentTranslator::new(http, service)?),
            Engine::Aliyun => Arc::new(AliyunTranslator::new(http, service)?),
        };
        Ok(translator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TranslationError;
    use crate::core::translator::TranslatorRegistry;

    #[tokio::test]
    async fn test_unconfigured_engines_fail_per_call() {
        let registry = TranslatorRegistry::from_config(&CloudConfig::default(), &DefaultTranslatorFactory);
        let tencent = registry.require(Engine::Tencent).unwrap();

        let err = tencent.translate("hello", "en", "zh").await.unwrap_err();
        assert!(matches!(err, TranslationError::EngineUnavailable { engine: Engine::Tencent, .. }));
    }

    #[test]
    fn test_build_configured_engine() {
        let mut config = CloudConfig::default();
        config.aliyun.secret_id = "LTAIid".to_string();
        config.aliyun.secret_key = "secret".to_string();

        let translator = DefaultTranslatorFactory.build(Engine::Aliyun, &config).unwrap();
        assert_eq!(translator.engine(), Engine::Aliyun);
        assert!(DefaultTranslatorFactory.build(Engine::Tencent, &config).is_err());
    }
}
