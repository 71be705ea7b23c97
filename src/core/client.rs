//! Single and multi-engine translation orchestration

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::config::CloudConfig;
use crate::core::engines::normalize_engines;
use crate::core::errors::Result;
use crate::core::language::{detect_best_effort, detect_with, resolve_source, LanguagePair};
use crate::core::models::{
    Engine, EngineTranslationResult, MultiTranslationResult, SingleTranslationResult,
};
use crate::core::picker::pick_best_by_median_length;
use crate::core::translator::{TranslatorFactory, TranslatorRegistry};

/// Translation client dispatching to one or more engines
#[derive(Clone)]
pub struct TranslateClient {
    registry: Arc<TranslatorRegistry>,
}

impl TranslateClient {
    /// Create a client over already constructed engine bindings
    pub fn new(registry: TranslatorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build every engine binding from `config` through `factory`
    pub fn from_config(config: &CloudConfig, factory: &dyn TranslatorFactory) -> Self {
        Self::new(TranslatorRegistry::from_config(config, factory))
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    /// Translate with one engine.
    ///
    /// Detection (for an `auto`/empty source) and translation both run on
    /// `engine`; any failure fails the call.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        engine: &str,
    ) -> Result<SingleTranslationResult> {
        let engine: Engine = engine.parse()?;
        let translator = self.registry.require(engine)?;

        let resolved = resolve_source(source, || detect_with(translator.as_ref(), text)).await?;
        let pair = LanguagePair::resolve(resolved, target);
        debug!("Translating via {}: {} -> {}", engine, pair.source, pair.target);

        let text = translator.translate(text, &pair.source, &pair.target).await?;

        Ok(SingleTranslationResult {
            source: source.to_string(),
            auto_src: pair.source,
            target: pair.target,
            text,
        })
    }

    /// Translate with several engines concurrently.
    ///
    /// Languages are resolved once for the whole set. Only a detection
    /// failure fails the call; provider failures are recorded per engine.
    pub async fn translate_multi<S: AsRef<str>>(
        &self,
        text: &str,
        source: &str,
        target: &str,
        engines: &[S],
        pick_best: bool,
    ) -> Result<MultiTranslationResult> {
        let engines = normalize_engines(engines);

        let resolved =
            resolve_source(source, || detect_best_effort(&self.registry, &engines, text)).await?;
        let pair = LanguagePair::resolve(resolved, target);
        info!(
            "Fan-out to {} engines: {} -> {}",
            engines.len(),
            pair.source,
            pair.target
        );

        let results = self.fan_out(text, &pair, &engines).await;

        let (best_engine, best_text) = if pick_best {
            match pick_best_by_median_length(&engines, &results) {
                Some((engine, text)) => (Some(engine), Some(text)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        Ok(MultiTranslationResult {
            source: source.to_string(),
            auto_src: pair.source,
            target: pair.target,
            best_engine,
            best_text,
            results,
        })
    }

    /// One task per engine, joined before returning
    async fn fan_out(
        &self,
        text: &str,
        pair: &LanguagePair,
        engines: &[Engine],
    ) -> HashMap<Engine, EngineTranslationResult> {
        let results = Arc::new(Mutex::new(HashMap::with_capacity(engines.len())));
        let mut handles = Vec::with_capacity(engines.len());

        for &engine in engines {
            let registry = Arc::clone(&self.registry);
            let results = Arc::clone(&results);
            let text = text.to_string();
            let pair = pair.clone();

            let handle = tokio::spawn(async move {
                let outcome = match registry.require(engine) {
                    Ok(translator) => translator.translate(&text, &pair.source, &pair.target).await,
                    Err(e) => Err(e),
                };

                let entry = match outcome {
                    Ok(out) => EngineTranslationResult::success(engine, out),
                    Err(e) => {
                        warn!("Engine {} failed: {}", engine, e);
                        EngineTranslationResult::failure(engine, e.to_string())
                    }
                };

                results.lock().await.insert(engine, entry);
            });
            handles.push((engine, handle));
        }

        for (engine, handle) in handles {
            if let Err(e) = handle.await {
                warn!("Engine {} task aborted: {}", engine, e);
                results.lock().await.insert(
                    engine,
                    EngineTranslationResult::failure(engine, format!("task aborted: {}", e)),
                );
            }
        }

        let mut results = results.lock().await;
        std::mem::take(&mut *results)
    }
}
