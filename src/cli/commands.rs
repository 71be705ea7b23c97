//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::client::TranslateClient;
use crate::core::config::CloudConfig;
use crate::core::models::{MultiTranslationResult, SingleTranslationResult};
use crate::providers::DefaultTranslatorFactory;

/// Commands for Simple Translate
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate text with one engine
    Translate {
        /// Text to translate
        text: String,

        /// Source language (auto-detect by default)
        #[arg(short, long, default_value = "auto")]
        source: String,

        /// Target language (default: zh)
        #[arg(short, long, default_value = "zh")]
        target: String,

        /// Engine: tencent or aliyun (default: from config)
        #[arg(short, long)]
        engine: Option<String>,
    },

    /// Translate text with several engines side by side
    Multi {
        /// Text to translate
        text: String,

        /// Source language (auto-detect by default)
        #[arg(short, long, default_value = "auto")]
        source: String,

        /// Target language (default: zh)
        #[arg(short, long, default_value = "zh")]
        target: String,

        /// Comma-separated engines (default: from config, else all)
        #[arg(short, long, value_delimiter = ',')]
        engines: Vec<String>,

        /// Pick a single best result
        #[arg(long)]
        pick_best: bool,
    },

    /// Start HTTP API server
    Serve {
        /// Bind address (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },

    /// Inspect the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration with secrets masked
    Show,
    /// Print the configuration file location
    Path,
}

/// Load config from `path` (or the default location) with env overrides
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<(PathBuf, CloudConfig)> {
    let path = match path {
        Some(path) => path,
        None => CloudConfig::default_path()?,
    };
    let mut config = CloudConfig::load(&path)?;
    config.apply_env_overrides();
    config.validate();
    Ok((path, config))
}

fn client(config: &CloudConfig) -> TranslateClient {
    TranslateClient::from_config(config, &DefaultTranslatorFactory)
}

fn print_single(result: &SingleTranslationResult) {
    println!("[{} -> {}] {}", result.auto_src, result.target, result.text);
}

fn print_multi(result: &MultiTranslationResult, order: &[String]) {
    println!("{} -> {}", result.auto_src, result.target);

    let mut engines: Vec<_> = result.results.values().collect();
    // requested order first, then the rest alphabetically
    engines.sort_by_key(|r| {
        let rank = order
            .iter()
            .position(|e| e.trim().eq_ignore_ascii_case(r.engine.as_str()))
            .unwrap_or(usize::MAX);
        (rank, r.engine.as_str())
    });

    for entry in engines {
        match &entry.error {
            Some(error) => println!("  {:<8} ❌ {}", entry.engine, error),
            None => println!("  {:<8} {}", entry.engine, entry.text),
        }
    }

    if let (Some(engine), Some(text)) = (&result.best_engine, &result.best_text) {
        println!("\n✅ Best ({}): {}", engine, text);
    }
}

/// Handle single-engine translation command
pub async fn handle_translate(
    config: CloudConfig,
    text: String,
    source: String,
    target: String,
    engine: Option<String>,
) -> anyhow::Result<()> {
    let engine = engine.unwrap_or_else(|| config.default_engine().to_string());
    info!("Translating with {}", engine);

    let result = client(&config)
        .translate(&text, &source, &target, &engine)
        .await?;
    print_single(&result);

    Ok(())
}

/// Handle multi-engine translation command
pub async fn handle_multi(
    config: CloudConfig,
    text: String,
    source: String,
    target: String,
    engines: Vec<String>,
    pick_best: bool,
) -> anyhow::Result<()> {
    let engines = if engines.is_empty() {
        config.compare_engines.clone()
    } else {
        engines
    };
    let pick_best = pick_best || config.pick_best;

    let result = client(&config)
        .translate_multi(&text, &source, &target, engines.as_slice(), pick_best)
        .await?;
    print_multi(&result, &engines);

    Ok(())
}

/// Handle server command
pub async fn handle_serve(
    config_path: PathBuf,
    config: CloudConfig,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    use crate::server::api::{run_server, AppState};

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Server starting on http://{}:{}", host, port);

    let state = AppState::new(config_path, config, Arc::new(DefaultTranslatorFactory));
    run_server(host, port, state).await?;

    Ok(())
}

/// Handle config command
pub fn handle_config(config_path: PathBuf, config: CloudConfig, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
