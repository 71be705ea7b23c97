//! Main entry point for Simple Translate CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simple_translate::cli::commands::{self, load_config, Commands};

/// Simple Translate - Tencent / Aliyun translation from the command line
#[derive(Parser, Debug)]
#[command(name = "simple-translate", version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.simple_translate/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("simple_translate={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config_path, config) = load_config(args.config)?;

    match args.command {
        Commands::Translate {
            text,
            source,
            target,
            engine,
        } => {
            commands::handle_translate(config, text, source, target, engine).await?;
        }
        Commands::Multi {
            text,
            source,
            target,
            engines,
            pick_best,
        } => {
            commands::handle_multi(config, text, source, target, engines, pick_best).await?;
        }
        Commands::Serve { host, port } => {
            commands::handle_serve(config_path, config, host, port).await?;
        }
        Commands::Config { action } => {
            commands::handle_config(config_path, config, action)?;
        }
    }

    Ok(())
}
