//! Mandi Server
//!
//! REST API for commodity price forecasts and rankings.

use anyhow::Context;
use clap::Parser;
use mandi_engine::EngineConfig;
use mandi_server::config::{build_config, CliArgs as ConfigCliArgs};
use mandi_server::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mandi Server - REST API for commodity price forecasts
#[derive(Parser, Debug)]
#[command(name = "mandi_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Server configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Engine configuration file (commodity map, model)
    #[arg(short, long, value_name = "FILE", env = "MANDI_ENGINE_CONFIG")]
    engine: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "MANDI_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MANDI_SERVER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MANDI_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            engine_config: args.engine,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_engine_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    let mut engine = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    engine.apply_env()?;
    engine.validate()?;
    Ok(engine)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    init_tracing(config.log_level.as_filter_str());

    let engine = load_engine_config(config.engine_config.as_ref())?;

    tracing::info!("Mandi Server v{}", mandi_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        warm_up = config.warm_up,
        commodities = engine.commodities.len(),
        model = engine.model.name(),
        "Server configuration loaded"
    );

    let server = Server::new(config, &engine);
    if server.config().warm_up {
        server
            .warm_up()
            .await
            .context("initialising commodity registry")?;
    }
    tracing::info!(address = %server.socket_addr(), "Starting server");

    server.run().await?;

    Ok(())
}
