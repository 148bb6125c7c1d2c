//! Mandi CLI - command line queries against the commodity forecast engine
//!
//! # Commands
//!
//! - `mandi winners` / `mandi losers` - next-month rankings
//! - `mandi summary --months 6` - top gainer and loser per month
//! - `mandi forecast <name> --horizon 6` - monthly price forecast
//! - `mandi current <name>` / `mandi previous <name>` - anchor and trailing views
//! - `mandi resolve <name>` - map a user-entered name to a commodity
//! - `mandi commodities` - list trained commodities and failures

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::market::Side;
use config::{EngineOptions, ModelChoice};
use output::OutputFormat;

/// Commodity price forecasting and ranking
#[derive(Parser)]
#[command(name = "mandi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "MANDI_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory that relative table paths are resolved against
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Training seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Anchor month (YYYY-MM or "current")
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Model family
    #[arg(long, global = true, value_enum)]
    model: Option<ModelChoice>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commodities with the largest predicted gain next month
    Winners,

    /// Commodities with the largest predicted loss next month
    Losers,

    /// Top gainer and loser for each upcoming month
    Summary {
        /// Number of months to cover
        #[arg(short, long, default_value_t = 6)]
        months: u32,
    },

    /// Monthly forecast for one commodity
    Forecast {
        /// Commodity name
        name: String,

        /// Months to forecast
        #[arg(long, default_value_t = 6)]
        horizon: u32,
    },

    /// Prediction for the anchor month
    Current {
        /// Commodity name
        name: String,
    },

    /// Prices for the twelve months ending at the anchor
    Previous {
        /// Commodity name
        name: String,
    },

    /// Resolve a user-entered name
    Resolve {
        /// Name to resolve
        name: String,

        /// Fall back to a capitalised guess when nothing matches
        #[arg(long)]
        guess: bool,
    },

    /// List trained commodities
    Commodities,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(out) => print!("{}", out),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let options = EngineOptions {
        config: cli.config,
        data_root: cli.data_root,
        seed: cli.seed,
        as_of: cli.as_of,
        model: cli.model,
    };
    let engine = config::load_engine_config(&options)?;
    debug!(commodities = engine.commodities.len(), "Engine configuration loaded");

    let registry = config::open_registry(&engine)?;
    let format = cli.format;

    match cli.command {
        Commands::Winners => commands::market::run(&registry, Side::Winners, format),
        Commands::Losers => commands::market::run(&registry, Side::Losers, format),
        Commands::Summary { months } => commands::market::summary(&registry, months, format),
        Commands::Forecast { name, horizon } => {
            commands::commodity::forecast(&registry, &name, horizon, format)
        }
        Commands::Current { name } => commands::commodity::current(&registry, &name, format),
        Commands::Previous { name } => commands::commodity::previous(&registry, &name, format),
        Commands::Resolve { name, guess } => {
            commands::resolve::run(&registry, &name, guess, format)
        }
        Commands::Commodities => commands::commodity::list(&registry, format),
    }
}
