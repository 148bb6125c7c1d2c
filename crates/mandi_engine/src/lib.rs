//! # Mandi Engine: commodity registry and forecasting queries
//!
//! Loads one monthly price table per commodity, trains one model per
//! commodity once, and answers forecasting and ranking queries from the
//! trained models.
//!
//! ## Modules
//!
//! - [`config`]: engine configuration (TOML + environment overrides)
//! - [`loader`]: price table loading (`HistoryLoader`, CSV, in-memory)
//! - [`commodity`]: a trained commodity
//! - [`registry`]: one-time initialisation and the query API
//! - [`forecast`]: forward and backward price sequences
//! - [`ranking`]: top gainers and losers
//! - [`resolver`]: human-entered name matching
//! - [`error`]: registry and query errors
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mandi_engine::config::EngineConfig;
//! use mandi_engine::registry::CommodityRegistry;
//!
//! let config = EngineConfig::default();
//! let registry = CommodityRegistry::new(config.registry_settings());
//! registry.ensure_initialized(&config.resolved_sources(), config.seed)?;
//!
//! for entry in registry.top_winners()? {
//!     println!("{}: {:+.2}%", entry.commodity, entry.percent());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod commodity;
pub mod config;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod ranking;
pub mod registry;
pub mod resolver;

pub use commodity::Commodity;
pub use config::{CommoditySource, EngineConfig, FailurePolicy, RegistrySettings};
pub use error::{CommodityError, QueryError, RegistryError};
pub use forecast::{ForecastPoint, ForecastResult, HistoricalPoint, PointSource, MAX_HORIZON};
pub use ranking::{MonthlyMovers, RankingEntry, TOP_N};
pub use registry::{CommodityRegistry, InitFailure, InitReport};
