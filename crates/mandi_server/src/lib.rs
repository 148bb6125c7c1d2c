//! REST API server for the Mandi commodity forecasting engine
//!
//! Exposes rankings, per-commodity forecasts and name resolution over HTTP.
//! The commodity registry is owned by the shared [`routes::AppState`] and
//! trained once, either at startup or on the first query.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use mandi_engine;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
