//! Error types for registry initialisation and queries.
//!
//! Initialisation errors ([`RegistryError`]) are fatal to startup.
//! Query errors ([`QueryError`]) are ordinary values returned to the caller;
//! no query panics.

use mandi_models::TrainingError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::registry::InitFailure;

/// Why a single commodity could not be built.
#[derive(Debug, Clone, Error)]
pub enum CommodityError {
    /// Price table missing, unreadable or invalid
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Model could not be trained
    #[error("Training failed: {0}")]
    Training(#[from] TrainingError),
}

/// Registry initialisation errors.
///
/// A failed initialisation pass is final: the registry keeps returning the
/// same error instead of training again.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Commodity map is malformed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Nothing to train
    #[error("No commodities configured")]
    NoCommodities,

    /// Every configured commodity failed
    #[error("All {} commodities failed to initialise", failures.len())]
    AllFailed {
        /// Per-commodity failures in configuration order
        failures: Vec<InitFailure>,
    },

    /// First failure under the fail-fast policy
    #[error("Commodity '{name}' failed to initialise: {source}")]
    Commodity {
        /// Commodity name
        name: String,
        /// Underlying failure
        #[source]
        source: CommodityError,
    },

    /// A previous initialiser panicked while holding the lock
    #[error("Registry initialisation lock poisoned")]
    LockPoisoned,
}

/// Per-query errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Queried before `ensure_initialized` succeeded
    #[error("Commodity registry is not initialised")]
    NotInitialized,

    /// No commodity matches the given name
    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),

    /// Horizon outside the supported range
    #[error("Invalid horizon {requested}: must be between 1 and {max} months")]
    InvalidHorizon {
        /// Requested months
        requested: u32,
        /// Largest supported horizon
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::UnknownCommodity("quinoa".to_string());
        assert_eq!(err.to_string(), "Unknown commodity: quinoa");

        let err = QueryError::InvalidHorizon {
            requested: 0,
            max: 36,
        };
        assert!(err.to_string().contains("between 1 and 36"));

        let err = RegistryError::AllFailed {
            failures: vec![InitFailure {
                name: "Wheat".to_string(),
                error: "boom".to_string(),
            }],
        };
        assert_eq!(err.to_string(), "All 1 commodities failed to initialise");
    }

    #[test]
    fn test_commodity_error_wraps_training() {
        let err: CommodityError = TrainingError::InsufficientHistory { got: 1, need: 2 }.into();
        assert!(err.to_string().starts_with("Training failed"));
    }
}
