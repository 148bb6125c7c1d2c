//! Price model implementations and their configuration.
//!
//! ## Available Models
//!
//! - [`SeasonalTrendModel`]: trend + seasonal harmonics (least squares)
//! - [`DecisionTreeModel`]: seeded CART regression tree
//!
//! [`ModelKind`] selects one of them from configuration:
//!
//! ```
//! use mandi_models::models::ModelKind;
//!
//! let kind: ModelKind = toml::from_str(r#"
//!     kind = "decision_tree"
//!     max_depth = 4
//! "#).unwrap();
//!
//! assert_eq!(kind, ModelKind::DecisionTree { max_depth: 4, min_samples_leaf: 1 });
//! ```

pub mod decision_tree;
pub mod features;
pub mod model_enum;
pub mod seasonal_trend;

pub use decision_tree::DecisionTreeModel;
pub use features::FeatureMap;
pub use model_enum::PriceModel;
pub use seasonal_trend::SeasonalTrendModel;

use serde::{Deserialize, Serialize};

use crate::error::TrainingError;

/// Highest usable harmonic for monthly data; the 6th harmonic's sine term
/// vanishes at every calendar month.
pub const MAX_HARMONICS: usize = 5;

fn default_harmonics() -> usize {
    1
}

fn default_ridge() -> f64 {
    1e-6
}

fn default_max_depth() -> usize {
    8
}

fn default_min_samples_leaf() -> usize {
    1
}

/// Model family and hyper-parameters used for every commodity in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Linear trend plus `harmonics` seasonal sine/cosine pairs.
    SeasonalTrend {
        /// Number of seasonal harmonics (0 = trend only)
        #[serde(default = "default_harmonics")]
        harmonics: usize,
        /// Ridge penalty on non-intercept coefficients
        #[serde(default = "default_ridge")]
        ridge: f64,
    },
    /// CART regression tree.
    DecisionTree {
        /// Maximum tree depth
        #[serde(default = "default_max_depth")]
        max_depth: usize,
        /// Minimum observations per leaf
        #[serde(default = "default_min_samples_leaf")]
        min_samples_leaf: usize,
    },
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::SeasonalTrend {
            harmonics: default_harmonics(),
            ridge: default_ridge(),
        }
    }
}

impl ModelKind {
    /// Default decision tree configuration.
    pub fn decision_tree() -> Self {
        ModelKind::DecisionTree {
            max_depth: default_max_depth(),
            min_samples_leaf: default_min_samples_leaf(),
        }
    }

    /// Short name for logs and API output.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::SeasonalTrend { .. } => "seasonal_trend",
            ModelKind::DecisionTree { .. } => "decision_tree",
        }
    }

    /// Check hyper-parameter ranges.
    pub fn validate(&self) -> Result<(), TrainingError> {
        match *self {
            ModelKind::SeasonalTrend { harmonics, ridge } => {
                if harmonics > MAX_HARMONICS {
                    return Err(TrainingError::InvalidParameter(format!(
                        "harmonics must be at most {}, got {}",
                        MAX_HARMONICS, harmonics
                    )));
                }
                if !ridge.is_finite() || ridge < 0.0 {
                    return Err(TrainingError::InvalidParameter(format!(
                        "ridge must be finite and non-negative, got {}",
                        ridge
                    )));
                }
            }
            ModelKind::DecisionTree {
                max_depth,
                min_samples_leaf,
            } => {
                if max_depth == 0 {
                    return Err(TrainingError::InvalidParameter(
                        "max_depth must be at least 1".to_string(),
                    ));
                }
                if min_samples_leaf == 0 {
                    return Err(TrainingError::InvalidParameter(
                        "min_samples_leaf must be at least 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
