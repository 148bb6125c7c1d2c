//! Model training entry point.
//!
//! [`train`] validates the requested [`ModelKind`], enforces the minimum
//! history length and fits the chosen model family.
//!
//! # Degenerate histories
//!
//! A single observation carries no information about movement, so training
//! fails with [`TrainingError::InsufficientHistory`] instead of returning a
//! constant model. A constant series with two or more observations is valid
//! and trains to a constant prediction.

use mandi_core::types::PriceHistory;
use tracing::debug;

use crate::error::TrainingError;
use crate::models::{DecisionTreeModel, ModelKind, PriceModel, SeasonalTrendModel};

/// Minimum number of observations required to train any model.
pub const MIN_OBSERVATIONS: usize = 2;

/// Train a model of `kind` on `history`.
///
/// `seed` fixes the randomised parts of training (decision-tree split
/// tie-breaking). When `None`, a fresh random seed is drawn, so decision-tree
/// results are then not reproducible. The seasonal-trend model is
/// deterministic and ignores the seed.
///
/// # Errors
///
/// - `TrainingError::InvalidParameter` if `kind` is out of range
/// - `TrainingError::InsufficientHistory` below [`MIN_OBSERVATIONS`]
/// - `TrainingError::Solver` / `NumericalInstability` from fitting
pub fn train(
    history: &PriceHistory,
    kind: &ModelKind,
    seed: Option<u64>,
) -> Result<PriceModel, TrainingError> {
    kind.validate()?;

    if history.len() < MIN_OBSERVATIONS {
        return Err(TrainingError::InsufficientHistory {
            got: history.len(),
            need: MIN_OBSERVATIONS,
        });
    }

    let model = match *kind {
        ModelKind::SeasonalTrend { harmonics, ridge } => {
            let model = SeasonalTrendModel::fit(history, harmonics, ridge)?;
            debug!(
                observations = history.len(),
                harmonics = model.harmonics(),
                monthly_slope = model.monthly_slope(),
                r_squared = model.r_squared(),
                "Fitted seasonal trend model"
            );
            PriceModel::from(model)
        }
        ModelKind::DecisionTree {
            max_depth,
            min_samples_leaf,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            let model = DecisionTreeModel::fit(history, max_depth, min_samples_leaf, seed)?;
            debug!(
                observations = history.len(),
                depth = model.depth(),
                leaves = model.leaf_count(),
                seed,
                "Grew decision tree"
            );
            PriceModel::from(model)
        }
    };

    Ok(model)
}
