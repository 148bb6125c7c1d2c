//! Commodity registry with guarded one-time initialisation.
//!
//! `CommodityRegistry` owns every trained [`Commodity`] and answers all
//! queries. It starts empty; the first successful [`ensure_initialized`]
//! call loads and trains the whole catalogue and publishes it, after which
//! queries are lock-free reads of immutable data.
//!
//! # Initialisation
//!
//! Double-checked locking:
//! 1. Lock-free check of the published catalogue (fast path)
//! 2. On a miss, take the init mutex and check again (another thread may have
//!    finished while we waited)
//! 3. Still empty: load and train every commodity, then publish
//!
//! Concurrent first callers train exactly once. Readers observe either the
//! complete catalogue or nothing. A failed pass is recorded as well: later
//! calls return the same [`RegistryError`] without loading or training, and
//! queries keep reporting `NotInitialized`.
//!
//! # Example
//!
//! ```rust
//! use mandi_core::types::YearMonth;
//! use mandi_engine::config::{CommoditySource, RegistrySettings};
//! use mandi_engine::loader::InMemoryLoader;
//! use mandi_engine::registry::CommodityRegistry;
//!
//! let start = YearMonth::new(2024, 1).unwrap();
//! let loader = InMemoryLoader::new()
//!     .with_series("wheat", start, &[50.0, 60.0, 70.0, 80.0, 90.0, 100.0])
//!     .with_series("rice", start, &[125.0, 120.0, 115.0, 110.0, 105.0, 100.0]);
//!
//! let registry = CommodityRegistry::with_loader(RegistrySettings::default(), loader);
//! let sources = [
//!     CommoditySource::new("wheat", "Wheat.csv"),
//!     CommoditySource::new("rice", "Rice.csv"),
//! ];
//! registry.ensure_initialized(&sources, Some(42)).unwrap();
//!
//! let winners = registry.top_winners().unwrap();
//! assert_eq!(winners[0].commodity, "wheat");
//! ```
//!
//! [`ensure_initialized`]: CommodityRegistry::ensure_initialized

use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use mandi_models::train;

use crate::commodity::Commodity;
use crate::config::{validate_sources, CommoditySource, FailurePolicy, RegistrySettings};
use crate::error::{CommodityError, QueryError, RegistryError};
use crate::forecast::{self, ForecastPoint, ForecastResult, HistoricalPoint, MAX_HORIZON};
use crate::loader::{CsvHistoryLoader, HistoryLoader};
use crate::ranking::{self, MonthlyMovers, RankingEntry};
use crate::resolver;

/// A commodity that could not be initialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitFailure {
    /// Configured commodity name
    pub name: String,
    /// Rendered error
    pub error: String,
}

/// Outcome of the initialisation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// Trained commodities, in configuration order
    pub trained: Vec<String>,
    /// Commodities left out, in configuration order
    pub failures: Vec<InitFailure>,
}

impl InitReport {
    /// True when every configured commodity trained.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Published, immutable registry contents.
#[derive(Debug)]
struct Catalogue {
    commodities: Vec<Arc<Commodity>>,
    report: Arc<InitReport>,
}

/// Owner of all trained commodities.
pub struct CommodityRegistry {
    settings: RegistrySettings,
    loader: Box<dyn HistoryLoader>,
    outcome: OnceLock<Result<Catalogue, RegistryError>>,
    init_lock: Mutex<()>,
    training_runs: AtomicUsize,
}

impl CommodityRegistry {
    /// Creates an empty registry reading CSV price tables.
    pub fn new(settings: RegistrySettings) -> Self {
        Self::with_loader(settings, CsvHistoryLoader::new())
    }

    /// Creates an empty registry with a custom history loader.
    pub fn with_loader(settings: RegistrySettings, loader: impl HistoryLoader + 'static) -> Self {
        Self {
            settings,
            loader: Box::new(loader),
            outcome: OnceLock::new(),
            init_lock: Mutex::new(()),
            training_runs: AtomicUsize::new(0),
        }
    }

    /// Settings this registry trains with.
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Load and train every commodity in `sources` unless already done.
    ///
    /// `seed` makes randomised training reproducible; commodity `i` in
    /// configuration order trains with `seed + i`. The first pass is final:
    /// further calls return its report, or its error, and ignore their
    /// arguments.
    ///
    /// # Errors
    ///
    /// - `RegistryError::Config` for a malformed commodity map
    /// - `RegistryError::NoCommodities` for an empty map
    /// - `RegistryError::AllFailed` when no commodity trained
    /// - `RegistryError::Commodity` for the first failure under `FailFast`
    /// - `RegistryError::LockPoisoned` if an earlier initialiser panicked
    pub fn ensure_initialized(
        &self,
        sources: &[CommoditySource],
        seed: Option<u64>,
    ) -> Result<Arc<InitReport>, RegistryError> {
        // Fast path
        if let Some(outcome) = self.outcome.get() {
            return Self::settled(outcome);
        }

        let _guard = self
            .init_lock
            .lock()
            .map_err(|_| RegistryError::LockPoisoned)?;

        // Another caller may have finished while we waited
        if let Some(outcome) = self.outcome.get() {
            return Self::settled(outcome);
        }

        let outcome = self.build_catalogue(sources, seed);
        if let Err(err) = &outcome {
            error!(error = %err, "Commodity registry initialisation failed");
        }
        // Every writer holds init_lock, so the slot is still empty
        Self::settled(self.outcome.get_or_init(|| outcome))
    }

    fn settled(
        outcome: &Result<Catalogue, RegistryError>,
    ) -> Result<Arc<InitReport>, RegistryError> {
        match outcome {
            Ok(catalogue) => Ok(Arc::clone(&catalogue.report)),
            Err(err) => Err(err.clone()),
        }
    }

    fn build_catalogue(
        &self,
        sources: &[CommoditySource],
        seed: Option<u64>,
    ) -> Result<Catalogue, RegistryError> {
        if sources.is_empty() {
            return Err(RegistryError::NoCommodities);
        }
        validate_sources(sources)?;

        let started = Instant::now();
        info!(
            commodities = sources.len(),
            model = self.settings.model.name(),
            seed,
            policy = ?self.settings.failure_policy,
            "Initialising commodity registry"
        );

        let outcomes: Vec<Result<Commodity, CommodityError>> = sources
            .par_iter()
            .enumerate()
            .map(|(index, source)| {
                let seed = seed.map(|s| s.wrapping_add(index as u64));
                self.build_commodity(source, seed)
            })
            .collect();

        let mut commodities = Vec::with_capacity(sources.len());
        let mut report = InitReport::default();

        for (source, outcome) in sources.iter().zip(outcomes) {
            match outcome {
                Ok(commodity) => {
                    report.trained.push(commodity.name().to_string());
                    commodities.push(Arc::new(commodity));
                }
                Err(err) => {
                    if self.settings.failure_policy == FailurePolicy::FailFast {
                        warn!(commodity = %source.name, error = %err, "Aborting initialisation");
                        return Err(RegistryError::Commodity {
                            name: source.name.clone(),
                            source: err,
                        });
                    }
                    warn!(commodity = %source.name, error = %err, "Skipping commodity");
                    report.failures.push(InitFailure {
                        name: source.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        if commodities.is_empty() {
            return Err(RegistryError::AllFailed {
                failures: report.failures,
            });
        }

        info!(
            trained = report.trained.len(),
            failed = report.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Commodity registry ready"
        );

        Ok(Catalogue {
            commodities,
            report: Arc::new(report),
        })
    }

    fn build_commodity(
        &self,
        source: &CommoditySource,
        seed: Option<u64>,
    ) -> Result<Commodity, CommodityError> {
        let history = self.loader.load(source)?;
        self.training_runs.fetch_add(1, Ordering::SeqCst);
        let model = train(&history, &self.settings.model, seed)?;

        debug!(
            commodity = %source.name,
            observations = history.len(),
            model = model.model_name(),
            "Trained commodity model"
        );
        Ok(Commodity::new(source, history, model, self.settings.as_of))
    }

    /// Number of model trainings performed so far.
    pub fn training_runs(&self) -> usize {
        self.training_runs.load(Ordering::SeqCst)
    }

    /// True once a catalogue has been published.
    pub fn is_initialized(&self) -> bool {
        self.catalogue().is_ok()
    }

    /// Report of the successful initialisation, if any.
    pub fn report(&self) -> Option<Arc<InitReport>> {
        self.catalogue().ok().map(|c| Arc::clone(&c.report))
    }

    /// Error of a failed initialisation, if the pass has failed.
    pub fn init_error(&self) -> Option<&RegistryError> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().err())
    }

    fn catalogue(&self) -> Result<&Catalogue, QueryError> {
        match self.outcome.get() {
            Some(Ok(catalogue)) => Ok(catalogue),
            _ => Err(QueryError::NotInitialized),
        }
    }

    /// All trained commodities in configuration order.
    pub fn commodities(&self) -> Result<&[Arc<Commodity>], QueryError> {
        Ok(&self.catalogue()?.commodities)
    }

    /// Commodity with exactly this canonical name.
    pub fn get(&self, name: &str) -> Result<&Arc<Commodity>, QueryError> {
        self.commodities()?
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| QueryError::UnknownCommodity(name.to_string()))
    }

    /// Commodity a human-entered name refers to; see [`resolver`].
    pub fn resolve(&self, user_name: &str) -> Result<&Arc<Commodity>, QueryError> {
        resolver::resolve(self.commodities()?, user_name)
            .ok_or_else(|| QueryError::UnknownCommodity(user_name.trim().to_string()))
    }

    /// Predictions for the `horizon` months after the anchor of `name`.
    pub fn forecast(&self, name: &str, horizon: u32) -> Result<ForecastResult, QueryError> {
        forecast::validate_horizon(horizon)?;
        forecast::forecast(self.resolve(name)?, horizon)
    }

    /// Prediction for the anchor month of `name`.
    pub fn current_month(&self, name: &str) -> Result<ForecastPoint, QueryError> {
        Ok(forecast::current_month(self.resolve(name)?))
    }

    /// The twelve months ending at the anchor of `name`.
    pub fn previous_twelve(&self, name: &str) -> Result<Vec<HistoricalPoint>, QueryError> {
        Ok(forecast::previous_twelve(self.resolve(name)?))
    }

    /// Largest predicted next-month gains.
    pub fn top_winners(&self) -> Result<Vec<RankingEntry>, QueryError> {
        Ok(ranking::top_winners(self.commodities()?))
    }

    /// Largest predicted next-month losses.
    pub fn top_losers(&self) -> Result<Vec<RankingEntry>, QueryError> {
        Ok(ranking::top_losers(self.commodities()?))
    }

    /// Top gainer and loser for each of the next `months` months.
    pub fn movers_summary(&self, months: u32) -> Result<Vec<MonthlyMovers>, QueryError> {
        if months == 0 || months > MAX_HORIZON {
            return Err(QueryError::InvalidHorizon {
                requested: months,
                max: MAX_HORIZON,
            });
        }
        Ok(ranking::movers_summary(self.commodities()?, months))
    }
}

impl std::fmt::Debug for CommodityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommodityRegistry")
            .field("settings", &self.settings)
            .field("initialized", &self.is_initialized())
            .field("training_runs", &self.training_runs())
            .finish()
    }
}
