//! Engine configuration assembly for CLI runs
//!
//! Priority (highest to lowest): command-line flags, `MANDI_*` environment
//! variables, the `--config` file, built-in defaults.

use clap::ValueEnum;
use mandi_engine::config::parse_as_of;
use mandi_engine::{CommodityRegistry, EngineConfig};
use mandi_models::ModelKind;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::{CliError, Result};

/// Model family selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelChoice {
    /// Linear trend with seasonal harmonics
    SeasonalTrend,
    /// Seeded regression tree
    DecisionTree,
}

impl ModelChoice {
    /// Apply to `current`, keeping its parameters when the family matches.
    pub fn apply(self, current: ModelKind) -> ModelKind {
        match (self, current) {
            (ModelChoice::SeasonalTrend, ModelKind::SeasonalTrend { .. })
            | (ModelChoice::DecisionTree, ModelKind::DecisionTree { .. }) => current,
            (ModelChoice::SeasonalTrend, _) => ModelKind::default(),
            (ModelChoice::DecisionTree, _) => ModelKind::decision_tree(),
        }
    }
}

/// Engine-related command-line overrides
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Engine configuration file
    pub config: Option<PathBuf>,
    /// Data root override
    pub data_root: Option<PathBuf>,
    /// Seed override
    pub seed: Option<u64>,
    /// Anchor month override (`YYYY-MM` or `current`)
    pub as_of: Option<String>,
    /// Model family override
    pub model: Option<ModelChoice>,
}

/// Build the engine configuration from all sources.
pub fn load_engine_config(options: &EngineOptions) -> Result<EngineConfig> {
    load_engine_config_with(options, |key| std::env::var(key).ok())
}

/// [`load_engine_config`] with an explicit environment lookup.
pub fn load_engine_config_with<F>(options: &EngineOptions, lookup: F) -> Result<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &options.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    config.apply_overrides(lookup)?;

    if let Some(root) = &options.data_root {
        config.data_root = Some(root.clone());
    }
    if let Some(seed) = options.seed {
        config.seed = Some(seed);
    }
    if let Some(as_of) = &options.as_of {
        config.as_of = Some(parse_as_of(as_of).map_err(CliError::InvalidArgument)?);
    }
    if let Some(model) = options.model {
        config.model = model.apply(config.model);
    }

    config.validate()?;
    Ok(config)
}

/// Create a registry for `config` and train it.
pub fn open_registry(config: &EngineConfig) -> Result<CommodityRegistry> {
    let registry = CommodityRegistry::new(config.registry_settings());
    let report = registry.ensure_initialized(&config.resolved_sources(), config.seed)?;

    if !report.is_complete() {
        for failure in &report.failures {
            warn!(commodity = %failure.name, error = %failure.error, "Commodity unavailable");
        }
    }
    info!(
        trained = report.trained.len(),
        failed = report.failures.len(),
        "Registry ready"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandi_core::types::YearMonth;
    use mandi_engine::CommoditySource;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = load_engine_config_with(&EngineOptions::default(), no_env).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 1\nas_of = \"2020-01\"").unwrap();

        let options = EngineOptions {
            config: Some(file.path().to_path_buf()),
            seed: Some(3),
            model: Some(ModelChoice::DecisionTree),
            ..Default::default()
        };
        let lookup = |key: &str| (key == "MANDI_AS_OF").then(|| "2021-05".to_string());

        let config = load_engine_config_with(&options, lookup).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.as_of, Some(YearMonth::new(2021, 5).unwrap()));
        assert_eq!(config.model, ModelKind::decision_tree());
    }

    #[test]
    fn test_invalid_as_of_flag() {
        let options = EngineOptions {
            as_of: Some("June".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            load_engine_config_with(&options, no_env),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_model_choice_keeps_matching_parameters() {
        let tuned = ModelKind::SeasonalTrend {
            harmonics: 3,
            ridge: 0.5,
        };
        assert_eq!(ModelChoice::SeasonalTrend.apply(tuned), tuned);
        assert_eq!(
            ModelChoice::DecisionTree.apply(tuned),
            ModelKind::decision_tree()
        );
    }

    #[test]
    fn test_open_registry_isolates_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = std::fs::File::create(dir.path().join("Wheat.csv")).unwrap();
        writeln!(table, "year,month,price").unwrap();
        for (month, price) in [(1, 50.0), (2, 60.0), (3, 70.0), (4, 80.0)] {
            writeln!(table, "2024,{},{}", month, price).unwrap();
        }

        let config = EngineConfig {
            data_root: Some(dir.path().to_path_buf()),
            commodities: vec![
                CommoditySource::new("Wheat", "Wheat.csv"),
                CommoditySource::new("Jute", "Jute.csv"),
            ],
            ..Default::default()
        };

        let registry = open_registry(&config).unwrap();
        let report = registry.report().unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.trained, ["Wheat"]);
        assert_eq!(report.failures[0].name, "Jute");
    }

    #[test]
    fn test_open_registry_all_failed() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            data_root: Some(dir.path().to_path_buf()),
            commodities: vec![CommoditySource::new("Jute", "Jute.csv")],
            ..Default::default()
        };

        assert!(matches!(
            open_registry(&config),
            Err(CliError::Registry(_))
        ));
    }
}
