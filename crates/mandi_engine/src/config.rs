//! Engine configuration
//!
//! Describes which commodities to load, where their price tables live and how
//! their models are trained. Loaded from TOML with environment overrides:
//!
//! ```toml
//! data_root = "data"
//! seed = 42
//! as_of = "2024-06"
//! failure_policy = "isolate"
//!
//! [model]
//! kind = "seasonal_trend"
//! harmonics = 1
//!
//! [[commodities]]
//! name = "Arhar"
//! path = "static/Arhar.csv"
//! ```
//!
//! A file without a `[[commodities]]` table gets the default catalogue.

use mandi_core::types::YearMonth;
use mandi_models::ModelKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding [`EngineConfig::data_root`].
pub const ENV_DATA_ROOT: &str = "MANDI_DATA_ROOT";
/// Environment variable overriding [`EngineConfig::seed`].
pub const ENV_SEED: &str = "MANDI_SEED";
/// Environment variable overriding [`EngineConfig::as_of`].
pub const ENV_AS_OF: &str = "MANDI_AS_OF";

/// `as_of` value meaning "the current wall-clock month".
pub const AS_OF_CURRENT: &str = "current";

/// Default catalogue: commodity name and price table file stem.
const DEFAULT_COMMODITIES: [(&str, &str); 23] = [
    ("arhar", "Arhar"),
    ("bajra", "Bajra"),
    ("barley", "Barley"),
    ("copra", "Copra"),
    ("cotton", "Cotton"),
    ("sesamum", "Sesamum"),
    ("gram", "Gram"),
    ("groundnut", "Groundnut"),
    ("jowar", "Jowar"),
    ("maize", "Maize"),
    ("masoor", "Masoor"),
    ("moong", "Moong"),
    ("niger", "Niger"),
    ("paddy", "Paddy"),
    ("ragi", "Ragi"),
    ("rape", "Rape"),
    ("jute", "Jute"),
    ("safflower", "Safflower"),
    ("soyabean", "Soyabean"),
    ("sugarcane", "Sugarcane"),
    ("sunflower", "Sunflower"),
    ("urad", "Urad"),
    ("wheat", "Wheat"),
];

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File unreadable or not valid TOML
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Malformed `MANDI_*` override
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Blank commodity name
    #[error("Commodity name must not be empty")]
    EmptyName,

    /// Commodity without a price table path
    #[error("Commodity '{0}' has an empty source path")]
    EmptyPath(String),

    /// Two commodities whose names differ only in case
    #[error("Duplicate commodity name: {0}")]
    DuplicateCommodity(String),

    /// Model hyper-parameters out of range
    #[error("Invalid model configuration: {0}")]
    InvalidModel(String),
}

/// How the registry reacts to a commodity that fails to load or train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep the remaining commodities.
    #[default]
    Isolate,
    /// Abort initialisation on the first failure.
    FailFast,
}

/// One entry of the commodity map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommoditySource {
    /// Canonical commodity name
    pub name: String,
    /// Price table location
    pub path: PathBuf,
}

impl CommoditySource {
    /// Creates a source entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Identifier derived from the source: the file stem (`static/Arhar.csv` -> `Arhar`).
    pub fn source_id(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The default commodity map, in catalogue order.
pub fn default_commodities() -> Vec<CommoditySource> {
    DEFAULT_COMMODITIES
        .iter()
        .map(|(name, stem)| CommoditySource::new(*name, format!("static/{}.csv", stem)))
        .collect()
}

/// Check a commodity map: non-empty names and paths, names unique ignoring case.
///
/// Case-insensitive uniqueness keeps name resolution unambiguous.
pub fn validate_sources(sources: &[CommoditySource]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        let name = source.name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if source.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(source.name.clone()));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::DuplicateCommodity(source.name.clone()));
        }
    }
    Ok(())
}

/// Settings the registry needs beyond the commodity map itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegistrySettings {
    /// Model family for every commodity
    pub model: ModelKind,
    /// Anchor month override
    pub as_of: Option<YearMonth>,
    /// Per-commodity failure handling
    pub failure_policy: FailurePolicy,
}

/// Engine configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory relative source paths are resolved against
    pub data_root: Option<PathBuf>,
    /// Seed for randomised training
    pub seed: Option<u64>,
    /// "Now" for every commodity; defaults to each commodity's latest month
    #[serde(deserialize_with = "deserialize_as_of")]
    pub as_of: Option<YearMonth>,
    /// Failure handling during initialisation
    pub failure_policy: FailurePolicy,
    /// Model family and hyper-parameters
    pub model: ModelKind,
    /// Commodity map in configuration order
    pub commodities: Vec<CommoditySource>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            seed: None,
            as_of: None,
            failure_policy: FailurePolicy::Isolate,
            model: ModelKind::default(),
            commodities: default_commodities(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MANDI_*` environment variable overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_DATA_ROOT) {
            self.data_root = Some(PathBuf::from(root));
        }

        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={} is not a u64", ENV_SEED, seed)))?;
            self.seed = Some(seed);
        }

        if let Some(as_of) = lookup(ENV_AS_OF) {
            self.as_of = Some(
                parse_as_of(&as_of)
                    .map_err(|e| ConfigError::EnvError(format!("{}: {}", ENV_AS_OF, e)))?,
            );
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model
            .validate()
            .map_err(|e| ConfigError::InvalidModel(e.to_string()))?;
        validate_sources(&self.commodities)
    }

    /// Commodity map with relative paths joined onto `data_root`.
    pub fn resolved_sources(&self) -> Vec<CommoditySource> {
        self.commodities
            .iter()
            .map(|source| match &self.data_root {
                Some(root) if source.path.is_relative() => {
                    CommoditySource::new(source.name.clone(), root.join(&source.path))
                }
                _ => source.clone(),
            })
            .collect()
    }

    /// Registry settings derived from this configuration.
    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            model: self.model,
            as_of: self.as_of,
            failure_policy: self.failure_policy,
        }
    }
}

/// Parse an anchor month: `YYYY-MM`, or `current` for today's month.
pub fn parse_as_of(value: &str) -> Result<YearMonth, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(AS_OF_CURRENT) {
        return Ok(YearMonth::current());
    }
    value.parse().map_err(|e| format!("{}", e))
}

fn deserialize_as_of<'de, D>(deserializer: D) -> Result<Option<YearMonth>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|value| parse_as_of(&value).map_err(serde::de::Error::custom))
        .transpose()
}
