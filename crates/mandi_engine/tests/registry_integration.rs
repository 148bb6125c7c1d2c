//! End-to-end registry tests over CSV price tables.

use approx::assert_relative_eq;
use mandi_core::types::YearMonth;
use mandi_engine::config::{CommoditySource, EngineConfig, FailurePolicy, RegistrySettings};
use mandi_engine::loader::InMemoryLoader;
use mandi_engine::{CommodityRegistry, PointSource, QueryError, RegistryError};
use mandi_models::ModelKind;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

/// Write a legacy-format table (`Month,Year,Rainfall,WPI`) starting Jan 2024.
fn write_table(dir: &Path, stem: &str, prices: &[f64]) {
    let mut body = String::from("Month,Year,Rainfall,WPI\n");
    for (i, price) in prices.iter().enumerate() {
        let period = ym(2024, 1).add_months(i as i64);
        body.push_str(&format!("{},{},0.0,{}\n", period.month(), period.year(), price));
    }
    fs::write(dir.join(format!("{}.csv", stem)), body).unwrap();
}

fn market_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "Wheat", &[50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
    write_table(dir.path(), "Rice", &[125.0, 120.0, 115.0, 110.0, 105.0, 100.0]);
    write_table(dir.path(), "Arhar", &[80.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
    dir
}

fn market_config(dir: &Path) -> EngineConfig {
    let toml = format!(
        r#"
        data_root = "{}"
        seed = 42

        [[commodities]]
        name = "Wheat"
        path = "Wheat.csv"

        [[commodities]]
        name = "Rice"
        path = "Rice.csv"

        [[commodities]]
        name = "Arhar"
        path = "Arhar.csv"
        "#,
        dir.display().to_string().replace('\\', "/")
    );
    EngineConfig::from_toml_str(&toml).unwrap()
}

fn initialised(config: &EngineConfig) -> CommodityRegistry {
    let registry = CommodityRegistry::new(config.registry_settings());
    registry
        .ensure_initialized(&config.resolved_sources(), config.seed)
        .unwrap();
    registry
}

#[test]
fn test_winners_and_losers_from_csv() {
    let dir = market_dir();
    let registry = initialised(&market_config(dir.path()));

    let winners = registry.top_winners().unwrap();
    let names: Vec<_> = winners.iter().map(|e| e.commodity.as_str()).collect();
    assert_eq!(names, ["Wheat", "Arhar", "Rice"]);
    assert_relative_eq!(winners[0].percent(), 10.0, epsilon = 1e-3);
    assert_relative_eq!(winners[0].future_price, 110.0, epsilon = 1e-3);

    let losers = registry.top_losers().unwrap();
    assert_eq!(losers[0].commodity, "Rice");
    assert_relative_eq!(losers[0].percent(), -5.0, epsilon = 1e-3);
    assert_relative_eq!(losers[0].future_price, 95.0, epsilon = 1e-3);
}

#[test]
fn test_forecast_views_from_csv() {
    let dir = market_dir();
    let registry = initialised(&market_config(dir.path()));

    let forecast = registry.forecast("wheat", 12).unwrap();
    assert_eq!(forecast.commodity, "Wheat");
    assert_eq!(forecast.anchor, ym(2024, 6));
    assert_eq!(forecast.points.first().unwrap().period, ym(2024, 7));
    assert_eq!(forecast.points.last().unwrap().period, ym(2025, 6));

    let current = registry.current_month("WHEAT").unwrap();
    assert_eq!(current.period, ym(2024, 6));
    assert_relative_eq!(current.price, 100.0, epsilon = 1e-3);

    let previous = registry.previous_twelve("rice").unwrap();
    assert_eq!(previous.len(), 12);
    assert_eq!(previous[0].source, PointSource::Predicted);
    assert_eq!(previous[11].source, PointSource::Observed);
    assert_eq!(previous[11].price, 100.0);
}

#[test]
fn test_name_resolution_is_case_insensitive() {
    let dir = market_dir();
    let registry = initialised(&market_config(dir.path()));

    for input in ["ARHAR", "arhar", "Arhar"] {
        assert_eq!(registry.resolve(input).unwrap().name(), "Arhar");
    }
    assert_eq!(
        registry.resolve("quinoa").unwrap_err(),
        QueryError::UnknownCommodity("quinoa".to_string())
    );
}

#[test]
fn test_missing_table_isolated() {
    let dir = market_dir();
    let mut config = market_config(dir.path());
    config
        .commodities
        .push(CommoditySource::new("Jute", "Jute.csv"));

    let registry = CommodityRegistry::new(config.registry_settings());
    let report = registry
        .ensure_initialized(&config.resolved_sources(), config.seed)
        .unwrap();

    assert_eq!(report.trained, ["Wheat", "Rice", "Arhar"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Jute");
    assert!(registry.forecast("jute", 6).is_err());
}

#[test]
fn test_missing_table_fails_fast() {
    let dir = market_dir();
    let mut config = market_config(dir.path());
    config.failure_policy = FailurePolicy::FailFast;
    config
        .commodities
        .insert(0, CommoditySource::new("Jute", "Jute.csv"));

    let registry = CommodityRegistry::new(config.registry_settings());
    let err = registry
        .ensure_initialized(&config.resolved_sources(), config.seed)
        .unwrap_err();

    assert!(matches!(err, RegistryError::Commodity { ref name, .. } if name == "Jute"));
    assert_eq!(registry.top_winners(), Err(QueryError::NotInitialized));
}

#[test]
fn test_concurrent_first_access_trains_once() {
    let dir = market_dir();
    let config = market_config(dir.path());
    let sources = config.resolved_sources();
    let registry = Arc::new(CommodityRegistry::new(config.registry_settings()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let sources = sources.clone();
            thread::spawn(move || registry.ensure_initialized(&sources, Some(42)).unwrap())
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(registry.training_runs(), 3);
    assert!(reports.iter().all(|r| Arc::ptr_eq(r, &reports[0])));
}

#[test]
fn test_repeated_initialisation_is_noop() {
    let dir = market_dir();
    let config = market_config(dir.path());
    let registry = initialised(&config);

    for _ in 0..5 {
        registry
            .ensure_initialized(&config.resolved_sources(), config.seed)
            .unwrap();
    }
    assert_eq!(registry.training_runs(), 3);
}

#[test]
fn test_seeded_decision_trees_are_deterministic() {
    let start = ym(2020, 1);
    let prices: Vec<f64> = (0..48)
        .map(|i| 100.0 + ((i * 37) % 23) as f64 + (i % 12) as f64 * 2.0)
        .collect();
    let settings = RegistrySettings {
        model: ModelKind::decision_tree(),
        ..Default::default()
    };
    let sources = [CommoditySource::new("maize", "Maize.csv")];

    let build = || {
        let loader = InMemoryLoader::new().with_series("maize", start, &prices);
        let registry = CommodityRegistry::with_loader(settings, loader);
        registry.ensure_initialized(&sources, Some(7)).unwrap();
        registry
    };

    let a = build();
    let b = build();
    let fa = a.forecast("maize", 24).unwrap();
    assert_eq!(fa, b.forecast("maize", 24).unwrap());
    assert_eq!(fa, a.forecast("maize", 24).unwrap());
}

#[test]
fn test_as_of_override_moves_anchor() {
    let dir = market_dir();
    let mut config = market_config(dir.path());
    config.as_of = Some(ym(2024, 3));
    let registry = initialised(&config);

    let forecast = registry.forecast("wheat", 3).unwrap();
    assert_eq!(forecast.anchor, ym(2024, 3));
    assert!(forecast.points.iter().all(|p| !p.extrapolated));

    let previous = registry.previous_twelve("wheat").unwrap();
    assert_eq!(previous[11].period, ym(2024, 3));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_forecast_months_strictly_increase(
        prices in proptest::collection::vec(1.0f64..1_000.0, 2..36),
        horizon in 1u32..=36,
    ) {
        let loader = InMemoryLoader::new().with_series("gram", ym(2019, 5), &prices);
        let registry = CommodityRegistry::with_loader(RegistrySettings::default(), loader);
        registry
            .ensure_initialized(&[CommoditySource::new("gram", "Gram.csv")], None)
            .unwrap();

        let forecast = registry.forecast("gram", horizon).unwrap();
        prop_assert_eq!(forecast.len(), horizon as usize);
        prop_assert!(forecast.points[0].period > forecast.anchor);
        for pair in forecast.points.windows(2) {
            prop_assert_eq!(pair[1].period, pair[0].period.succ());
        }
    }
}
