//! Per-commodity commands: forecast, current, previous, list

use mandi_engine::CommodityRegistry;
use serde::Serialize;
use std::fmt::Write;

use crate::output::{forecast_table, point_line, previous_table, to_json, OutputFormat};
use crate::Result;

/// Render a forecast over `horizon` months
pub fn forecast(
    registry: &CommodityRegistry,
    name: &str,
    horizon: u32,
    format: OutputFormat,
) -> Result<String> {
    let result = registry.forecast(name, horizon)?;
    match format {
        OutputFormat::Table => Ok(forecast_table(&result)),
        OutputFormat::Json => to_json(&result),
    }
}

/// Render the anchor-month prediction
pub fn current(registry: &CommodityRegistry, name: &str, format: OutputFormat) -> Result<String> {
    let commodity = registry.resolve(name)?.name().to_string();
    let point = registry.current_month(&commodity)?;
    match format {
        OutputFormat::Table => Ok(format!("{}\n{}\n", commodity, point_line(&point))),
        OutputFormat::Json => to_json(&point),
    }
}

/// Render the previous twelve months
pub fn previous(registry: &CommodityRegistry, name: &str, format: OutputFormat) -> Result<String> {
    let commodity = registry.resolve(name)?.name().to_string();
    let points = registry.previous_twelve(&commodity)?;
    match format {
        OutputFormat::Table => Ok(previous_table(&commodity, &points)),
        OutputFormat::Json => to_json(&points),
    }
}

#[derive(Serialize)]
struct Listing<'a> {
    name: &'a str,
    source: String,
    observations: usize,
    anchor: String,
    model: &'static str,
}

/// Render the trained commodities and any initialisation failures
pub fn list(registry: &CommodityRegistry, format: OutputFormat) -> Result<String> {
    let listings: Vec<Listing<'_>> = registry
        .commodities()?
        .iter()
        .map(|c| Listing {
            name: c.name(),
            source: c.source_path().display().to_string(),
            observations: c.history().len(),
            anchor: c.anchor().to_string(),
            model: c.model().model_name(),
        })
        .collect();
    let failures = registry
        .report()
        .map(|r| r.failures.clone())
        .unwrap_or_default();

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "commodities": listings,
            "failures": failures,
        })),
        OutputFormat::Table => {
            let mut out = String::new();
            for l in &listings {
                let _ = writeln!(
                    out,
                    "{:<14} {:>4} months  anchor {}  {}",
                    l.name, l.observations, l.anchor, l.source
                );
            }
            for f in &failures {
                let _ = writeln!(out, "{:<14} unavailable: {}", f.name, f.error);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::market_registry;
    use crate::CliError;
    use mandi_engine::QueryError;

    #[test]
    fn test_forecast_table() {
        let registry = market_registry();
        let out = forecast(&registry, "wheat", 6, OutputFormat::Table).unwrap();

        assert!(out.starts_with("Wheat forecast from Jun 2024 (6 months)"));
        assert!(out.contains("Jul 2024"));
        assert!(out.contains("Peak:   Dec 2024"));
        assert!(out.contains("Trough: Jul 2024"));
    }

    #[test]
    fn test_forecast_json() {
        let registry = market_registry();
        let out = forecast(&registry, "RICE", 12, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["commodity"], "Rice");
        assert_eq!(value["points"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_unknown_commodity() {
        let registry = market_registry();
        let err = current(&registry, "quinoa", OutputFormat::Table).unwrap_err();
        assert!(matches!(
            err,
            CliError::Query(QueryError::UnknownCommodity(_))
        ));
        assert_eq!(err.to_string(), "Unknown commodity: quinoa");
    }

    #[test]
    fn test_current_and_previous() {
        let registry = market_registry();

        let out = current(&registry, "wheat", OutputFormat::Table).unwrap();
        assert!(out.starts_with("Wheat\nJun 2024"));

        let out = previous(&registry, "wheat", OutputFormat::Table).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[1].ends_with("predicted"));
        assert!(lines[12].ends_with("observed"));
    }

    #[test]
    fn test_list() {
        let registry = market_registry();
        let out = list(&registry, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["commodities"][0]["name"], "Wheat");
        assert_eq!(value["commodities"][0]["observations"], 6);
        assert!(value["failures"].as_array().unwrap().is_empty());
    }
}
