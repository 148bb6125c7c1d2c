//! Table and JSON rendering of query results

use clap::ValueEnum;
use mandi_engine::{
    ForecastPoint, ForecastResult, HistoricalPoint, MonthlyMovers, PointSource, RankingEntry,
};
use serde::Serialize;
use std::fmt::Write;

use crate::Result;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Pretty JSON for any serialisable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Ranking table.
pub fn ranking_table(title: &str, entries: &[RankingEntry]) -> String {
    let mut out = format!("{}\n", title);
    let _ = writeln!(
        out,
        "{:<4} {:<14} {:>10} {:>10} {:>9}",
        "#", "Commodity", "Current", "Next", "Change"
    );
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<14} {:>10.2} {:>10.2} {:>+8.2}%",
            rank + 1,
            entry.commodity,
            entry.current_price,
            entry.future_price,
            entry.percent()
        );
    }
    out
}

/// Movers summary table.
pub fn summary_table(steps: &[MonthlyMovers]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<14} {:>9}   {:<14} {:>9}",
        "Step", "Top gainer", "Change", "Top loser", "Change"
    );
    for step in steps {
        let _ = writeln!(
            out,
            "{:<5} {:<14} {:>+8.2}%   {:<14} {:>+8.2}%",
            format!("+{}", step.step),
            step.top_gainer.commodity,
            step.top_gainer.percent(),
            step.top_loser.commodity,
            step.top_loser.percent()
        );
    }
    out
}

/// Forecast table with peak and trough lines.
pub fn forecast_table(result: &ForecastResult) -> String {
    let mut out = format!(
        "{} forecast from {} ({} months)\n",
        result.commodity,
        result.anchor.label(),
        result.len()
    );
    for point in &result.points {
        let _ = writeln!(out, "{}", point_line(point));
    }
    if let (Some(peak), Some(trough)) = (result.peak(), result.trough()) {
        let _ = writeln!(out, "Peak:   {} at {:.2}", peak.label, peak.price);
        let _ = writeln!(out, "Trough: {} at {:.2}", trough.label, trough.price);
    }
    out
}

/// One forecast line; extrapolated months are starred.
pub fn point_line(point: &ForecastPoint) -> String {
    let marker = if point.extrapolated { "*" } else { "" };
    format!("{:<10} {:>10.2}{}", point.label, point.price, marker)
}

/// Previous-twelve table.
pub fn previous_table(commodity: &str, points: &[HistoricalPoint]) -> String {
    let mut out = format!("{} previous twelve months\n", commodity);
    for point in points {
        let source = match point.source {
            PointSource::Observed => "observed",
            PointSource::Predicted => "predicted",
        };
        let _ = writeln!(out, "{:<10} {:>10.2}  {}", point.label, point.price, source);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandi_core::types::YearMonth;

    fn entry(name: &str, change: f64) -> RankingEntry {
        RankingEntry {
            commodity: name.to_string(),
            period: YearMonth::new(2024, 7).unwrap(),
            current_price: 100.0,
            future_price: 100.0 * (1.0 + change),
            change,
        }
    }

    #[test]
    fn test_ranking_table_layout() {
        let table = ranking_table("Top winners", &[entry("wheat", 0.1), entry("rice", -0.05)]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "Top winners");
        assert!(lines[2].starts_with("1    wheat"));
        assert!(lines[2].ends_with("+10.00%"));
        assert!(lines[3].ends_with("-5.00%"));
    }

    #[test]
    fn test_point_line_marks_extrapolation() {
        let period = YearMonth::new(2024, 7).unwrap();
        let point = ForecastPoint {
            period,
            label: period.label(),
            price: 12.346,
            extrapolated: true,
        };
        assert_eq!(point_line(&point), "Jul 2024        12.35*");
    }

    #[test]
    fn test_json_output() {
        let json = to_json(&[entry("wheat", 0.1)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["commodity"], "wheat");
        assert_eq!(value[0]["period"], "2024-07");
    }
}
