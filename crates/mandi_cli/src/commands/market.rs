//! Market ranking commands: winners, losers, summary

use mandi_engine::CommodityRegistry;
use tracing::info;

use crate::output::{ranking_table, summary_table, to_json, OutputFormat};
use crate::Result;

/// Which end of the ranking to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Largest predicted gains
    Winners,
    /// Largest predicted losses
    Losers,
}

/// Render the top winners or losers
pub fn run(registry: &CommodityRegistry, side: Side, format: OutputFormat) -> Result<String> {
    let (title, entries) = match side {
        Side::Winners => ("Top winners (next month)", registry.top_winners()?),
        Side::Losers => ("Top losers (next month)", registry.top_losers()?),
    };
    info!(side = ?side, entries = entries.len(), "Ranking computed");

    match format {
        OutputFormat::Table => Ok(ranking_table(title, &entries)),
        OutputFormat::Json => to_json(&entries),
    }
}

/// Render the per-month movers summary
pub fn summary(registry: &CommodityRegistry, months: u32, format: OutputFormat) -> Result<String> {
    let steps = registry.movers_summary(months)?;

    match format {
        OutputFormat::Table => Ok(summary_table(&steps)),
        OutputFormat::Json => to_json(&steps),
    }
}
