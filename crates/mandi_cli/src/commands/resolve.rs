//! Name resolution command
//!
//! `--guess` falls back to the capitalisation heuristic when nothing
//! matches. The guess is reported as such and may not name any commodity.

use mandi_engine::resolver::guess_identifier;
use mandi_engine::{CommodityRegistry, QueryError};
use serde::Serialize;

use crate::output::{to_json, OutputFormat};
use crate::Result;

#[derive(Debug, Serialize)]
struct Resolution {
    input: String,
    name: String,
    guessed: bool,
}

/// Resolve `name`, optionally guessing on a miss
pub fn run(
    registry: &CommodityRegistry,
    name: &str,
    guess: bool,
    format: OutputFormat,
) -> Result<String> {
    let resolution = match registry.resolve(name) {
        Ok(commodity) => Resolution {
            input: name.to_string(),
            name: commodity.name().to_string(),
            guessed: false,
        },
        Err(QueryError::UnknownCommodity(_)) if guess => Resolution {
            input: name.to_string(),
            name: guess_identifier(name),
            guessed: true,
        },
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Json => to_json(&resolution),
        OutputFormat::Table if resolution.guessed => {
            Ok(format!("{} (guess, not registered)\n", resolution.name))
        }
        OutputFormat::Table => Ok(format!("{}\n", resolution.name)),
    }
}
