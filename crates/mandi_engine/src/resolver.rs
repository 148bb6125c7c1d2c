//! Mapping human-entered names onto registered commodities.
//!
//! Matching is trimmed and case-insensitive and runs through four tiers,
//! stopping at the first tier with a match:
//!
//! 1. exact canonical name
//! 2. exact source identifier (file stem)
//! 3. canonical name contains the input
//! 4. source identifier contains the input
//!
//! Within a tier the first commodity in configuration order wins. Empty input
//! never matches.

use std::sync::Arc;

use crate::commodity::Commodity;

/// Find the commodity `user_name` refers to.
pub fn resolve<'a>(commodities: &'a [Arc<Commodity>], user_name: &str) -> Option<&'a Arc<Commodity>> {
    let needle = user_name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let tiers: [&dyn Fn(&Commodity) -> bool; 4] = [
        &|c| c.name().to_lowercase() == needle,
        &|c| c.source_id().to_lowercase() == needle,
        &|c| c.name().to_lowercase().contains(&needle),
        &|c| c.source_id().to_lowercase().contains(&needle),
    ];

    tiers
        .iter()
        .find_map(|matches| commodities.iter().find(|c| matches(c)))
}

/// Capitalise the first letter and lowercase the rest (`"aRHAR"` -> `"Arhar"`).
///
/// This mirrors the usual file naming of price tables but is only a guess:
/// the result need not name any registered commodity.
pub fn guess_identifier(user_name: &str) -> String {
    let trimmed = user_name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
