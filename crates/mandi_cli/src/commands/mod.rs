//! CLI command implementations
//!
//! Each command renders its result to a `String`; `main` prints it.

pub mod commodity;
pub mod market;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_support {
    use mandi_core::types::YearMonth;
    use mandi_engine::config::{CommoditySource, RegistrySettings};
    use mandi_engine::loader::InMemoryLoader;
    use mandi_engine::CommodityRegistry;

    /// Trained registry: wheat rises 10%, rice falls 5%.
    pub fn market_registry() -> CommodityRegistry {
        let start = YearMonth::new(2024, 1).unwrap();
        let loader = InMemoryLoader::new()
            .with_series("Wheat", start, &[50.0, 60.0, 70.0, 80.0, 90.0, 100.0])
            .with_series("Rice", start, &[125.0, 120.0, 115.0, 110.0, 105.0, 100.0]);

        let registry = CommodityRegistry::with_loader(RegistrySettings::default(), loader);
        registry
            .ensure_initialized(
                &[
                    CommoditySource::new("Wheat", "static/Wheat.csv"),
                    CommoditySource::new("Rice", "static/Rice.csv"),
                ],
                Some(42),
            )
            .unwrap();
        registry
    }
}
