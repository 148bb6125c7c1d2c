//! Route modules for the Mandi server
//!
//! This module contains endpoint group-specific routers:
//! - health: Health check and readiness endpoints
//! - market: Cross-commodity rankings
//! - commodities: Per-commodity forecasts and name resolution

pub mod commodities;
pub mod health;
pub mod market;

use axum::http::Method;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mandi_engine::{CommodityRegistry, CommoditySource, EngineConfig, InitReport};

use crate::error::ApiError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Commodity registry
    pub registry: Arc<CommodityRegistry>,
    /// Commodity map the registry is initialised from
    pub sources: Arc<Vec<CommoditySource>>,
    /// Training seed
    pub seed: Option<u64>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState around an (uninitialised) registry
    pub fn new(registry: CommodityRegistry, engine: &EngineConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            sources: Arc::new(engine.resolved_sources()),
            seed: engine.seed,
            start_time: std::time::Instant::now(),
        }
    }

    /// Initialise the registry if needed, training on the blocking pool.
    ///
    /// A failed pass is not repeated; every later call reports its error.
    pub async fn initialise(&self) -> Result<Arc<InitReport>, ApiError> {
        if let Some(report) = self.registry.report() {
            return Ok(report);
        }
        if let Some(err) = self.registry.init_error() {
            return Err(err.clone().into());
        }

        let registry = Arc::clone(&self.registry);
        let sources = Arc::clone(&self.sources);
        let seed = self.seed;

        let report = tokio::task::spawn_blocking(move || {
            registry.ensure_initialized(&sources, seed)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("initialisation task failed: {}", e)))??;

        Ok(report)
    }

    /// The registry, initialised.
    pub async fn ready_registry(&self) -> Result<&CommodityRegistry, ApiError> {
        self.initialise().await?;
        Ok(&self.registry)
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(health::routes())
        .merge(market::routes())
        .merge(commodities::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::{broken_state, get_json, market_state, untrainable_state};
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_router_merges_all_route_groups() {
        let router = build_router(market_state());

        let (status, _) = get_json(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(router.clone(), "/api/v1/market/winners").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(router.clone(), "/api/v1/commodities").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(router, "/api/v1/resolve?name=wheat").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let router = build_router(market_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialise_is_shared_across_clones() {
        let state = market_state();
        let clone = state.clone();

        let first = state.initialise().await.unwrap();
        let second = clone.initialise().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.registry.training_runs(), 3);
    }

    #[tokio::test]
    async fn test_initialisation_failure_is_unavailable() {
        let state = broken_state();
        let err = state.initialise().await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(_)));
        assert!(!state.registry.is_initialized());
    }

    #[tokio::test]
    async fn test_failed_initialisation_is_not_repeated() {
        let state = untrainable_state();

        for _ in 0..5 {
            let err = state.initialise().await.unwrap_err();
            assert!(matches!(err, ApiError::Unavailable(_)));
        }
        assert_eq!(state.registry.training_runs(), 1);

        let router = build_router(state.clone());
        for _ in 0..3 {
            let (status, body) = get_json(router.clone(), "/api/v1/market/winners").await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["error"], "registry_unavailable");
        }
        assert_eq!(state.registry.training_runs(), 1);
    }
}
