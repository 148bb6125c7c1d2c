//! Health check and readiness endpoints
//!
//! `/health` reports liveness only. `/ready` reports whether the commodity
//! registry has been trained, for load balancer integration.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Server version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    /// Registry trained and serving
    pub ready: bool,
    /// Number of trained commodities
    pub commodities: usize,
}

/// Build the health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready - 200 once the registry is trained, 503 before
async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let commodities = state
        .registry
        .report()
        .map(|report| report.trained.len())
        .unwrap_or(0);
    let ready = state.registry.is_initialized();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadyResponse { ready, commodities }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, market_state};

    #[tokio::test]
    async fn test_health_endpoint_returns_json() {
        let router = routes().with_state(market_state());

        let (status, body) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);

        let health: HealthResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, crate::VERSION);
        assert!(body.get("uptimeSecs").is_some());
    }

    #[tokio::test]
    async fn test_ready_reflects_initialisation() {
        let state = market_state();
        let router = routes().with_state(state.clone());

        let (status, body) = get_json(router.clone(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["ready"], false);

        state.initialise().await.unwrap();

        let (status, body) = get_json(router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        let ready: ReadyResponse = serde_json::from_value(body).unwrap();
        assert!(ready.ready);
        assert_eq!(ready.commodities, 2);
    }
}
