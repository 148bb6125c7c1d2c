//! Cross-commodity ranking endpoints

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use mandi_engine::{MonthlyMovers, RankingEntry};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Default months covered by the movers summary.
pub const DEFAULT_SUMMARY_MONTHS: u32 = 6;

/// Ranking response
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    /// Ranked commodities, best first
    pub entries: Vec<RankingEntry>,
}

/// Query parameters for `/api/v1/market/summary`
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryParams {
    /// Months ahead (default 6)
    pub months: Option<u32>,
}

/// Movers summary response
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    /// Months covered
    pub months: u32,
    /// One entry per month ahead
    pub steps: Vec<MonthlyMovers>,
}

/// Build the market routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/market/winners", get(winners_handler))
        .route("/api/v1/market/losers", get(losers_handler))
        .route("/api/v1/market/summary", get(summary_handler))
}

/// GET /api/v1/market/winners
async fn winners_handler(State(state): State<AppState>) -> Result<Json<RankingResponse>, ApiError> {
    let entries = state.ready_registry().await?.top_winners()?;
    Ok(Json(RankingResponse { entries }))
}

/// GET /api/v1/market/losers
async fn losers_handler(State(state): State<AppState>) -> Result<Json<RankingResponse>, ApiError> {
    let entries = state.ready_registry().await?.top_losers()?;
    Ok(Json(RankingResponse { entries }))
}

/// GET /api/v1/market/summary?months=6
async fn summary_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let months = params.months.unwrap_or(DEFAULT_SUMMARY_MONTHS);
    let steps = state.ready_registry().await?.movers_summary(months)?;
    Ok(Json(SummaryResponse { months, steps }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{broken_state, get_json, market_state};
    use approx::assert_relative_eq;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_winners_initialise_lazily() {
        let state = market_state();
        let router = routes().with_state(state.clone());
        assert!(!state.registry.is_initialized());

        let (status, body) = get_json(router, "/api/v1/market/winners").await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.registry.is_initialized());

        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["commodity"], "wheat");
        assert_relative_eq!(entries[0]["change"].as_f64().unwrap(), 0.10, epsilon = 1e-4);
        assert_eq!(entries[0]["period"], "2024-07");
    }

    #[tokio::test]
    async fn test_losers_order() {
        let router = routes().with_state(market_state());

        let (status, body) = get_json(router, "/api/v1/market/losers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"][0]["commodity"], "rice");
        assert_relative_eq!(
            body["entries"][0]["future_price"].as_f64().unwrap(),
            95.0,
            epsilon = 1e-3
        );
    }

    #[tokio::test]
    async fn test_summary_default_and_explicit_months() {
        let router = routes().with_state(market_state());

        let (status, body) = get_json(router.clone(), "/api/v1/market/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["months"], 6);
        assert_eq!(body["steps"].as_array().unwrap().len(), 6);
        assert_eq!(body["steps"][0]["top_gainer"]["commodity"], "wheat");
        assert_eq!(body["steps"][0]["top_loser"]["commodity"], "rice");

        let (_, body) = get_json(router, "/api/v1/market/summary?months=12").await;
        assert_eq!(body["steps"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_summary_rejects_out_of_range_months() {
        let router = routes().with_state(market_state());

        let (status, body) = get_json(router, "/api/v1/market/summary?months=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_horizon");
    }

    #[tokio::test]
    async fn test_failed_initialisation_returns_503() {
        let router = routes().with_state(broken_state());

        let (status, body) = get_json(router, "/api/v1/market/winners").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "registry_unavailable");
    }
}
