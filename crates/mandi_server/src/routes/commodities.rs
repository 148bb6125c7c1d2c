//! Per-commodity endpoints and name resolution
//!
//! Commodity names in paths go through the same resolution as
//! `/api/v1/resolve`, so `/api/v1/commodities/ARHAR/current` works.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use mandi_engine::{ForecastPoint, ForecastResult, HistoricalPoint, InitFailure};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Default forecast horizon in months.
pub const DEFAULT_HORIZON: u32 = 6;

/// Registered commodities
#[derive(Debug, Clone, Serialize)]
pub struct CommodityListResponse {
    /// Trained commodities in configuration order
    pub commodities: Vec<CommoditySummary>,
    /// Commodities that failed to initialise
    pub failures: Vec<InitFailure>,
}

/// One trained commodity
#[derive(Debug, Clone, Serialize)]
pub struct CommoditySummary {
    /// Canonical name
    pub name: String,
    /// Source identifier (file stem)
    pub source_id: String,
    /// Model family
    pub model: String,
    /// Months of observed history
    pub observations: usize,
    /// "Now" for this commodity
    pub anchor: String,
}

/// Query parameters for the forecast endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastParams {
    /// Months ahead (default 6)
    pub horizon: Option<u32>,
}

/// Forecast response with peak and trough months
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    /// Full forecast
    #[serde(flatten)]
    pub forecast: ForecastResult,
    /// Highest predicted month
    pub peak: Option<ForecastPoint>,
    /// Lowest predicted month
    pub trough: Option<ForecastPoint>,
}

/// Previous-twelve response
#[derive(Debug, Clone, Serialize)]
pub struct PreviousResponse {
    /// Canonical name
    pub commodity: String,
    /// Oldest month first
    pub points: Vec<HistoricalPoint>,
}

/// Current-month response
#[derive(Debug, Clone, Serialize)]
pub struct CurrentResponse {
    /// Canonical name
    pub commodity: String,
    /// Prediction for the anchor month
    #[serde(flatten)]
    pub point: ForecastPoint,
}

/// Query parameters for `/api/v1/resolve`
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveParams {
    /// Human-entered name
    pub name: String,
}

/// Name resolution result
#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    /// Input as received
    pub input: String,
    /// Canonical name
    pub name: String,
    /// Source identifier
    pub source_id: String,
}

/// Build the commodity routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/commodities", get(list_handler))
        .route("/api/v1/commodities/{name}/forecast", get(forecast_handler))
        .route("/api/v1/commodities/{name}/current", get(current_handler))
        .route("/api/v1/commodities/{name}/previous", get(previous_handler))
        .route("/api/v1/resolve", get(resolve_handler))
}

/// GET /api/v1/commodities
async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<CommodityListResponse>, ApiError> {
    let report = state.initialise().await?;
    let commodities = state
        .registry
        .commodities()?
        .iter()
        .map(|c| CommoditySummary {
            name: c.name().to_string(),
            source_id: c.source_id().to_string(),
            model: c.model().model_name().to_string(),
            observations: c.history().len(),
            anchor: c.anchor().to_string(),
        })
        .collect();

    Ok(Json(CommodityListResponse {
        commodities,
        failures: report.failures.clone(),
    }))
}

/// GET /api/v1/commodities/{name}/forecast?horizon=6
async fn forecast_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let horizon = params.horizon.unwrap_or(DEFAULT_HORIZON);
    let forecast = state.ready_registry().await?.forecast(&name, horizon)?;

    Ok(Json(ForecastResponse {
        peak: forecast.peak().cloned(),
        trough: forecast.trough().cloned(),
        forecast,
    }))
}

/// GET /api/v1/commodities/{name}/current
async fn current_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CurrentResponse>, ApiError> {
    let registry = state.ready_registry().await?;
    let commodity = registry.resolve(&name)?.name().to_string();
    let point = registry.current_month(&commodity)?;
    Ok(Json(CurrentResponse { commodity, point }))
}

/// GET /api/v1/commodities/{name}/previous
async fn previous_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PreviousResponse>, ApiError> {
    let registry = state.ready_registry().await?;
    let commodity = registry.resolve(&name)?.name().to_string();
    let points = registry.previous_twelve(&commodity)?;
    Ok(Json(PreviousResponse { commodity, points }))
}

/// GET /api/v1/resolve?name=arhar
async fn resolve_handler(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let commodity = state.ready_registry().await?.resolve(&params.name)?;
    Ok(Json(ResolveResponse {
        name: commodity.name().to_string(),
        source_id: commodity.source_id().to_string(),
        input: params.name,
    }))
}
