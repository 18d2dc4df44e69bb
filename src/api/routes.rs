//! API Routes
//!
//! HTTP endpoint definitions. Handlers decode the wire format, call the
//! shared Aggregator and encode its result; they hold no domain logic.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::domain::{DistanceReport, Invoice, ObuId};
use crate::error::{AppError, AppResult};
use crate::service::SharedAggregator;

// =========================================================================
// State
// =========================================================================

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub aggregator: SharedAggregator,
    /// Renders `/metrics`; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(aggregator: SharedAggregator) -> Self {
        Self {
            aggregator,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/aggregate",
            post(aggregate).fallback(method_not_supported),
        )
        .route(
            "/invoice",
            get(get_invoice).fallback(method_not_supported),
        )
        .route("/invoice/all", any(get_all_invoices))
        .route("/metrics", get(metrics_handler))
}

async fn method_not_supported() -> AppError {
    AppError::MethodNotSupported
}

// =========================================================================
// POST /aggregate
// =========================================================================

/// Ingest one distance report
async fn aggregate(State(state): State<AppState>, body: Bytes) -> AppResult<StatusCode> {
    let report: DistanceReport =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    state.aggregator.aggregate_distance(report)?;

    Ok(StatusCode::OK)
}

// =========================================================================
// GET /invoice?obu=<id>
// =========================================================================

/// Compute the current invoice for one OBU.
///
/// A repeated `obu` parameter is allowed; the first value wins.
async fn get_invoice(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Invoice>> {
    let Query(params) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let obu_id: ObuId = params
        .into_iter()
        .find(|(key, _)| key == "obu")
        .map(|(_, value)| value)
        .ok_or(AppError::MissingObuId)?
        .parse()
        .map_err(|_| AppError::InvalidObuId)?;

    let invoice = state.aggregator.calculate_invoice(obu_id)?;

    Ok(Json(invoice))
}

// =========================================================================
// GET /invoice/all
// =========================================================================

/// Placeholder kept for existing callers: always `200` with a `null` body.
///
/// TODO: serve `calculate_all_invoices` here once the list response shape
/// is agreed with the callers of this path.
async fn get_all_invoices() -> Json<Option<Vec<Invoice>>> {
    Json(None)
}

// =========================================================================
// GET /metrics
// =========================================================================

/// Prometheus text exposition
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
