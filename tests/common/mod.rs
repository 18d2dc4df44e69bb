//! Common test utilities

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use rust_decimal::Decimal;
use tower::util::ServiceExt;

use obu_aggregator::api::{self, AppState};
use obu_aggregator::{AggregatorService, MemoryStore, RatePerUnit, SharedAggregator};

/// Rate used by every integration test
pub fn test_rate() -> RatePerUnit {
    RatePerUnit::new(Decimal::new(315, 2)).unwrap()
}

/// Fresh aggregator over an empty store, plus a router sharing it
pub fn setup_app() -> (SharedAggregator, Router) {
    let store = Arc::new(MemoryStore::new());
    let aggregator: SharedAggregator = Arc::new(AggregatorService::new(store, test_rate()));
    let app = api::create_router().with_state(AppState::new(aggregator.clone()));
    (aggregator, app)
}

pub async fn send(app: &Router, request: Request<Body>) -> (u16, String) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}
