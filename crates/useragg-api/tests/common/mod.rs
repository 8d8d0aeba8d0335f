//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use useragg_aggregator::application::aggregator::UserAggregator;
use useragg_aggregator::application::config::AggregatorConfig;
use useragg_store::memory::stores_from_seed;
use useragg_store::seed::Seed;
use useragg_test_support::{basic_profiles, orders};

use useragg_api::routes;
use useragg_api::state::AppState;

/// Seed shared across integration tests: the five fixture profiles and a
/// handful of orders owned by Alice (1) and Charlie (3).
pub fn fixture_seed() -> Seed {
    Seed {
        profiles: basic_profiles(),
        orders: orders(&[(1, 1, 100.0), (2, 1, 20.6), (3, 3, 30.79)]),
    }
}

/// Build the full app router over in-memory sources. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app(latency: Option<Duration>, timeout: Option<Duration>) -> Router {
    let (profiles, orders) = stores_from_seed(fixture_seed(), latency);
    let aggregator = UserAggregator::new(
        Arc::new(profiles),
        Arc::new(orders),
        AggregatorConfig {
            timeout,
            ..AggregatorConfig::default()
        },
    );
    routes::app(AppState::new(Arc::new(aggregator)))
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
