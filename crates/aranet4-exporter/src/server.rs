//! HTTP surface: the scrape endpoint.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::metrics::ExportedMetrics;
use crate::render;

/// Content type for Prometheus text exposition format.
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Build the exporter router.
///
/// - `GET /metrics` - current values in Prometheus text format
/// - `GET /health` - liveness check
pub fn router(metrics: Arc<ExportedMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(metrics)
}

async fn serve_metrics(
    State(metrics): State<Arc<ExportedMetrics>>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        render::render(&metrics),
    )
}

async fn health() -> &'static str {
    "ok"
}
