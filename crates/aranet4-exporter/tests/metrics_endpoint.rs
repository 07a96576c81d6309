//! Scrape the router the way Prometheus would.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use aranet4_exporter::{ExportedMetrics, server};
use aranet4_link::Reading;

async fn scrape(metrics: Arc<ExportedMetrics>, path: &str) -> (StatusCode, String) {
    let app = server::router(metrics);
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_endpoint_serves_current_values() {
    let metrics = Arc::new(ExportedMetrics::new());
    metrics.record_reading(&Reading {
        co2: 650,
        temperature: 21.5,
        pressure: 1013.0,
        humidity: 45,
        battery: 80,
        interval: 60,
        age: 3,
    });

    let (status, body) = scrape(metrics, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("aranet4_co2 650\n"));
    assert!(body.contains("aranet4_connected_to_sensor{connected_to_sensor=\"true\"} 1\n"));
}

#[tokio::test]
async fn metrics_endpoint_reports_unknown_before_first_poll() {
    let metrics = Arc::new(ExportedMetrics::new());

    let (status, body) = scrape(metrics, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("aranet4_co2 NaN\n"));
    assert!(body.contains("aranet4_connected_to_sensor{connected_to_sensor=\"false\"} 1\n"));
}

#[tokio::test]
async fn health_endpoint_responds() {
    let metrics = Arc::new(ExportedMetrics::new());
    let (status, body) = scrape(metrics, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
