//! Prometheus metrics for studio-service.
//!
//! Exposes publish pipeline collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder};

static PUBLISH_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "studio_publish_attempts_total",
        "Per-platform publish attempts by outcome",
        &["platform", "outcome"]
    )
    .expect("metric registration")
});

static QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "studio_publish_queue_depth",
        "Posts currently waiting in the publish queue"
    )
    .expect("metric registration")
});

pub fn record_publish_attempt(platform: &str, outcome: &str) {
    PUBLISH_ATTEMPTS
        .with_label_values(&[platform, outcome])
        .inc();
}

pub fn set_queue_depth(depth: i64) {
    QUEUE_DEPTH.set(depth);
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
