use actix_web::HttpResponse;
use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, TextEncoder};
use std::time::Duration;

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    ).unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency",
        &["method", "path", "status"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    ).unwrap();

    pub static ref RECOMMENDATIONS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "recommendations_total",
        "Recommendation requests by outcome",
        &["outcome"]
    ).unwrap();

    pub static ref METADATA_PLACEHOLDER_TOTAL: IntCounter = prometheus::register_int_counter!(
        "metadata_placeholder_total",
        "Recommended items served with a placeholder title"
    ).unwrap();

    pub static ref ARTIFACT_ROWS_DROPPED_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "artifact_rows_dropped_total",
        "Artifact rows dropped at load time",
        &["artifact", "reason"]
    ).unwrap();
}

pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path, status.as_str()])
        .observe(elapsed.as_secs_f64());
}

pub fn record_outcome(outcome: &str) {
    RECOMMENDATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_dropped(artifact: &str, reason: &str, count: usize) {
    if count > 0 {
        ARTIFACT_ROWS_DROPPED_TOTAL
            .with_label_values(&[artifact, reason])
            .inc_by(count as u64);
    }
}

/// GET /metrics
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
