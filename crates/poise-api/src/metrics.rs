//! Prometheus metrics for the HTTP layer.

use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Metric names.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "poise_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "poise_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "poise_http_requests_in_flight";
    pub const RATE_LIMIT_HITS_TOTAL: &str = "poise_rate_limit_hits_total";
}

/// Install the global Prometheus recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0],
        )?
        .install_recorder()
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_rate_limit_hit(path: &str) {
    counter!(names::RATE_LIMIT_HITS_TOTAL, "path" => route_label(path)).increment(1);
}

/// Middleware recording request count, latency and in-flight requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = route_label(request.uri().path());
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// Map a request path to a bounded label set.
pub fn route_label(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" => "/".to_string(),
        p @ ("/health" | "/healthz" | "/ready" | "/metrics" | "/analyze" | "/api/analyze") => p.to_string(),
        _ => "other".to_string(),
    }
}
