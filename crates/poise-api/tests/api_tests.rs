//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::path::Path;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use poise_analyzer::{
    AnalysisPipeline, AnalyzerConfig, CapabilityError, CapabilityResult, ModelRegistry,
    Transcriber,
};
use poise_api::{create_router, ApiConfig, AppState};
use poise_media::{check_ffmpeg, check_ffprobe};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "poise-test-boundary";

struct FixedTranscriber;

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _wav_path: &Path) -> CapabilityResult<String> {
        Ok("hello".to_string())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _wav_path: &Path) -> CapabilityResult<String> {
        Err(CapabilityError::InvalidOutput("speech engine crashed".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn tools_available() -> bool {
    check_ffmpeg().is_ok() && check_ffprobe().is_ok()
}

/// Encode a 2 s 64x48 clip with a sine-tone audio track.
async fn clip_with_audio(dir: &Path) -> Vec<u8> {
    let path = dir.join("clip.mkv");
    let status = tokio::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-v",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x48:rate=25",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:sample_rate=16000",
            "-t",
            "2",
            "-c:v",
            "ffv1",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "pcm_s16le",
        ])
        .arg(&path)
        .status()
        .await
        .unwrap();
    assert!(status.success());
    tokio::fs::read(&path).await.unwrap()
}

fn router_with(config: ApiConfig, registry: ModelRegistry) -> Router {
    let pipeline = AnalysisPipeline::new(AnalyzerConfig::default(), Arc::new(registry)).unwrap();
    create_router(AppState::from_parts(config, pipeline, None), None)
}

fn test_router() -> Router {
    router_with(
        ApiConfig::default(),
        ModelRegistry::stubbed().with_transcriber(Arc::new(FixedTranscriber)),
    )
}

fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"answer.webm\"\r\nContent-Type: video/webm\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(field: &str, content: &[u8]) -> Request<Body> {
    analyze_request_at("/api/analyze", field, content)
}

fn analyze_request_at(uri: &str, field: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, content)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let response = test_router()
        .oneshot(
            Request::get("/healthz")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-request-id"], "req-123");

    let response = test_router()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_ready_without_ml_service_is_degraded() {
    let response = test_router()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["ml_service"]["status"], "error");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let response = test_router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_missing_file_field() {
    let response = test_router()
        .oneshot(analyze_request("video", b"data"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "bad_request");
    assert!(body["detail"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_analyze_empty_file() {
    let response = test_router()
        .oneshot(analyze_request("file", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_without_transcriber_is_unavailable() {
    let router = router_with(ApiConfig::default(), ModelRegistry::stubbed());
    let response = router
        .oneshot(analyze_request("file", b"not really a video"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn test_analyze_undecodable_upload() {
    let tools_present = tools_available();

    let response = test_router()
        .oneshot(analyze_request("file", b"not really a video"))
        .await
        .unwrap();

    if !tools_present {
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        return;
    }

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcript"], "");
    assert_eq!(body["sentiment_series"], serde_json::json!([]));
    assert_eq!(body["emotion_timeline"], serde_json::json!([]));
    assert_eq!(body["eye_contact_pct"], 0.0);
    assert_eq!(body["scores"]["sentiment"], 50.0);
    assert_eq!(body["scores"]["eye_contact"], 0.0);
    assert_eq!(body["scores"]["emotion"], 34.0);
    assert_eq!(body["scores"]["overall"], 30.2);
}

#[tokio::test]
async fn test_analyze_served_at_root_path() {
    let response = test_router()
        .oneshot(analyze_request_at("/analyze", "video", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "bad_request");

    let router = router_with(ApiConfig::default(), ModelRegistry::stubbed());
    let response = router
        .oneshot(analyze_request_at("/analyze", "file", b"not really a video"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_failing_transcriber_is_unavailable() {
    if !tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = clip_with_audio(dir.path()).await;

    let router = router_with(
        ApiConfig::default(),
        ModelRegistry::stubbed().with_transcriber(Arc::new(FailingTranscriber)),
    );
    let response = router
        .oneshot(analyze_request_at("/analyze", "file", &clip))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["code"], "service_unavailable");
    assert!(body["detail"].as_str().unwrap().contains("failing"));
}

#[tokio::test]
async fn test_body_limit() {
    let router = router_with(
        ApiConfig {
            max_body_size: 16,
            ..Default::default()
        },
        ModelRegistry::stubbed().with_transcriber(Arc::new(FixedTranscriber)),
    );

    let body = multipart_body("file", &[7u8; 1024]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let router = router_with(
        ApiConfig {
            rate_limit_rps: 1,
            ..Default::default()
        },
        ModelRegistry::stubbed().with_transcriber(Arc::new(FixedTranscriber)),
    );

    let request = |ip: &str| {
        let mut request = analyze_request("video", b"data");
        request
            .headers_mut()
            .insert("x-forwarded-for", ip.parse().unwrap());
        request
    };

    let first = router.clone().oneshot(request("203.0.113.9")).await.unwrap();
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = router.clone().oneshot(request("203.0.113.9")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers()["retry-after"], "1");

    let other = router.oneshot(request("203.0.113.10")).await.unwrap();
    assert_eq!(other.status(), StatusCode::BAD_REQUEST);
}
