//! ML service HTTP client.

use std::time::Duration;

use poise_models::{FaceEmotion, LandmarkPoint, SentimentUtterance};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{
    EmotionsResponse, HealthResponse, LandmarksResponse, SentimentRequest, SentimentResponse,
    TranscriptionResponse,
};

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ML_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(
                std::env::var("ML_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("ML_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the Python ML service.
#[derive(Debug, Clone)]
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Fetch the service health document.
    pub async fn health(&self) -> MlResult<HealthResponse> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(MlError::Network)?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Check if ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        match self.health().await {
            Ok(health) => Ok(health.is_healthy()),
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Classify transcript sentiment.
    pub async fn classify_sentiment(&self, text: &str) -> MlResult<Vec<SentimentUtterance>> {
        let url = self.url("/sentiment");
        let request = SentimentRequest {
            text: text.to_string(),
        };

        debug!(chars = text.len(), "Sending sentiment request to {}", url);

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(MlError::Network)?;
                check_status(response).await
            })
            .await?;

        let body: SentimentResponse = response.json().await?;
        Ok(body.results)
    }

    /// Detect faces and their emotion distributions in a JPEG image.
    pub async fn detect_emotions(&self, jpeg: &[u8]) -> MlResult<Vec<FaceEmotion>> {
        let response = self.post_file("/emotions", "image", "frame.jpg", "image/jpeg", jpeg).await?;
        let body: EmotionsResponse = response.json().await?;
        Ok(body.faces)
    }

    /// Detect the face mesh of the first face in a JPEG image.
    ///
    /// Points are normalized image coordinates.
    pub async fn detect_landmarks(&self, jpeg: &[u8]) -> MlResult<Option<Vec<LandmarkPoint>>> {
        let response = self
            .post_file("/landmarks", "image", "frame.jpg", "image/jpeg", jpeg)
            .await?;
        let body: LandmarksResponse = response.json().await?;
        Ok(body.landmarks)
    }

    /// Transcribe a WAV recording.
    pub async fn transcribe(&self, wav: &[u8]) -> MlResult<String> {
        let response = self
            .post_file("/transcribe", "audio", "audio.wav", "audio/wav", wav)
            .await?;
        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }

    async fn post_file(
        &self,
        path: &str,
        field: &'static str,
        file_name: &'static str,
        mime: &'static str,
        bytes: &[u8],
    ) -> MlResult<Response> {
        let url = self.url(path);

        debug!(bytes = bytes.len(), "Sending {} upload to {}", field, url);

        self.with_retry(|| async {
            let part = Part::bytes(bytes.to_vec())
                .file_name(file_name)
                .mime_str(mime)
                .map_err(MlError::Network)?;
            let form = Form::new().part(field, part);

            let response = self
                .http
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(MlError::Network)?;
            check_status(response).await
        })
        .await
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "ML request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(MlError::RequestFailed("Unknown error".to_string())))
    }
}

/// Map non-success statuses to errors; gateway and overload statuses are
/// retryable.
async fn check_status(response: Response) -> MlResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("ML service returned {}: {}", status, body);

    match status {
        StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::BAD_GATEWAY
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => Err(MlError::ServiceUnavailable(message)),
        _ => Err(MlError::RequestFailed(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MlClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_url_join() {
        let client = MlClient::new(MlClientConfig {
            base_url: "http://ml:9000".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("/sentiment"), "http://ml:9000/sentiment");
    }
}
