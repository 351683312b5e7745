//! Process-wide model registry.
//!
//! Built once at startup and shared read-only across requests. Each slot
//! holds either the ML service adapter or a stub, chosen from the capability
//! toggles and what the ML service advertises.

use std::fmt;
use std::sync::Arc;

use poise_ml_client::MlClient;
use tracing::{info, warn};

use crate::capabilities::{
    EmotionDetector, LandmarkDetector, NoFaceEmotionDetector, NoFaceLandmarkDetector,
    NoSentimentClassifier, SentimentClassifier, Transcriber,
};
use crate::config::AnalyzerConfig;
use crate::ml_adapter::{MlEmotionDetector, MlLandmarkDetector, MlSentimentClassifier, MlTranscriber};

/// Capability names as advertised by the ML service health endpoint.
pub mod capability {
    pub const TRANSCRIPTION: &str = "transcription";
    pub const SENTIMENT: &str = "sentiment";
    pub const EMOTIONS: &str = "emotions";
    pub const LANDMARKS: &str = "landmarks";
}

/// Shared model handles.
#[derive(Clone)]
pub struct ModelRegistry {
    transcriber: Option<Arc<dyn Transcriber>>,
    sentiment: Arc<dyn SentimentClassifier>,
    emotions: Arc<dyn EmotionDetector>,
    landmarks: Arc<dyn LandmarkDetector>,
}

impl ModelRegistry {
    /// Registry with no transcriber and stub detectors.
    pub fn stubbed() -> Self {
        Self {
            transcriber: None,
            sentiment: Arc::new(NoSentimentClassifier),
            emotions: Arc::new(NoFaceEmotionDetector),
            landmarks: Arc::new(NoFaceLandmarkDetector),
        }
    }

    /// Build the registry from config and an optional ML client.
    ///
    /// When the ML service is reachable, capabilities it does not advertise
    /// are downgraded to stubs. An unreachable service keeps the adapters so
    /// requests can succeed once it comes up.
    pub async fn connect(config: &AnalyzerConfig, client: Option<Arc<MlClient>>) -> Self {
        let Some(client) = client else {
            warn!("No ML service client configured, all capabilities use stubs");
            return Self::stubbed();
        };

        let advertised = match client.health().await {
            Ok(health) => {
                info!(
                    url = client.base_url(),
                    status = %health.status,
                    version = health.version.as_deref().unwrap_or("unknown"),
                    "Connected to ML service"
                );
                Some(health)
            }
            Err(e) => {
                warn!(
                    url = client.base_url(),
                    error = %e,
                    "ML service unreachable at startup, keeping remote capabilities"
                );
                None
            }
        };
        let supports = |name: &str| advertised.as_ref().map_or(true, |h| h.supports(name));

        let mut registry = Self::stubbed();

        if enabled(config.enable_transcription, supports(capability::TRANSCRIPTION), capability::TRANSCRIPTION) {
            registry.transcriber = Some(Arc::new(MlTranscriber::new(client.clone())));
        }
        if enabled(config.enable_sentiment, supports(capability::SENTIMENT), capability::SENTIMENT) {
            registry.sentiment = Arc::new(MlSentimentClassifier::new(client.clone()));
        }
        if enabled(config.enable_emotions, supports(capability::EMOTIONS), capability::EMOTIONS) {
            registry.emotions = Arc::new(MlEmotionDetector::new(client.clone()));
        }
        if enabled(config.enable_landmarks, supports(capability::LANDMARKS), capability::LANDMARKS) {
            registry.landmarks = Arc::new(MlLandmarkDetector::new(client));
        }

        info!(
            transcriber = registry.transcriber.as_ref().map_or("none", |t| t.name()),
            sentiment = registry.sentiment.name(),
            emotions = registry.emotions.name(),
            landmarks = registry.landmarks.name(),
            "Model registry ready"
        );

        registry
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentClassifier>) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_emotions(mut self, emotions: Arc<dyn EmotionDetector>) -> Self {
        self.emotions = emotions;
        self
    }

    pub fn with_landmarks(mut self, landmarks: Arc<dyn LandmarkDetector>) -> Self {
        self.landmarks = landmarks;
        self
    }

    pub fn transcriber(&self) -> Option<&Arc<dyn Transcriber>> {
        self.transcriber.as_ref()
    }

    pub fn sentiment(&self) -> &Arc<dyn SentimentClassifier> {
        &self.sentiment
    }

    pub fn emotions(&self) -> &Arc<dyn EmotionDetector> {
        &self.emotions
    }

    pub fn landmarks(&self) -> &Arc<dyn LandmarkDetector> {
        &self.landmarks
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("transcriber", &self.transcriber.as_ref().map(|t| t.name()))
            .field("sentiment", &self.sentiment.name())
            .field("emotions", &self.emotions.name())
            .field("landmarks", &self.landmarks.name())
            .finish()
    }
}

fn enabled(toggle: bool, advertised: bool, name: &str) -> bool {
    if !toggle {
        info!(capability = name, "Capability disabled by configuration");
        return false;
    }
    if !advertised {
        warn!(capability = name, "ML service does not provide capability, using stub");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_ml_client::MlClientConfig;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> Arc<MlClient> {
        Arc::new(
            MlClient::new(MlClientConfig {
                base_url,
                timeout: Duration::from_secs(2),
                max_retries: 0,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_stubbed_registry() {
        let registry = ModelRegistry::stubbed();
        assert!(registry.transcriber().is_none());
        assert_eq!(registry.emotions().name(), "stub_emotions");
        assert_eq!(registry.landmarks().name(), "stub_landmarks");
        assert_eq!(registry.sentiment().name(), "stub_sentiment");
    }

    #[tokio::test]
    async fn test_connect_without_client() {
        let registry = ModelRegistry::connect(&AnalyzerConfig::default(), None).await;
        assert!(registry.transcriber().is_none());
    }

    #[tokio::test]
    async fn test_connect_downgrades_missing_capabilities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "capabilities": ["transcription", "emotions"]
            })))
            .mount(&server)
            .await;

        let registry =
            ModelRegistry::connect(&AnalyzerConfig::default(), Some(client(server.uri()))).await;

        assert_eq!(registry.transcriber().map(|t| t.name()), Some("ml_transcription"));
        assert_eq!(registry.emotions().name(), "ml_emotions");
        assert_eq!(registry.sentiment().name(), "stub_sentiment");
        assert_eq!(registry.landmarks().name(), "stub_landmarks");
    }

    #[tokio::test]
    async fn test_connect_respects_toggles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let config = AnalyzerConfig {
            enable_transcription: false,
            enable_landmarks: false,
            ..Default::default()
        };
        let registry = ModelRegistry::connect(&config, Some(client(server.uri()))).await;

        assert!(registry.transcriber().is_none());
        assert_eq!(registry.landmarks().name(), "stub_landmarks");
        assert_eq!(registry.sentiment().name(), "ml_sentiment");
    }

    #[tokio::test]
    async fn test_connect_unreachable_keeps_adapters() {
        let registry = ModelRegistry::connect(
            &AnalyzerConfig::default(),
            Some(client("http://127.0.0.1:9".to_string())),
        )
        .await;

        assert!(registry.transcriber().is_some());
        assert_eq!(registry.emotions().name(), "ml_emotions");
    }
}
