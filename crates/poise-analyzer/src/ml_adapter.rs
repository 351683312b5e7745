//! Capability implementations backed by the ML service.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use poise_media::Frame;
use poise_ml_client::MlClient;
use poise_models::{FaceEmotion, FaceLandmarks, LandmarkPoint, SentimentUtterance};

use crate::capabilities::{EmotionDetector, LandmarkDetector, SentimentClassifier, Transcriber};
use crate::error::CapabilityResult;

/// Speech-to-text through the ML service.
#[derive(Debug, Clone)]
pub struct MlTranscriber {
    client: Arc<MlClient>,
}

impl MlTranscriber {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transcriber for MlTranscriber {
    async fn transcribe(&self, wav_path: &Path) -> CapabilityResult<String> {
        let wav = tokio::fs::read(wav_path).await?;
        Ok(self.client.transcribe(&wav).await?)
    }

    fn name(&self) -> &'static str {
        "ml_transcription"
    }
}

/// Sentiment classification through the ML service.
#[derive(Debug, Clone)]
pub struct MlSentimentClassifier {
    client: Arc<MlClient>,
}

impl MlSentimentClassifier {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SentimentClassifier for MlSentimentClassifier {
    async fn classify(&self, text: &str) -> CapabilityResult<Vec<SentimentUtterance>> {
        Ok(self.client.classify_sentiment(text).await?)
    }

    fn name(&self) -> &'static str {
        "ml_sentiment"
    }
}

/// Face/emotion detection through the ML service.
#[derive(Debug, Clone)]
pub struct MlEmotionDetector {
    client: Arc<MlClient>,
}

impl MlEmotionDetector {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmotionDetector for MlEmotionDetector {
    async fn detect(&self, frame: &Frame) -> CapabilityResult<Vec<FaceEmotion>> {
        let jpeg = frame.encode_jpeg()?;
        Ok(self.client.detect_emotions(&jpeg).await?)
    }

    fn name(&self) -> &'static str {
        "ml_emotions"
    }
}

/// Face-mesh landmarks through the ML service.
///
/// The service reports normalized coordinates; they are scaled to frame
/// pixels here.
#[derive(Debug, Clone)]
pub struct MlLandmarkDetector {
    client: Arc<MlClient>,
}

impl MlLandmarkDetector {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LandmarkDetector for MlLandmarkDetector {
    async fn detect(&self, frame: &Frame) -> CapabilityResult<Option<FaceLandmarks>> {
        let jpeg = frame.encode_jpeg()?;
        let points = self.client.detect_landmarks(&jpeg).await?;

        Ok(points
            .filter(|p| !p.is_empty())
            .map(|p| to_pixels(&p, frame.width(), frame.height())))
    }

    fn name(&self) -> &'static str {
        "ml_landmarks"
    }
}

fn to_pixels(points: &[LandmarkPoint], width: u32, height: u32) -> FaceLandmarks {
    let (w, h) = (f64::from(width), f64::from(height));
    FaceLandmarks::new(
        points
            .iter()
            .map(|p| LandmarkPoint::new(p.x * w, p.y * h))
            .collect(),
    )
}
