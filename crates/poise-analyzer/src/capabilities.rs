//! Model capability traits.
//!
//! The pipeline never talks to a model directly. Each model is reached
//! through one of these traits so implementations can be swapped at startup
//! (ML service adapters, always-empty stubs, test fakes).

use std::path::Path;

use async_trait::async_trait;
use poise_media::Frame;
use poise_models::{FaceEmotion, FaceLandmarks, SentimentUtterance};

use crate::error::CapabilityResult;

/// Speech-to-text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a 16 kHz mono WAV file.
    async fn transcribe(&self, wav_path: &Path) -> CapabilityResult<String>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Transcript sentiment classification.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a non-empty text. Results are in classifier order.
    async fn classify(&self, text: &str) -> CapabilityResult<Vec<SentimentUtterance>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Face detection with per-face emotion distributions.
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    /// Detect zero or more faces in a frame.
    async fn detect(&self, frame: &Frame) -> CapabilityResult<Vec<FaceEmotion>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Face-mesh landmark detection.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    /// Landmarks of at most one face, in frame pixel coordinates.
    async fn detect(&self, frame: &Frame) -> CapabilityResult<Option<FaceLandmarks>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Stub Implementations
// ============================================================================

/// Sentiment classifier that never reports anything. The sentiment
/// sub-score falls back to neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSentimentClassifier;

#[async_trait]
impl SentimentClassifier for NoSentimentClassifier {
    async fn classify(&self, _text: &str) -> CapabilityResult<Vec<SentimentUtterance>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "stub_sentiment"
    }
}

/// Emotion detector that never finds a face.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaceEmotionDetector;

#[async_trait]
impl EmotionDetector for NoFaceEmotionDetector {
    async fn detect(&self, _frame: &Frame) -> CapabilityResult<Vec<FaceEmotion>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "stub_emotions"
    }
}

/// Landmark detector that never finds a face.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaceLandmarkDetector;

#[async_trait]
impl LandmarkDetector for NoFaceLandmarkDetector {
    async fn detect(&self, _frame: &Frame) -> CapabilityResult<Option<FaceLandmarks>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "stub_landmarks"
    }
}
