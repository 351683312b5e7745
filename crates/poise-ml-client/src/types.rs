//! ML service request/response types.

use poise_models::{FaceEmotion, LandmarkPoint, SentimentUtterance};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
    /// Models loaded by the service (e.g. `transcription`, `landmarks`)
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }

    /// Whether the service advertises a model. Services that do not list
    /// capabilities are assumed to host all of them.
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.is_empty() || self.capabilities.iter().any(|c| c == capability)
    }
}

/// Request for transcript sentiment classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

/// Sentiment classification output, in classifier order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    #[serde(default)]
    pub results: Vec<SentimentUtterance>,
}

/// Faces found in one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionsResponse {
    #[serde(default)]
    pub faces: Vec<FaceEmotion>,
}

/// Face mesh of the first face in one image.
///
/// Points are normalized to `[0, 1]` image coordinates; `None` when no face
/// was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarksResponse {
    #[serde(default)]
    pub landmarks: Option<Vec<LandmarkPoint>>,
}

/// Speech-to-text output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
