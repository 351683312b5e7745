//! Analysis result models.
//!
//! `AnalysisResult` is the JSON contract of the analyze endpoint. It is built
//! fresh for every request and never persisted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionTimelinePoint;
use crate::sentiment::SentimentUtterance;
use crate::utils::round_to;

/// Per-modality sub-scores and the fused overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scores {
    /// Sentiment sub-score in [0, 100]
    pub sentiment: f64,
    /// Eye-contact percentage in [0, 100]
    pub eye_contact: f64,
    /// Emotion sub-score in [0, 100]
    pub emotion: f64,
    /// Weighted fusion of the three sub-scores
    pub overall: f64,
}

impl Scores {
    /// Round each field to one decimal place for presentation.
    ///
    /// `overall` is already rounded by the scoring engine; rounding it again
    /// is a no-op.
    pub fn rounded(self) -> Self {
        Self {
            sentiment: round_to(self.sentiment, 1),
            eye_contact: round_to(self.eye_contact, 1),
            emotion: round_to(self.emotion, 1),
            overall: round_to(self.overall, 1),
        }
    }
}

/// Full analysis output for one uploaded recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Speech-to-text transcript (empty when there was no usable audio)
    pub transcript: String,
    /// Sentiment classification of the transcript
    pub sentiment_series: Vec<SentimentUtterance>,
    /// One entry per sampled frame, in sampling order
    pub emotion_timeline: Vec<EmotionTimelinePoint>,
    /// Share of sampled frames judged as looking at the camera, in [0, 100]
    pub eye_contact_pct: f64,
    /// Sub-scores and overall score, rounded to one decimal place
    pub scores: Scores,
}
