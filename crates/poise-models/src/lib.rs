//! Shared data models for the Poise analysis service.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion distributions, face detections and the per-frame emotion timeline
//! - Sentiment classification output
//! - Facial landmark sets used by the gaze heuristic
//! - Sub-scores and the final analysis result

pub mod analysis;
pub mod emotion;
pub mod landmarks;
pub mod sentiment;
pub mod utils;

// Re-export common types
pub use analysis::{AnalysisResult, Scores};
pub use emotion::{EmotionScores, EmotionTimelinePoint, FaceBox, FaceEmotion};
pub use landmarks::{FaceLandmarks, LandmarkPoint};
pub use sentiment::{SentimentPolarity, SentimentUtterance};
pub use utils::{clamp_score, round_to};
