//! Per-frame facial affect.

use std::sync::Arc;
use std::time::Duration;

use poise_media::Frame;
use poise_models::{EmotionScores, FaceEmotion};

use crate::capabilities::EmotionDetector;
use crate::outcome::{bounded, Unavailable};
use crate::registry::capability;

/// Affect of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAffect {
    /// Emotions of the primary face; empty when there is none
    pub emotions: EmotionScores,
    /// Faces reported by the detector
    pub face_count: usize,
}

impl FrameAffect {
    /// Payload for a frame without a usable detection.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_faces(faces: &[FaceEmotion]) -> Self {
        Self {
            emotions: primary_face(faces)
                .map(|face| face.emotions.clone())
                .unwrap_or_default(),
            face_count: faces.len(),
        }
    }
}

impl From<Result<Vec<FaceEmotion>, Unavailable>> for FrameAffect {
    fn from(outcome: Result<Vec<FaceEmotion>, Unavailable>) -> Self {
        match outcome {
            Ok(faces) => Self::from_faces(&faces),
            Err(_) => Self::none(),
        }
    }
}

/// The face with the largest box area. Among equal areas the first reported
/// face wins.
pub fn primary_face(faces: &[FaceEmotion]) -> Option<&FaceEmotion> {
    faces.iter().fold(None, |best: Option<&FaceEmotion>, face| match best {
        Some(current) if face.bbox.area() <= current.bbox.area() => Some(current),
        _ => Some(face),
    })
}

/// Runs the emotion detector on single frames.
#[derive(Clone)]
pub struct AffectAnalyzer {
    detector: Arc<dyn EmotionDetector>,
    timeout: Duration,
}

impl AffectAnalyzer {
    pub fn new(detector: Arc<dyn EmotionDetector>, timeout: Duration) -> Self {
        Self { detector, timeout }
    }

    /// Detect faces in one frame.
    pub async fn faces(&self, frame: &Frame) -> Result<Vec<FaceEmotion>, Unavailable> {
        bounded(capability::EMOTIONS, self.timeout, self.detector.detect(frame)).await
    }

    /// Analyze one frame. Detector failures count as zero faces.
    pub async fn analyze(&self, frame: &Frame) -> FrameAffect {
        FrameAffect::from(self.faces(frame).await)
    }
}
