//! Frame timeline construction.

use poise_media::Frame;
use poise_models::EmotionTimelinePoint;
use tracing::debug;

use crate::affect::AffectAnalyzer;
use crate::gaze::GazeEstimator;

/// Visual signals of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTimeline {
    /// One point per sampled frame, `t` is the sampled position
    pub emotion_timeline: Vec<EmotionTimelinePoint>,
    /// Share of frames with eye contact, in [0, 100]
    pub eye_contact_pct: f64,
    /// Frames in which at least one face was detected
    pub total_faces_detected: usize,
}

/// Percentage of `hits` over `frames`; 0 for zero frames.
pub fn eye_contact_pct(hits: usize, frames: usize) -> f64 {
    100.0 * hits as f64 / frames.max(1) as f64
}

/// Drives affect and gaze analysis over sampled frames.
#[derive(Clone)]
pub struct TimelineBuilder {
    affect: AffectAnalyzer,
    gaze: GazeEstimator,
}

impl TimelineBuilder {
    pub fn new(affect: AffectAnalyzer, gaze: GazeEstimator) -> Self {
        Self { affect, gaze }
    }

    /// Analyze frames one at a time, in order.
    ///
    /// A frame whose detectors fail still contributes a timeline point with
    /// an empty distribution and counts as "not looking".
    pub async fn build(&self, frames: &[Frame]) -> FrameTimeline {
        let mut emotion_timeline = Vec::with_capacity(frames.len());
        let mut hits = 0usize;
        let mut total_faces_detected = 0usize;

        for (idx, frame) in frames.iter().enumerate() {
            let affect = self.affect.analyze(frame).await;
            if affect.face_count > 0 {
                total_faces_detected += 1;
            }

            if self.gaze.is_looking(frame).await {
                hits += 1;
            }

            emotion_timeline.push(EmotionTimelinePoint::new(idx, affect.emotions));
        }

        let timeline = FrameTimeline {
            eye_contact_pct: eye_contact_pct(hits, frames.len()),
            emotion_timeline,
            total_faces_detected,
        };

        debug!(
            frames = frames.len(),
            faces = total_faces_detected,
            eye_contact_hits = hits,
            "Built frame timeline"
        );

        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_contact_pct() {
        assert_eq!(eye_contact_pct(0, 0), 0.0);
        assert_eq!(eye_contact_pct(5, 10), 50.0);
        assert_eq!(eye_contact_pct(20, 20), 100.0);
        assert!((eye_contact_pct(1, 3) - 33.333_333).abs() < 1e-4);
    }
}
