//! Scoring engine.
//!
//! Fuses the sentiment sub-score, the eye-contact percentage and the emotion
//! sub-score into a single overall score.

use poise_models::{clamp_score, round_to, EmotionTimelinePoint, Scores};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Mean `happy` probability assumed when no frame had a face.
const DEFAULT_HAPPY_MEAN: f64 = 0.3;

/// Mean `neutral` probability assumed when no frame had a face.
const DEFAULT_NEUTRAL_MEAN: f64 = 0.4;

const HAPPY_WEIGHT: f64 = 0.6;
const NEUTRAL_WEIGHT: f64 = 0.4;

/// Allowed deviation of the weight sum from 1.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Weights of the three sub-scores in the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub sentiment: f64,
    pub eye_contact: f64,
    pub emotion: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.4,
            eye_contact: 0.3,
            emotion: 0.3,
        }
    }
}

impl ScoreWeights {
    /// Create validated weights.
    pub fn new(sentiment: f64, eye_contact: f64, emotion: f64) -> AnalyzerResult<Self> {
        let weights = Self {
            sentiment,
            eye_contact,
            emotion,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Weights must be finite, non-negative and sum to 1 so the overall score
    /// stays in [0, 100].
    pub fn validate(&self) -> AnalyzerResult<()> {
        let all = [self.sentiment, self.eye_contact, self.emotion];

        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AnalyzerError::config_error(format!(
                "score weights must be non-negative, got {:?}",
                all
            )));
        }

        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(AnalyzerError::config_error(format!(
                "score weights must sum to 1, got {}",
                sum
            )));
        }

        Ok(())
    }
}

/// Emotion sub-score in [0, 100] from the frame timeline.
///
/// Only frames with a detected face contribute. With none, fixed baseline
/// means are used, giving 34.
pub fn score_emotion(timeline: &[EmotionTimelinePoint]) -> f64 {
    let (happy_sum, neutral_sum, count) = timeline
        .iter()
        .filter(|point| point.has_face())
        .fold((0.0, 0.0, 0usize), |(happy, neutral, count), point| {
            (
                happy + point.emotions.probability("happy"),
                neutral + point.emotions.probability("neutral"),
                count + 1,
            )
        });

    let (happy_mean, neutral_mean) = if count == 0 {
        (DEFAULT_HAPPY_MEAN, DEFAULT_NEUTRAL_MEAN)
    } else {
        (happy_sum / count as f64, neutral_sum / count as f64)
    };

    clamp_score((HAPPY_WEIGHT * happy_mean + NEUTRAL_WEIGHT * neutral_mean) * 100.0)
}

/// Weighted overall score, rounded to one decimal place.
pub fn overall_score(weights: &ScoreWeights, sentiment: f64, eye_contact: f64, emotion: f64) -> f64 {
    round_to(
        weights.sentiment * sentiment + weights.eye_contact * eye_contact + weights.emotion * emotion,
        1,
    )
}

/// Assemble the score block.
pub fn build_scores(weights: &ScoreWeights, sentiment: f64, eye_contact: f64, emotion: f64) -> Scores {
    Scores {
        sentiment,
        eye_contact,
        emotion,
        overall: overall_score(weights, sentiment, eye_contact, emotion),
    }
}
