//! Sentiment classification models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One unit of sentiment classification output.
///
/// The transcript is currently classified as a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentUtterance {
    /// Classifier label (e.g. `positive`, `Negative`, `neutral`)
    pub label: String,
    /// Classifier confidence in [0, 1]
    pub score: f64,
}

impl SentimentUtterance {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Polarity derived from the label prefix.
    pub fn polarity(&self) -> SentimentPolarity {
        SentimentPolarity::from_label(&self.label)
    }
}

/// Which side of the aggregation an utterance counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentPolarity {
    Positive,
    Negative,
    /// Any other label (`neutral`, `mixed`, ...)
    Other,
}

impl SentimentPolarity {
    /// Classify a label by case-insensitive prefix.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with("positive") {
            Self::Positive
        } else if label.starts_with("negative") {
            Self::Negative
        } else {
            Self::Other
        }
    }
}
