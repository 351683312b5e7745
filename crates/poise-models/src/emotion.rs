//! Facial emotion models.
//!
//! Emotion detectors report one probability per label (`happy`, `neutral`,
//! `sad`, ...) for every face they find. The timeline keeps one distribution
//! per sampled frame; an empty distribution means no usable face.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Emotion label to probability mapping for a single face.
///
/// Labels are kept sorted so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EmotionScores(BTreeMap<String, f64>);

impl EmotionScores {
    /// Create an empty distribution (no face / analysis unavailable).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no labels are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Probability for a label, if the detector reported it.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Probability for a label, treating a missing label as 0.
    pub fn probability(&self, label: &str) -> f64 {
        self.get(label).unwrap_or(0.0)
    }

    /// Insert or replace a label.
    pub fn insert(&mut self, label: impl Into<String>, probability: f64) {
        self.0.insert(label.into(), probability);
    }

    /// Iterate labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Face bounding box in pixels, serialized as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area (`width * height`). Negative extents count as zero.
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

impl From<[f64; 4]> for FaceBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<FaceBox> for [f64; 4] {
    fn from(b: FaceBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// One face reported by the emotion detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceEmotion {
    /// Bounding box `[x, y, w, h]`
    #[serde(rename = "box")]
    pub bbox: FaceBox,
    /// Emotion distribution for this face
    #[serde(default)]
    pub emotions: EmotionScores,
}

/// Emotion distribution of one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmotionTimelinePoint {
    /// Position in the sampled frame sequence
    pub t: usize,
    /// Primary-face emotions; empty when no face was found or analysis failed
    pub emotions: EmotionScores,
}

impl EmotionTimelinePoint {
    pub fn new(t: usize, emotions: EmotionScores) -> Self {
        Self { t, emotions }
    }

    /// Whether this frame carries a usable emotion distribution.
    pub fn has_face(&self) -> bool {
        !self.emotions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_box_wire_format() {
        let face: FaceEmotion =
            serde_json::from_str(r#"{"box":[10,20,30,40],"emotions":{"happy":0.9}}"#).unwrap();
        assert_eq!(face.bbox, FaceBox::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(face.bbox.area(), 1200.0);
        assert_eq!(face.emotions.get("happy"), Some(0.9));

        let json = serde_json::to_value(&face).unwrap();
        assert_eq!(json["box"], serde_json::json!([10.0, 20.0, 30.0, 40.0]));
    }

    #[test]
    fn test_face_without_emotions_defaults_to_empty() {
        let face: FaceEmotion = serde_json::from_str(r#"{"box":[0,0,5,5]}"#).unwrap();
        assert!(face.emotions.is_empty());
    }

    #[test]
    fn test_empty_point_serializes_as_empty_object() {
        let point = EmotionTimelinePoint::new(3, EmotionScores::empty());
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"t":3,"emotions":{}}"#);
        assert!(!point.has_face());
    }

    #[test]
    fn test_probability_defaults_to_zero() {
        let scores: EmotionScores = [("neutral", 0.7)].into_iter().collect();
        assert_eq!(scores.probability("neutral"), 0.7);
        assert_eq!(scores.probability("happy"), 0.0);
    }

    #[test]
    fn test_negative_extent_has_zero_area() {
        assert_eq!(FaceBox::new(0.0, 0.0, -4.0, 10.0).area(), 0.0);
    }
}
