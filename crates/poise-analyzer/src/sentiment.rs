//! Transcript sentiment aggregation.

use poise_models::{clamp_score, SentimentPolarity, SentimentUtterance};

/// Group mean used when no utterance falls in a polarity group.
const EMPTY_GROUP_MEAN: f64 = 0.5;

/// Fuse classifier output into a sentiment sub-score in [0, 100].
///
/// Positive confidence raises the score, negative confidence lowers it at a
/// smaller rate; labels that are neither are ignored. No utterances give a
/// neutral 50.
pub fn score_sentiment(utterances: &[SentimentUtterance]) -> f64 {
    if utterances.is_empty() {
        return 50.0;
    }

    let pos_mean = group_mean(utterances, SentimentPolarity::Positive);
    let neg_mean = group_mean(utterances, SentimentPolarity::Negative);

    clamp_score(pos_mean * 100.0 - neg_mean * 30.0 + 50.0)
}

fn group_mean(utterances: &[SentimentUtterance], polarity: SentimentPolarity) -> f64 {
    let (sum, count) = utterances
        .iter()
        .filter(|u| u.polarity() == polarity)
        .fold((0.0, 0usize), |(sum, count), u| (sum + u.score, count + 1));

    if count == 0 {
        EMPTY_GROUP_MEAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(score_sentiment(&[]), 50.0);
    }

    #[test]
    fn test_single_positive() {
        // pos 0.9, neg default 0.5 -> 90 - 15 + 50 = 125 -> 100
        let score = score_sentiment(&[SentimentUtterance::new("positive", 0.9)]);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_single_negative() {
        // pos default 0.5, neg 0.8 -> 50 - 24 + 50 = 76
        let score = score_sentiment(&[SentimentUtterance::new("negative", 0.8)]);
        assert!((score - 76.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_prefix_case_insensitive() {
        let a = score_sentiment(&[SentimentUtterance::new("NEGATIVE", 0.8)]);
        let b = score_sentiment(&[SentimentUtterance::new("Negative_strong", 0.8)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_other_labels_ignored() {
        // both groups default 0.5 -> 50 - 15 + 50 = 85
        let score = score_sentiment(&[SentimentUtterance::new("neutral", 0.99)]);
        assert!((score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic() {
        let grid: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        for &neg in &grid {
            for pair in grid.windows(2) {
                let lo = score_sentiment(&[
                    SentimentUtterance::new("positive", pair[0]),
                    SentimentUtterance::new("negative", neg),
                ]);
                let hi = score_sentiment(&[
                    SentimentUtterance::new("positive", pair[1]),
                    SentimentUtterance::new("negative", neg),
                ]);
                assert!(hi >= lo, "positive {} -> {}", pair[0], pair[1]);
            }
        }
        for &pos in &grid {
            for pair in grid.windows(2) {
                let lo = score_sentiment(&[
                    SentimentUtterance::new("positive", pos),
                    SentimentUtterance::new("negative", pair[0]),
                ]);
                let hi = score_sentiment(&[
                    SentimentUtterance::new("positive", pos),
                    SentimentUtterance::new("negative", pair[1]),
                ]);
                assert!(hi <= lo, "negative {} -> {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_bounded() {
        for score in [0.0, 0.5, 1.0] {
            for label in ["positive", "negative", "other"] {
                let s = score_sentiment(&[SentimentUtterance::new(label, score)]);
                assert!((0.0..=100.0).contains(&s));
            }
        }
    }
}
