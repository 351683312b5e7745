//! Analyzer configuration.

use std::path::PathBuf;
use std::time::Duration;

use poise_media::{SamplerConfig, DEFAULT_MAX_FRAME_WIDTH};

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::gaze::DEFAULT_GAZE_TOLERANCE;
use crate::scoring::ScoreWeights;

/// Analysis pipeline configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Keep every n-th decoded frame
    pub every_nth: usize,
    /// Maximum horizontal iris offset from frame center, as a fraction of width
    pub gaze_tolerance: f64,
    /// Bound on each per-frame detector call
    pub frame_timeout: Duration,
    /// Optional cap on sampled frames
    pub max_frames: Option<usize>,
    /// Sampled frames wider than this are downscaled (`None` keeps source size)
    pub max_frame_width: Option<u32>,
    /// Bound on each FFmpeg invocation (audio extraction, full decode)
    pub media_timeout: Duration,
    /// Sub-score weights
    pub weights: ScoreWeights,
    /// Parent directory for request scratch space (system temp when unset)
    pub work_dir: Option<PathBuf>,
    /// Capability toggles; a disabled capability uses its stub
    pub enable_transcription: bool,
    pub enable_sentiment: bool,
    pub enable_emotions: bool,
    pub enable_landmarks: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            every_nth: 5,
            gaze_tolerance: DEFAULT_GAZE_TOLERANCE,
            frame_timeout: Duration::from_millis(10_000),
            max_frames: None,
            max_frame_width: Some(DEFAULT_MAX_FRAME_WIDTH),
            media_timeout: Duration::from_secs(300),
            weights: ScoreWeights::default(),
            work_dir: None,
            enable_transcription: true,
            enable_sentiment: true,
            enable_emotions: true,
            enable_landmarks: true,
        }
    }
}

impl AnalyzerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = ScoreWeights::default();

        Self {
            every_nth: std::env::var("ANALYZER_EVERY_NTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            gaze_tolerance: std::env::var("ANALYZER_GAZE_TOLERANCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_GAZE_TOLERANCE),
            frame_timeout: Duration::from_millis(
                std::env::var("ANALYZER_FRAME_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10_000),
            ),
            max_frames: std::env::var("ANALYZER_MAX_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0),
            max_frame_width: match std::env::var("ANALYZER_MAX_FRAME_WIDTH")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
            {
                Some(0) => None,
                Some(width) => Some(width),
                None => Some(DEFAULT_MAX_FRAME_WIDTH),
            },
            media_timeout: Duration::from_secs(
                std::env::var("ANALYZER_MEDIA_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            weights: ScoreWeights {
                sentiment: std::env::var("ANALYZER_WEIGHT_SENTIMENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.sentiment),
                eye_contact: std::env::var("ANALYZER_WEIGHT_EYE_CONTACT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.eye_contact),
                emotion: std::env::var("ANALYZER_WEIGHT_EMOTION")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.emotion),
            },
            work_dir: std::env::var("ANALYZER_WORK_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            enable_transcription: env_flag("ANALYZER_ENABLE_TRANSCRIPTION", true),
            enable_sentiment: env_flag("ANALYZER_ENABLE_SENTIMENT", true),
            enable_emotions: env_flag("ANALYZER_ENABLE_EMOTIONS", true),
            enable_landmarks: env_flag("ANALYZER_ENABLE_LANDMARKS", true),
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.every_nth == 0 {
            return Err(AnalyzerError::config_error("every_nth must be at least 1"));
        }

        if !(self.gaze_tolerance > 0.0 && self.gaze_tolerance <= 0.5) {
            return Err(AnalyzerError::config_error(format!(
                "gaze tolerance must be in (0, 0.5], got {}",
                self.gaze_tolerance
            )));
        }

        if self.frame_timeout.is_zero() {
            return Err(AnalyzerError::config_error("frame timeout must be positive"));
        }

        self.weights.validate()
    }

    /// Frame sampler settings derived from this config.
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            every_nth: self.every_nth,
            max_frames: self.max_frames,
            max_width: self.max_frame_width,
            decode_timeout: self.media_timeout,
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
