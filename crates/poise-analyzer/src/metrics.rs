//! Analysis metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus recorder. Without a recorder these calls are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSES_TOTAL: &str = "poise_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "poise_analysis_duration_seconds";
    pub const FRAMES_SAMPLED_TOTAL: &str = "poise_frames_sampled_total";
    pub const FRAME_DEGRADED_TOTAL: &str = "poise_frame_degraded_total";
    pub const AUDIO_EXTRACTION_FAILURES_TOTAL: &str = "poise_audio_extraction_failures_total";
}

/// Record a finished analysis.
pub fn record_analysis(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record sampled frames.
pub fn record_frames_sampled(count: usize) {
    counter!(names::FRAMES_SAMPLED_TOTAL).increment(count as u64);
}

/// Record a per-frame capability call that fell back to its default.
pub fn record_frame_degraded(capability: &str, reason: &str) {
    let labels = [
        ("capability", capability.to_string()),
        ("reason", reason.to_string()),
    ];
    counter!(names::FRAME_DEGRADED_TOTAL, &labels).increment(1);
}

/// Record an audio extraction failure.
pub fn record_audio_extraction_failure() {
    counter!(names::AUDIO_EXTRACTION_FAILURES_TOTAL).increment(1);
}
