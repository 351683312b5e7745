//! Per-frame capability outcomes.
//!
//! A per-frame model call either produces a detection or is `Unavailable`.
//! Callers map `Unavailable` to a fixed default payload; it never escapes a
//! frame.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::error::CapabilityResult;
use crate::metrics;

/// Why a per-frame detection is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("detector failed: {0}")]
    Failed(String),

    #[error("detector timed out after {0:?}")]
    TimedOut(Duration),
}

impl Unavailable {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Unavailable::Failed(_) => "error",
            Unavailable::TimedOut(_) => "timeout",
        }
    }
}

/// Run one capability call under `timeout`.
pub async fn bounded<T, F>(capability: &'static str, timeout: Duration, call: F) -> Result<T, Unavailable>
where
    F: Future<Output = CapabilityResult<T>>,
{
    let unavailable = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => Unavailable::Failed(e.to_string()),
        Err(_) => Unavailable::TimedOut(timeout),
    };

    debug!(
        capability,
        reason = unavailable.reason(),
        error = %unavailable,
        "Frame capability unavailable, using default"
    );
    metrics::record_frame_degraded(capability, unavailable.reason());

    Err(unavailable)
}
