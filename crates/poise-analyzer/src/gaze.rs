//! Eye-contact heuristic.
//!
//! A frame counts as "looking at the camera" when the midpoint between the
//! two iris centroids sits close to the horizontal center of the frame. This
//! is a 2-D approximation; head pose is not considered.

use std::sync::Arc;
use std::time::Duration;

use poise_media::Frame;
use poise_models::FaceLandmarks;

use crate::capabilities::LandmarkDetector;
use crate::outcome::{bounded, Unavailable};
use crate::registry::capability;

/// Default maximum `|x_norm - 0.5|` for eye contact.
pub const DEFAULT_GAZE_TOLERANCE: f64 = 0.08;

/// Refined iris points of the left eye in the 478-point face mesh.
pub const LEFT_IRIS: [usize; 4] = [468, 469, 470, 471];

/// Refined iris points of the right eye in the 478-point face mesh.
pub const RIGHT_IRIS: [usize; 4] = [473, 474, 475, 476];

/// Judge eye contact from a landmark set.
///
/// Missing iris points, non-finite coordinates or a zero frame width give
/// `false`.
pub fn looks_at_camera(landmarks: &FaceLandmarks, frame_width: u32, tolerance: f64) -> bool {
    if frame_width == 0 {
        return false;
    }

    let (Some(left), Some(right)) = (
        landmarks.centroid(&LEFT_IRIS),
        landmarks.centroid(&RIGHT_IRIS),
    ) else {
        return false;
    };

    let x_norm = (left.x + right.x) / 2.0 / f64::from(frame_width);
    x_norm.is_finite() && (x_norm - 0.5).abs() < tolerance
}

/// Per-frame gaze estimation over a landmark detector.
#[derive(Clone)]
pub struct GazeEstimator {
    detector: Arc<dyn LandmarkDetector>,
    tolerance: f64,
    timeout: Duration,
}

impl GazeEstimator {
    pub fn new(detector: Arc<dyn LandmarkDetector>, tolerance: f64, timeout: Duration) -> Self {
        Self {
            detector,
            tolerance,
            timeout,
        }
    }

    /// Detect landmarks for one frame.
    pub async fn landmarks(&self, frame: &Frame) -> Result<Option<FaceLandmarks>, Unavailable> {
        bounded(capability::LANDMARKS, self.timeout, self.detector.detect(frame)).await
    }

    /// Whether the subject looks at the camera in this frame.
    ///
    /// No face and an unavailable detector both count as "not looking".
    pub async fn is_looking(&self, frame: &Frame) -> bool {
        match self.landmarks(frame).await {
            Ok(Some(landmarks)) => looks_at_camera(&landmarks, frame.width(), self.tolerance),
            Ok(None) | Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_models::LandmarkPoint;

    /// Full mesh with both iris clusters centered horizontally at
    /// `left_x` / `right_x`.
    fn mesh(left_x: f64, right_x: f64) -> FaceLandmarks {
        let mut points = vec![LandmarkPoint::new(0.0, 0.0); 478];
        for (i, idx) in LEFT_IRIS.iter().enumerate() {
            let dx = if i % 2 == 0 { -1.0 } else { 1.0 };
            points[*idx] = LandmarkPoint::new(left_x + dx, 50.0);
        }
        for (i, idx) in RIGHT_IRIS.iter().enumerate() {
            let dx = if i % 2 == 0 { -2.0 } else { 2.0 };
            points[*idx] = LandmarkPoint::new(right_x + dx, 50.0);
        }
        FaceLandmarks::new(points)
    }

    #[test]
    fn test_centered_gaze() {
        // midpoint 100 on a 200px frame
        assert!(looks_at_camera(&mesh(80.0, 120.0), 200, DEFAULT_GAZE_TOLERANCE));
    }

    #[test]
    fn test_off_center_gaze() {
        // midpoint 140 -> 0.7
        assert!(!looks_at_camera(&mesh(120.0, 160.0), 200, DEFAULT_GAZE_TOLERANCE));
    }

    #[test]
    fn test_tolerance_bound() {
        // midpoint 117 -> 0.585
        let lm = mesh(117.0, 117.0);
        assert!(!looks_at_camera(&lm, 200, 0.08));
        assert!(looks_at_camera(&lm, 200, 0.09));
    }

    #[test]
    fn test_zero_width() {
        assert!(!looks_at_camera(&mesh(0.0, 0.0), 0, DEFAULT_GAZE_TOLERANCE));
    }

    #[test]
    fn test_missing_iris_points() {
        let short = FaceLandmarks::new(vec![LandmarkPoint::new(100.0, 100.0); 468]);
        assert!(!looks_at_camera(&short, 200, DEFAULT_GAZE_TOLERANCE));
    }

    #[test]
    fn test_non_finite_iris() {
        let mut lm = mesh(80.0, 120.0);
        lm.points[470] = LandmarkPoint::new(f64::INFINITY, 0.0);
        assert!(!looks_at_camera(&lm, 200, DEFAULT_GAZE_TOLERANCE));
    }
}
