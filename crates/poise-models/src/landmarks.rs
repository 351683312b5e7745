//! Facial landmark models.
//!
//! Landmark sets follow the 478-point MediaPipe face mesh layout with refined
//! iris points. Coordinates are in frame pixels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Single 2-D landmark in frame pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Landmarks of one face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceLandmarks {
    pub points: Vec<LandmarkPoint>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Number of points in the set.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at a mesh index.
    pub fn point(&self, index: usize) -> Option<LandmarkPoint> {
        self.points.get(index).copied()
    }

    /// Mean of the points at `indices`.
    ///
    /// Returns `None` when any index is out of range, a point is not finite,
    /// or `indices` is empty.
    pub fn centroid(&self, indices: &[usize]) -> Option<LandmarkPoint> {
        if indices.is_empty() {
            return None;
        }

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for &idx in indices {
            let p = self.point(idx).filter(LandmarkPoint::is_finite)?;
            sum_x += p.x;
            sum_y += p.y;
        }

        let n = indices.len() as f64;
        Some(LandmarkPoint::new(sum_x / n, sum_y / n))
    }
}
