use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// A single reconstructed point of the racing line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackSample {
    pub position: na::Point3<f32>,

    // unit, or zero when undefined
    pub direction: na::Vector3<f32>,

    // lateral width, left + right edge distance
    pub width: f32,

    pub is_curve: bool,

    // 0 = straight, 1 = sharpest turn
    pub curvature: f32,
}

impl TrackSample {
    pub fn new(position: na::Point3<f32>, direction: na::Vector3<f32>, width: f32) -> Self {
        Self {
            position,
            direction,
            width,
            is_curve: false,
            curvature: 0.0,
        }
    }

    #[inline]
    pub fn has_direction(&self) -> bool {
        self.direction != na::Vector3::zeros()
    }
}
