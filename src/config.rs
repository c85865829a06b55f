use std::path::Path;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::query::{LayerMask, SurfaceId};

/// Where tracing starts: a point above the track and the initial heading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub position: na::Point3<f32>,
    pub direction: na::Vector3<f32>,
}

impl Seed {
    pub fn new(position: na::Point3<f32>, direction: na::Vector3<f32>) -> Self {
        Self {
            position,
            direction,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackConfig {
    pub track_surface: Option<SurfaceId>,
    pub seed: Option<Seed>,
    pub track_layers: LayerMask,
    pub closed: bool,
    pub auto_detect_layer: bool,
    pub verbose: bool,

    pub sample_distance: f32,
    pub min_sample_distance: f32,
    pub step_reductions: u32,
    pub raycast_height: f32,
    pub max_samples: usize,
    pub min_samples_before_loop_check: usize,

    pub edge_search_distance: f32,
    pub default_half_width: f32,

    pub curvature_threshold: f32,
    pub center_on_curves: bool,
}

impl TrackConfig {
    pub fn new(track_surface: SurfaceId, seed: Seed) -> Self {
        Self {
            track_surface: Some(track_surface),
            seed: Some(seed),
            ..Default::default()
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            track_surface: None,
            seed: None,
            track_layers: LayerMask::default(),
            closed: true,
            auto_detect_layer: true,
            verbose: true,
            sample_distance: 5.0,
            min_sample_distance: 0.5,
            step_reductions: 4,
            raycast_height: 10.0,
            max_samples: 1000,
            min_samples_before_loop_check: 5,
            edge_search_distance: 50.0,
            default_half_width: 2.5,
            curvature_threshold: 0.2,
            center_on_curves: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    pub checkpoint_count: usize,
    pub height: f32,
    pub scale: na::Vector3<f32>,
    /// Sideways shift along `direction x up`: positive values move the gate
    /// to the right of the direction of travel, in either gate orientation.
    pub track_offset: f32,

    /// Gate orientation across the track instead of along it.
    pub perpendicular: bool,
    /// Euler degrees applied after the base orientation.
    pub extra_rotation: na::Vector3<f32>,

    pub avoid_overlap: bool,
    pub min_spacing: f32,
    /// Candidates past this fraction of the samples are also checked against the first checkpoint.
    pub tail_guard_fraction: f32,

    pub prioritize_curves: bool,
    pub checkpoint_per_curve: bool,
    pub curve_scale: f32,
}

impl PlacementConfig {
    #[inline]
    pub fn curve_priority(&self) -> bool {
        self.prioritize_curves && self.checkpoint_per_curve
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            checkpoint_count: 10,
            height: 1.5,
            scale: na::Vector3::new(5.0, 3.0, 0.5),
            track_offset: 0.0,
            perpendicular: true,
            extra_rotation: na::Vector3::zeros(),
            avoid_overlap: true,
            min_spacing: 5.0,
            tail_guard_fraction: 0.75,
            prioritize_curves: true,
            checkpoint_per_curve: false,
            curve_scale: 1.2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AuthoringConfig {
    pub track: TrackConfig,
    pub placement: PlacementConfig,
}

impl AuthoringConfig {
    pub fn from_json_str(src: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let src = std::fs::read_to_string(path)?;

        Self::from_json_str(&src)
    }

    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
