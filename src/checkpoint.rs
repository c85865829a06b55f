use std::path::Path;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// A positioned, oriented and scaled trigger volume. `index` is its place in
/// the pass-through order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub index: usize,
    /// Index of the track sample the checkpoint was derived from.
    #[serde(rename = "sample")]
    pub source_index: usize,
    pub position: na::Point3<f32>,
    pub rotation: na::UnitQuaternion<f32>,
    pub scale: na::Vector3<f32>,
    pub on_curve: bool,
}

impl Checkpoint {
    #[inline(always)]
    pub fn forward(&self) -> na::Vector3<f32> {
        self.rotation * na::Vector3::z()
    }

    #[inline]
    pub fn name(&self) -> String {
        format!("Checkpoint_{}", self.index + 1)
    }

    /// Whether `other` matches within `eps` in position, rotation and scale.
    pub fn approx_eq(&self, other: &Checkpoint, eps: f32) -> bool {
        self.index == other.index
            && self.source_index == other.source_index
            && na::distance(&self.position, &other.position) <= eps
            && self.rotation.angle_to(&other.rotation) <= eps
            && (self.scale - other.scale).norm() <= eps
    }
}

/// The authored checkpoint sequence handed over to the runtime side.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CheckpointLayout {
    pub closed: bool,
    pub checkpoints: Vec<Checkpoint>,
}

impl CheckpointLayout {
    pub fn new(closed: bool, checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            closed,
            checkpoints,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(src: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        std::fs::write(path, self.to_json()?)?;

        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
