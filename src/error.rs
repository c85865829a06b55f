use nalgebra as na;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("track surface is not assigned")]
    MissingTrackSurface,

    #[error("seed position is not set")]
    MissingSeed,

    #[error("could not find track under seed position {0}")]
    TrackNotFound(na::Point3<f32>),

    #[error("track analysis produced {0} samples, at least 2 are required")]
    TooFewSamples(usize),

    #[error("no checkpoints could be placed")]
    NoCheckpoints,

    #[error("invalid track mesh `{name}`: {reason}")]
    InvalidMesh { name: String, reason: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
