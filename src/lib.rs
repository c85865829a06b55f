pub mod authoring;
pub mod checkpoint;
pub mod classifier;
pub mod config;
pub mod error;
pub mod math;
pub mod mesh_scene;
pub mod placer;
pub mod query;
pub mod sample;
pub mod sequencer;
pub mod spawner;
pub mod tracer;

mod circular_queue;

pub use authoring::TrackAuthoring;
pub use checkpoint::{Checkpoint, CheckpointLayout};
pub use config::{AuthoringConfig, PlacementConfig, Seed, TrackConfig};
pub use error::Error;
pub use mesh_scene::MeshScene;
pub use placer::CheckpointPlacer;
pub use query::{GeometryQuery, Layer, LayerMask, Ray, RayHit, SurfaceId};
pub use sample::TrackSample;
pub use sequencer::{AgentProgress, CheckpointEvent, CheckpointSequencer};
pub use spawner::{MarkerContainer, MarkerSpawner};
pub use tracer::{TraceOutcome, TraceReport, TrackTracer};
