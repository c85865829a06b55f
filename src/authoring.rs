use log::{debug, error, info, warn};

use crate::checkpoint::CheckpointLayout;
use crate::classifier;
use crate::config::AuthoringConfig;
use crate::error::Error;
use crate::placer::CheckpointPlacer;
use crate::query::{GeometryQuery, LayerMask, RayHit, SurfaceProbe};
use crate::sample::TrackSample;
use crate::spawner::MarkerSpawner;
use crate::tracer::{TraceOutcome, TrackTracer};

/// Editor-side pipeline: trace the track, classify it, place checkpoints and
/// hand them to the marker spawner.
#[derive(Debug, Default)]
pub struct TrackAuthoring {
    config: AuthoringConfig,
    samples: Vec<TrackSample>,
    outcome: Option<TraceOutcome>,
    layout: Option<CheckpointLayout>,
}

impl TrackAuthoring {
    pub fn new(config: AuthoringConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
            outcome: None,
            layout: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &AuthoringConfig {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut AuthoringConfig {
        &mut self.config
    }

    /// Samples of the last analysis run.
    #[inline]
    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    #[inline]
    pub fn outcome(&self) -> Option<TraceOutcome> {
        self.outcome
    }

    /// Layout of the last successful `generate`.
    #[inline]
    pub fn layout(&self) -> Option<&CheckpointLayout> {
        self.layout.as_ref()
    }

    /// Traces and classifies the track below the configured seed.
    pub fn analyze<Q: GeometryQuery + ?Sized>(&mut self, query: &Q) -> Result<&[TrackSample], Error> {
        self.samples.clear();
        self.outcome = None;

        let track = &mut self.config.track;

        let surface = track.track_surface.ok_or_else(|| {
            error!("Track surface is not assigned");
            Error::MissingTrackSurface
        })?;

        let seed = track.seed.ok_or_else(|| {
            error!("Seed position is not set");
            Error::MissingSeed
        })?;

        let unfiltered = SurfaceProbe::new(query, LayerMask::ALL, track.raycast_height)
            .drop_to_surface(&seed.position);

        if track.auto_detect_layer {
            if let Some(hit) = unfiltered {
                let mask = LayerMask::single(hit.layer);
                if mask != track.track_layers || hit.surface != surface {
                    info!(
                        "Auto-detected track layer {} on surface {:?}",
                        hit.layer.0, hit.surface
                    );
                }

                track.track_layers = mask;
                track.track_surface = Some(hit.surface);
            }
        }

        if track.verbose {
            info!(
                "Analyzing track from {} heading {} with layers {}",
                seed.position, seed.direction, track.track_layers
            );

            if let Some(hit) = unfiltered {
                if !track.track_layers.contains(hit.layer) {
                    warn!(
                        "Surface {:?} below the seed is on layer {}, outside the track layers {}",
                        hit.surface, hit.layer.0, track.track_layers
                    );
                }
            }
        }

        let track = &self.config.track;
        let probe = SurfaceProbe::new(query, track.track_layers, track.raycast_height);
        let tracer = TrackTracer::new(probe, track);

        let start = match tracer.seed(&seed.position, &seed.direction) {
            Some(start) => start,
            None => {
                report_missing_track(unfiltered.as_ref(), track.track_layers);
                return Err(Error::TrackNotFound(seed.position));
            }
        };

        let report = tracer.follow(start);
        let mut samples = report.samples;

        let probe = SurfaceProbe::new(query, track.track_layers, track.raycast_height);
        let curves = classifier::classify(&mut samples, &probe, track);

        info!(
            "Track analysis complete: {} samples, {} curves ({:?})",
            samples.len(),
            curves,
            report.outcome
        );

        self.samples = samples;
        self.outcome = Some(report.outcome);

        Ok(&self.samples)
    }

    /// Runs the analysis and spawns a marker per placed checkpoint,
    /// replacing whatever the spawner held before.
    pub fn generate<Q, S>(&mut self, query: &Q, mut spawner: S) -> Result<CheckpointLayout, Error>
    where
        Q: GeometryQuery + ?Sized,
        S: MarkerSpawner,
    {
        self.clear_markers(&mut spawner);
        self.analyze(query)?;
        self.place_and_spawn(spawner)
    }

    /// Places and spawns checkpoints from the samples of the last `analyze`
    /// run without tracing the track again.
    pub fn generate_from_samples<S: MarkerSpawner>(
        &mut self,
        mut spawner: S,
    ) -> Result<CheckpointLayout, Error> {
        self.clear_markers(&mut spawner);
        self.place_and_spawn(spawner)
    }

    fn clear_markers<S: MarkerSpawner>(&mut self, spawner: &mut S) {
        let removed = spawner.clear();
        if removed > 0 {
            debug!("Removed {} previous checkpoint markers", removed);
        }
        self.layout = None;
    }

    fn place_and_spawn<S: MarkerSpawner>(&mut self, mut spawner: S) -> Result<CheckpointLayout, Error> {
        let count = self.samples.len();
        if count < 2 {
            error!("Not enough track samples to place checkpoints ({})", count);
            return Err(Error::TooFewSamples(count));
        }

        let checkpoints = CheckpointPlacer::new(&self.config.placement).place(&self.samples);
        if checkpoints.is_empty() {
            error!("No checkpoints could be placed");
            return Err(Error::NoCheckpoints);
        }

        for checkpoint in &checkpoints {
            spawner.spawn(&checkpoint.name(), checkpoint);
        }

        info!(
            "Generated {} checkpoints ({} on curves)",
            checkpoints.len(),
            checkpoints.iter().filter(|c| c.on_curve).count()
        );

        let layout = CheckpointLayout::new(self.config.track.closed, checkpoints);
        self.layout = Some(layout.clone());

        Ok(layout)
    }
}

fn report_missing_track(unfiltered: Option<&RayHit>, layers: LayerMask) {
    match unfiltered {
        Some(hit) => error!(
            "Could not find track under seed with layers {}, surface {:?} below is on layer {}, try track layers {}",
            layers,
            hit.surface,
            hit.layer.0,
            LayerMask::single(hit.layer)
        ),
        None => error!("Could not find any surface under the seed position"),
    }
}
