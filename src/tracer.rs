use log::{debug, info, warn};
use nalgebra as na;

use crate::config::TrackConfig;
use crate::math;
use crate::query::{GeometryQuery, SurfaceProbe};
use crate::sample::TrackSample;

/// Yaw offsets tried per step, center first, then widening.
pub const SEARCH_ANGLES: [f32; 13] = [
    0.0, 15.0, -15.0, 30.0, -30.0, 45.0, -45.0, 60.0, -60.0, 75.0, -75.0, 90.0, -90.0,
];

const DIRECTION_BLEND: f32 = 0.7;
const LOOP_CLOSE_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    ClosedLoop,
    LostTrack,
    SampleCap,
}

#[derive(Debug, Clone)]
pub struct TraceReport {
    pub samples: Vec<TrackSample>,
    pub outcome: TraceOutcome,
}

pub struct TrackTracer<'a, Q: GeometryQuery + ?Sized> {
    probe: SurfaceProbe<'a, Q>,
    config: &'a TrackConfig,
}

impl<'a, Q: GeometryQuery + ?Sized> TrackTracer<'a, Q> {
    pub fn new(probe: SurfaceProbe<'a, Q>, config: &'a TrackConfig) -> Self {
        Self { probe, config }
    }

    /// Left + right distance to the track edges across `direction`.
    pub fn measure_width(&self, position: &na::Point3<f32>, direction: &na::Vector3<f32>) -> f32 {
        let right = math::rotate_yaw(direction, 90.0);
        let max = self.config.edge_search_distance;
        let fallback = self.config.default_half_width;

        let left = self.probe.edge_distance(position, &-right, max, fallback);
        let right = self.probe.edge_distance(position, &right, max, fallback);

        left + right
    }

    /// Builds the seed sample on the surface below `position`.
    pub fn seed(
        &self,
        position: &na::Point3<f32>,
        direction: &na::Vector3<f32>,
    ) -> Option<TrackSample> {
        let hit = self.probe.drop_to_surface(position)?;
        let direction = math::normalize_or_zero(*direction);
        let width = self.measure_width(&hit.point, &direction);

        Some(TrackSample::new(hit.point, direction, width))
    }

    /// Searches the next sample ahead of `current`, shrinking the step when
    /// the full angular sweep finds nothing.
    pub fn step(&self, current: &TrackSample) -> Option<TrackSample> {
        let base = self.config.sample_distance;

        for round in 0..self.config.step_reductions.max(1) {
            let distance = if round == 0 {
                base
            } else {
                (base * 0.5f32.powi(round as i32)).max(self.config.min_sample_distance)
            };

            for angle in SEARCH_ANGLES {
                let heading = math::rotate_yaw(&current.direction, angle);
                let target = current.position + heading * distance;

                if let Some(hit) = self.probe.drop_to_surface(&target) {
                    let to_hit = math::normalize_or_zero(hit.point - current.position);
                    let blended =
                        math::normalize_or_zero(math::lerp(&current.direction, &to_hit, DIRECTION_BLEND));
                    let direction = math::flatten(blended);
                    let width = self.measure_width(&hit.point, &direction);

                    debug!(
                        "step {:.3} at {:+.0} deg hit {} (width {:.2})",
                        distance, angle, hit.point, width
                    );

                    return Some(TrackSample::new(hit.point, direction, width));
                }
            }
        }

        None
    }

    /// Walks the track from `start` until the loop closes, the track is lost
    /// or the sample cap is reached. The partial path is always returned.
    pub fn follow(&self, start: TrackSample) -> TraceReport {
        let cap = self.config.max_samples.max(1);
        let close_distance = self.config.sample_distance * LOOP_CLOSE_FACTOR;
        let origin = start.position;

        let mut samples = Vec::with_capacity(cap.min(1024));
        samples.push(start);

        while samples.len() < cap {
            let next = match samples.last().and_then(|current| self.step(current)) {
                Some(next) => next,
                None => {
                    warn!("Lost track after {} samples, analysis stopped", samples.len());

                    return TraceReport {
                        samples,
                        outcome: TraceOutcome::LostTrack,
                    };
                }
            };

            let to_start = na::distance(&next.position, &origin);
            samples.push(next);

            if self.config.closed
                && samples.len() > self.config.min_samples_before_loop_check
                && to_start < close_distance
            {
                info!("Closed loop detected after {} samples", samples.len());

                return TraceReport {
                    samples,
                    outcome: TraceOutcome::ClosedLoop,
                };
            }
        }

        warn!(
            "Reached maximum sample count ({}), track may be too large or not closed",
            cap
        );

        TraceReport {
            samples,
            outcome: TraceOutcome::SampleCap,
        }
    }
}
