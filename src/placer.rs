use log::{debug, info};
use nalgebra as na;

use crate::checkpoint::Checkpoint;
use crate::config::PlacementConfig;
use crate::math;
use crate::sample::TrackSample;

const WIDTH_FILL: f32 = 0.8;

/// Turns a classified track sample sequence into an ordered checkpoint list.
pub struct CheckpointPlacer<'a> {
    config: &'a PlacementConfig,
}

struct Candidate {
    source_index: usize,
    lifted: na::Point3<f32>,
    on_curve: bool,
}

impl<'a> CheckpointPlacer<'a> {
    pub fn new(config: &'a PlacementConfig) -> Self {
        Self { config }
    }

    /// Places checkpoints with the configured strategy. The result is
    /// ordered along the track and indexed from 0.
    pub fn place(&self, samples: &[TrackSample]) -> Vec<Checkpoint> {
        if samples.is_empty() || self.config.checkpoint_count == 0 {
            return Vec::new();
        }

        let mut accepted = if self.config.curve_priority() {
            self.select_curve_priority(samples)
        } else {
            self.select_uniform(samples)
        };

        accepted.sort_by_key(|c| c.source_index);

        accepted
            .into_iter()
            .enumerate()
            .map(|(index, c)| self.build(index, &samples[c.source_index], c))
            .collect()
    }

    #[inline]
    fn lift(&self, sample: &TrackSample) -> na::Point3<f32> {
        sample.position + math::up() * self.config.height
    }

    fn too_close(&self, pos: &na::Point3<f32>, accepted: &[Candidate]) -> bool {
        self.config.avoid_overlap
            && accepted
                .iter()
                .any(|c| na::distance(pos, &c.lifted) < self.config.min_spacing)
    }

    fn try_accept(
        &self,
        source_index: usize,
        sample: &TrackSample,
        on_curve: bool,
        accepted: &mut Vec<Candidate>,
    ) -> bool {
        let lifted = self.lift(sample);

        if self.too_close(&lifted, accepted) {
            debug!("checkpoint candidate at sample {} rejected: overlap", source_index);
            return false;
        }

        accepted.push(Candidate {
            source_index,
            lifted,
            on_curve,
        });

        true
    }

    fn select_uniform(&self, samples: &[TrackSample]) -> Vec<Candidate> {
        let total = samples.len();
        let wanted = self.config.checkpoint_count;
        let stride = (total / wanted).max(1);
        let tail_start = total as f32 * self.config.tail_guard_fraction;

        let mut accepted: Vec<Candidate> = Vec::with_capacity(wanted.min(total));

        for i in (0..total).step_by(stride) {
            if accepted.len() >= wanted {
                break;
            }

            let sample = &samples[i];

            if self.config.avoid_overlap && i as f32 > tail_start {
                if let Some(first) = accepted.first() {
                    let to_first = na::distance(&self.lift(sample), &first.lifted);
                    if to_first < self.config.min_spacing {
                        debug!(
                            "skipping checkpoint at sample {} near the start (distance {:.2})",
                            i, to_first
                        );
                        continue;
                    }
                }
            }

            self.try_accept(i, sample, sample.is_curve, &mut accepted);
        }

        info!("Created {} checkpoints", accepted.len());

        accepted
    }

    fn select_curve_priority(&self, samples: &[TrackSample]) -> Vec<Candidate> {
        let total = samples.len();
        let wanted = self.config.checkpoint_count;

        let curve_indices: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_curve)
            .map(|(i, _)| i)
            .collect();

        info!("Detected {} curve samples on the track", curve_indices.len());

        let from_curves = curve_indices.len().min(wanted);
        let remaining = wanted - from_curves;

        let mut selected = Vec::with_capacity(from_curves);
        if from_curves > 0 {
            let step = curve_indices.len() as f32 / from_curves as f32;
            for i in 0..from_curves {
                let k = ((i as f32 * step).floor() as usize).min(curve_indices.len() - 1);
                selected.push(curve_indices[k]);
            }
        }

        let mut accepted: Vec<Candidate> = Vec::with_capacity(wanted.min(total));

        for &idx in &selected {
            self.try_accept(idx, &samples[idx], true, &mut accepted);
        }

        if remaining > 0 {
            let stride = (total / remaining).max(1);
            let half = stride / 2;

            for i in (half..total).step_by(stride) {
                if accepted.len() >= wanted {
                    break;
                }

                let near_curve = selected
                    .iter()
                    .any(|&c| (i as isize - c as isize).unsigned_abs() < half);

                if !near_curve {
                    self.try_accept(i, &samples[i], false, &mut accepted);
                }
            }
        }

        info!(
            "Created {} checkpoints (including {} on curves)",
            accepted.len(),
            selected.len()
        );

        accepted
    }

    fn build(&self, index: usize, sample: &TrackSample, candidate: Candidate) -> Checkpoint {
        let mut position = candidate.lifted;
        let mut rotation = na::UnitQuaternion::identity();

        if sample.has_direction() {
            let lateral = math::lateral(&sample.direction);
            let forward = if self.config.perpendicular {
                lateral
            } else {
                sample.direction
            };

            if self.config.track_offset != 0.0 {
                position += lateral * self.config.track_offset;
            }

            rotation = math::look_rotation(&forward);
            if self.config.extra_rotation != na::Vector3::zeros() {
                rotation *= math::euler_degrees(&self.config.extra_rotation);
            }
        }

        let mut scale = self.config.scale;
        if candidate.on_curve && self.config.curve_scale != 1.0 {
            scale *= self.config.curve_scale;
        } else {
            scale.y = scale.y.min(sample.width * WIDTH_FILL);
        }

        Checkpoint {
            index,
            source_index: candidate.source_index,
            position,
            rotation,
            scale,
            on_curve: candidate.on_curve,
        }
    }
}
