use log::debug;

use crate::config::TrackConfig;
use crate::math;
use crate::query::{GeometryQuery, SurfaceProbe};
use crate::sample::TrackSample;

/// Tags interior samples with their curvature and re-centers curve samples
/// onto the surface. Sequences shorter than three samples are left as is.
///
/// Returns the number of samples marked as curves.
pub fn classify<Q: GeometryQuery + ?Sized>(
    samples: &mut [TrackSample],
    probe: &SurfaceProbe<'_, Q>,
    config: &TrackConfig,
) -> usize {
    if samples.len() < 3 {
        return 0;
    }

    let mut curves = 0;

    for i in 1..samples.len() - 1 {
        let angle = math::angle_degrees(&samples[i - 1].direction, &samples[i + 1].direction);
        let curvature = (angle / 180.0).clamp(0.0, 1.0);
        let is_curve = curvature > config.curvature_threshold;

        let sample = &mut samples[i];
        sample.curvature = curvature;
        sample.is_curve = is_curve;

        if !is_curve {
            continue;
        }

        curves += 1;

        if config.center_on_curves {
            let half = math::lateral(&sample.direction) * (sample.width / 2.0);
            let left = sample.position - half;
            let right = sample.position + half;
            let center = nalgebra::center(&left, &right);

            if let Some(hit) = probe.drop_to_surface(&center) {
                sample.position = hit.point;
            } else {
                debug!("curve sample {} could not be re-centered", i);
            }
        }
    }

    curves
}
