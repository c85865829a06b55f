use std::fmt;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::math;

/// Collision layer index, `0..32`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Layer(pub u8);

/// Bit set of collision layers a query is allowed to strike.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    #[inline]
    pub fn single(layer: Layer) -> Self {
        LayerMask(1u32.checked_shl(layer.0 as u32).unwrap_or(0))
    }

    #[inline]
    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & Self::single(layer).0 != 0
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        (0..32u8).map(Layer).filter(move |l| self.contains(*l))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::single(Layer(0))
    }
}

impl fmt::Display for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write!(f, "[")?;
        for layer in self.layers() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", layer.0)?;
            first = false;
        }
        write!(f, "]")
    }
}

/// Identity of a collidable surface known to the query surface.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: na::Point3<f32>,
    /// Unit direction.
    pub direction: na::Vector3<f32>,
}

impl Ray {
    #[inline]
    pub fn new(origin: na::Point3<f32>, direction: na::Vector3<f32>) -> Self {
        Self {
            origin,
            direction: math::normalize_or_zero(direction),
        }
    }

    #[inline]
    pub fn down_from(origin: na::Point3<f32>) -> Self {
        Self {
            origin,
            direction: -math::up(),
        }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> na::Point3<f32> {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: na::Point3<f32>,
    pub distance: f32,
    pub surface: SurfaceId,
    pub layer: Layer,
}

/// Scene-level ray intersection service the track analysis samples through.
///
/// Returns the nearest hit along `ray` within `max_distance` among surfaces
/// whose layer is in `layers`. Implementations never retry; all retry logic
/// lives in the tracer.
pub trait GeometryQuery {
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit>;
}

impl<Q: GeometryQuery + ?Sized> GeometryQuery for &Q {
    #[inline]
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit> {
        (**self).raycast(ray, max_distance, layers)
    }
}

const EDGE_PROBE_LIFT: f32 = 0.1;

/// A query surface bound to the track layer filter and probe height.
pub struct SurfaceProbe<'a, Q: GeometryQuery + ?Sized> {
    pub query: &'a Q,
    pub layers: LayerMask,
    pub raycast_height: f32,
}

impl<'a, Q: GeometryQuery + ?Sized> SurfaceProbe<'a, Q> {
    pub fn new(query: &'a Q, layers: LayerMask, raycast_height: f32) -> Self {
        Self {
            query,
            layers,
            raycast_height,
        }
    }

    /// Casts straight down from `raycast_height` above `point`.
    #[inline]
    pub fn drop_to_surface(&self, point: &na::Point3<f32>) -> Option<RayHit> {
        self.drop_with(point, self.layers)
    }

    #[inline]
    pub fn drop_with(&self, point: &na::Point3<f32>, layers: LayerMask) -> Option<RayHit> {
        let ray = Ray::down_from(point + math::up() * self.raycast_height);

        self.query.raycast(&ray, self.raycast_height * 2.0, layers)
    }

    /// Distance to the track edge along the horizontal `direction`, or
    /// `fallback` when nothing is struck within `max_distance`.
    pub fn edge_distance(
        &self,
        position: &na::Point3<f32>,
        direction: &na::Vector3<f32>,
        max_distance: f32,
        fallback: f32,
    ) -> f32 {
        let ray = Ray::new(position + math::up() * EDGE_PROBE_LIFT, *direction);

        self.query
            .raycast(&ray, max_distance, self.layers)
            .map(|hit| hit.distance)
            .unwrap_or(fallback)
    }
}
