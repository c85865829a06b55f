use log::debug;
use nalgebra as na;
use parry3d::{
    math::Point,
    query::{Ray as ParryRay, RayCast},
    shape::TriMesh,
};

use crate::error::Error;
use crate::query::{GeometryQuery, Layer, LayerMask, Ray, RayHit, SurfaceId};

/// A named triangle mesh registered in a [`MeshScene`].
pub struct MeshCollider {
    pub id: SurfaceId,
    pub name: String,
    pub layer: Layer,
    shape: TriMesh,
}

impl MeshCollider {
    #[inline]
    pub fn shape(&self) -> &TriMesh {
        &self.shape
    }
}

/// Static collision scene made of triangle meshes in world coordinates.
#[derive(Default)]
pub struct MeshScene {
    colliders: Vec<MeshCollider>,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mesh and returns its surface id.
    pub fn add_mesh(
        &mut self,
        name: &str,
        layer: Layer,
        vertices: Vec<na::Point3<f32>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<SurfaceId, Error> {
        let invalid = |reason: String| Error::InvalidMesh {
            name: name.to_string(),
            reason,
        };

        if indices.is_empty() {
            return Err(invalid("mesh has no triangles".into()));
        }

        let vertex_count = vertices.len();
        if let Some(tri) = indices
            .iter()
            .find(|tri| tri.iter().any(|&i| i as usize >= vertex_count))
        {
            return Err(invalid(format!(
                "triangle {:?} indexes past {} vertices",
                tri, vertex_count
            )));
        }

        let points: Vec<Point<f32>> = vertices;
        let shape = TriMesh::new(points, indices).map_err(|err| invalid(format!("{:?}", err)))?;

        let id = SurfaceId(self.colliders.len() as u32);
        debug!("registered mesh `{}` as {:?} on layer {}", name, id, layer.0);

        self.colliders.push(MeshCollider {
            id,
            name: name.to_string(),
            layer,
            shape,
        });

        Ok(id)
    }

    /// Adds a flat, axis aligned rectangle on `y = height`.
    pub fn add_quad(
        &mut self,
        name: &str,
        layer: Layer,
        min: na::Point2<f32>,
        max: na::Point2<f32>,
        height: f32,
    ) -> Result<SurfaceId, Error> {
        let vertices = vec![
            na::Point3::new(min.x, height, min.y),
            na::Point3::new(max.x, height, min.y),
            na::Point3::new(max.x, height, max.y),
            na::Point3::new(min.x, height, max.y),
        ];

        self.add_mesh(name, layer, vertices, vec![[0, 2, 1], [0, 3, 2]])
    }

    #[inline]
    pub fn collider(&self, id: SurfaceId) -> Option<&MeshCollider> {
        self.colliders.get(id.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<&MeshCollider> {
        self.colliders.iter().find(|c| c.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl GeometryQuery for MeshScene {
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit> {
        let parry_ray = ParryRay::new(ray.origin, ray.direction);

        self.colliders
            .iter()
            .filter(|c| layers.contains(c.layer))
            .filter_map(|c| {
                c.shape
                    .cast_local_ray(&parry_ray, max_distance, true)
                    .map(|toi| (c, toi))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(c, toi)| RayHit {
                point: ray.point_at(toi),
                distance: toi,
                surface: c.id,
                layer: c.layer,
            })
    }
}
