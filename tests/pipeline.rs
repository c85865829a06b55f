use std::f32::consts::TAU;

use nalgebra as na;
use raceline::{
    AuthoringConfig, CheckpointLayout, CheckpointSequencer, Error, GeometryQuery, Layer,
    LayerMask, MarkerContainer, MarkerSpawner, MeshScene, Ray, RayHit, Seed, SurfaceId,
    TraceOutcome, TrackAuthoring, TrackConfig,
};

const WALL_HEIGHT: f32 = 3.0;

/// Flat annulus on `y = 0` between two cylindrical walls.
struct Ring {
    inner: f32,
    outer: f32,
}

impl Ring {
    fn wall_hit(&self, ray: &Ray, radius: f32, max_distance: f32) -> Option<f32> {
        let (ox, oz) = (ray.origin.x, ray.origin.z);
        let (dx, dz) = (ray.direction.x, ray.direction.z);

        let a = dx * dx + dz * dz;
        let b = 2.0 * (ox * dx + oz * dz);
        let c = ox * ox + oz * oz - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if a < 1.0e-9 || disc < 0.0 {
            return None;
        }

        let s = disc.sqrt();
        [(-b - s) / (2.0 * a), (-b + s) / (2.0 * a)]
            .into_iter()
            .filter(|t| *t > 1.0e-4 && *t <= max_distance)
            .filter(|t| (0.0..=WALL_HEIGHT).contains(&ray.point_at(*t).y))
            .reduce(f32::min)
    }
}

impl GeometryQuery for Ring {
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit> {
        if !layers.contains(Layer(0)) {
            return None;
        }

        if ray.direction.y < -0.99 {
            let t = ray.origin.y / -ray.direction.y;
            let p = ray.point_at(t);
            let r = (p.x * p.x + p.z * p.z).sqrt();

            return (t >= 0.0 && t <= max_distance && r >= self.inner && r <= self.outer).then(
                || RayHit {
                    point: na::Point3::new(p.x, 0.0, p.z),
                    distance: t,
                    surface: SurfaceId(0),
                    layer: Layer(0),
                },
            );
        }

        if ray.direction.y.abs() < 1.0e-3 {
            let t = [self.inner, self.outer]
                .into_iter()
                .filter_map(|r| self.wall_hit(ray, r, max_distance))
                .reduce(f32::min)?;

            return Some(RayHit {
                point: ray.point_at(t),
                distance: t,
                surface: SurfaceId(1),
                layer: Layer(0),
            });
        }

        None
    }
}

fn circle(radius: f32, y: f32, segments: usize) -> Vec<na::Point3<f32>> {
    (0..segments)
        .map(|k| {
            let a = k as f32 / segments as f32 * TAU;
            na::Point3::new(radius * a.cos(), y, radius * a.sin())
        })
        .collect()
}

/// Quad strip between two vertex loops of equal length.
fn strip(a: Vec<na::Point3<f32>>, b: Vec<na::Point3<f32>>) -> (Vec<na::Point3<f32>>, Vec<[u32; 3]>) {
    let n = a.len() as u32;
    let indices = (0..n)
        .flat_map(|k| {
            let next = (k + 1) % n;
            [[k, n + k, n + next], [k, n + next, next]]
        })
        .collect();

    let mut vertices = a;
    vertices.extend(b);

    (vertices, indices)
}

/// The same annulus as [`Ring`] built from triangle meshes.
fn mesh_ring(inner: f32, outer: f32, layer: Layer) -> (MeshScene, SurfaceId) {
    const SEGMENTS: usize = 72;
    let mut scene = MeshScene::new();

    let (vertices, indices) = strip(circle(inner, 0.0, SEGMENTS), circle(outer, 0.0, SEGMENTS));
    let floor = scene.add_mesh("track", layer, vertices, indices).unwrap();

    for (name, radius) in [("inner_wall", inner), ("outer_wall", outer)] {
        let (vertices, indices) = strip(
            circle(radius, 0.0, SEGMENTS),
            circle(radius, WALL_HEIGHT, SEGMENTS),
        );
        scene.add_mesh(name, layer, vertices, indices).unwrap();
    }

    (scene, floor)
}

fn ring_config(center: f32) -> AuthoringConfig {
    AuthoringConfig {
        track: TrackConfig::new(
            SurfaceId(0),
            Seed::new(na::Point3::new(center, 1.0, 0.0), na::Vector3::z()),
        ),
        ..Default::default()
    }
}

#[test]
fn ring_track_closes_and_gets_uniform_checkpoints() {
    let ring = Ring {
        inner: 49.0,
        outer: 51.0,
    };
    let mut authoring = TrackAuthoring::new(ring_config(50.0));
    let mut markers = MarkerContainer::new();

    let layout = authoring.generate(&ring, &mut markers).unwrap();

    assert_eq!(authoring.outcome(), Some(TraceOutcome::ClosedLoop));

    let samples = authoring.samples();
    assert!(samples.len() > 5);
    let first = samples[0].position;
    let last = samples[samples.len() - 1].position;
    assert!(na::distance(&first, &last) < 4.5);

    for s in samples {
        assert!(s.width > 1.5 && s.width < 4.0, "width {}", s.width);
        assert!((0.0..=1.0).contains(&s.curvature));
        assert!(!s.is_curve);
    }

    assert_eq!(layout.len(), 10);
    assert!(layout.closed);
    assert_eq!(markers.len(), 10);

    for pair in layout.checkpoints.windows(2) {
        assert!(pair[0].source_index < pair[1].source_index);
        assert!(na::distance(&pair[0].position, &pair[1].position) >= 5.0);
    }

    for (i, cp) in layout.iter().enumerate() {
        assert_eq!(cp.index, i);
        assert!((cp.position.y - 1.5).abs() < 1.0e-4);
        assert!(cp.scale.y > 1.5 && cp.scale.y < 1.7, "scale {}", cp.scale.y);
        assert!(cp.forward().y.abs() < 1.0e-4);
        assert!(!cp.on_curve);
    }
}

#[test]
fn regenerating_yields_the_same_layout() {
    let ring = Ring {
        inner: 49.0,
        outer: 51.0,
    };
    let mut authoring = TrackAuthoring::new(ring_config(50.0));
    let mut markers = MarkerContainer::new();

    let first = authoring.generate(&ring, &mut markers).unwrap();
    let second = authoring.generate(&ring, &mut markers).unwrap();

    assert_eq!(first.len(), second.len());
    assert!(first
        .iter()
        .zip(second.iter())
        .all(|(a, b)| a.approx_eq(b, 1.0e-5)));
    assert_eq!(markers.len(), second.len());
}

#[test]
fn tight_ring_places_checkpoints_on_curves() {
    let ring = Ring {
        inner: 7.0,
        outer: 9.0,
    };
    let mut config = ring_config(8.0);
    config.placement.checkpoint_count = 4;
    config.placement.checkpoint_per_curve = true;

    let mut authoring = TrackAuthoring::new(config);
    let layout = authoring.generate(&ring, MarkerContainer::new()).unwrap();

    assert_eq!(authoring.outcome(), Some(TraceOutcome::ClosedLoop));
    let curves = authoring.samples().iter().filter(|s| s.is_curve).count();
    assert_eq!(curves, authoring.samples().len() - 2);

    let sources: Vec<usize> = layout.iter().map(|c| c.source_index).collect();
    assert_eq!(sources, vec![1, 3, 5, 7]);

    for cp in layout.iter() {
        assert!(cp.on_curve);
        assert!((cp.scale - na::Vector3::new(6.0, 3.6, 0.6)).norm() < 1.0e-4);
    }
}

#[test]
fn mesh_ring_auto_detects_track_layer() {
    let (scene, floor) = mesh_ring(49.0, 51.0, Layer(8));
    let mut config = ring_config(50.0);
    config.track.track_surface = Some(SurfaceId(99));

    let mut authoring = TrackAuthoring::new(config);
    let layout = authoring.generate(&scene, MarkerContainer::new()).unwrap();

    assert_eq!(authoring.outcome(), Some(TraceOutcome::ClosedLoop));
    assert_eq!(authoring.config().track.track_layers, LayerMask::single(Layer(8)));
    assert_eq!(authoring.config().track.track_surface, Some(floor));

    for s in authoring.samples() {
        assert!(s.width > 1.5 && s.width < 4.0, "width {}", s.width);
    }
    assert_eq!(layout.len(), 10);
}

#[test]
fn mesh_ring_on_unlisted_layer_is_not_found() {
    let (scene, _) = mesh_ring(49.0, 51.0, Layer(8));
    let mut config = ring_config(50.0);
    config.track.auto_detect_layer = false;

    let mut authoring = TrackAuthoring::new(config);
    let mut markers = MarkerContainer::new();

    let result = authoring.generate(&scene, &mut markers);
    assert!(matches!(result, Err(Error::TrackNotFound(_))));
    assert_eq!(markers.clear(), 0);
}

#[test]
fn sequencer_follows_serialized_layout() {
    let ring = Ring {
        inner: 49.0,
        outer: 51.0,
    };
    let mut authoring = TrackAuthoring::new(ring_config(50.0));
    let authored = authoring.generate(&ring, MarkerContainer::new()).unwrap();

    let layout = CheckpointLayout::from_json(&authored.to_json().unwrap()).unwrap();
    assert_eq!(layout.len(), authored.len());
    assert!(layout
        .iter()
        .zip(authored.iter())
        .all(|(a, b)| a.approx_eq(b, 1.0e-5)));

    let mut sequencer = CheckpointSequencer::from_layout(layout, ["blue", "red"]);

    for _ in 0..2 {
        for i in 0..sequencer.len() {
            assert!(sequencer.pass_through(i, &"blue").is_correct());
        }
    }
    assert_eq!(sequencer.progress(&"blue").unwrap().laps, 2);

    assert!(sequencer.pass_through(0, &"red").is_correct());
    assert!(!sequencer.pass_through(2, &"red").is_correct());
    assert_eq!(sequencer.next_checkpoint(&"red").unwrap().index, 1);
}
