use nalgebra as na;

#[inline]
pub fn up() -> na::Vector3<f32> {
    na::Vector3::y()
}

/// Rotates `v` about the up axis by `degrees`.
#[inline]
pub fn rotate_yaw(v: &na::Vector3<f32>, degrees: f32) -> na::Vector3<f32> {
    na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), degrees.to_radians()) * v
}

/// Unit vector along `v`, or zero when `v` is too short to normalize.
#[inline]
pub fn normalize_or_zero(v: na::Vector3<f32>) -> na::Vector3<f32> {
    v.try_normalize(1.0e-5).unwrap_or_else(na::Vector3::zeros)
}

/// Drops the vertical component and renormalizes.
#[inline]
pub fn flatten(v: na::Vector3<f32>) -> na::Vector3<f32> {
    normalize_or_zero(na::Vector3::new(v.x, 0.0, v.z))
}

#[inline]
pub fn lerp(a: &na::Vector3<f32>, b: &na::Vector3<f32>, t: f32) -> na::Vector3<f32> {
    a * (1.0 - t) + b * t
}

/// Unsigned angle between two vectors in degrees, 0 when either is degenerate.
pub fn angle_degrees(a: &na::Vector3<f32>, b: &na::Vector3<f32>) -> f32 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom < 1.0e-15 {
        return 0.0;
    }

    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);

    cos.acos().to_degrees()
}

/// Horizontal unit vector perpendicular to `direction` (`direction × up`).
#[inline]
pub fn lateral(direction: &na::Vector3<f32>) -> na::Vector3<f32> {
    normalize_or_zero(direction.cross(&up()))
}

/// Rotation that maps local `+Z` onto `forward` while keeping `+Y` up.
pub fn look_rotation(forward: &na::Vector3<f32>) -> na::UnitQuaternion<f32> {
    if forward.cross(&up()).norm_squared() < 1.0e-10 {
        return na::UnitQuaternion::rotation_between(&na::Vector3::z(), forward)
            .unwrap_or_else(na::UnitQuaternion::identity);
    }

    na::UnitQuaternion::face_towards(forward, &up())
}

/// Euler angles in degrees, applied around Z first, then X, then Y.
pub fn euler_degrees(angles: &na::Vector3<f32>) -> na::UnitQuaternion<f32> {
    let x = na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), angles.x.to_radians());
    let y = na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), angles.y.to_radians());
    let z = na::UnitQuaternion::from_axis_angle(&na::Vector3::z_axis(), angles.z.to_radians());

    y * x * z
}
