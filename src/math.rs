//! Small vector and rotation helpers shared by all recognizers.
//!
//! Positions are `f32` 3-vectors in the tracker's units (usually
//! millimeters), orientations are 3x3 rotation matrices. Angles exposed to
//! callers are in degrees.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Mat3 = Matrix3<f32>;

/// Smallest time step used when converting displacements to velocities.
pub const MIN_TIME_STEP: f64 = 1e-6;

/// Component-wise inclusive box test.
#[inline]
pub fn in_range(value: &Vec3, min: &Vec3, max: &Vec3) -> bool {
    (0..3).all(|i| value[i] >= min[i] && value[i] <= max[i])
}

/// Inclusive scalar range test.
#[inline]
pub fn in_range_scalar(value: f32, min: f32, max: f32) -> bool {
    value >= min && value <= max
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_angle_deg(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Euler angles (x, y, z) in degrees of a rotation matrix.
pub fn euler_degrees(m: &Mat3) -> Vec3 {
    let (roll, pitch, yaw) = Rotation3::from_matrix_unchecked(*m).euler_angles();
    Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// Rotation matrix from Euler angles (x, y, z) in degrees.
pub fn rotation_from_euler_degrees(angles: &Vec3) -> Mat3 {
    Rotation3::from_euler_angles(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
    .into_inner()
}

/// Rotation vector (axis times angle, degrees) of a rotation matrix.
///
/// Goes through a quaternion so half turns keep their axis.
pub fn rotation_vector_deg(m: &Mat3) -> Vec3 {
    let rotation = Rotation3::from_matrix_unchecked(*m);
    UnitQuaternion::from_rotation_matrix(&rotation)
        .scaled_axis()
        .map(f32::to_degrees)
}

/// Angle in degrees of the relative rotation `a⁻¹ · b`.
pub fn rotation_difference_deg(a: &Mat3, b: &Mat3) -> f32 {
    // Rotation matrices are orthonormal, so the transpose is the inverse.
    let delta = a.transpose() * b;
    let cos = ((delta.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Angle in degrees between two vectors, 0 if either has zero length.
pub fn angle_between_deg(a: &Vec3, b: &Vec3) -> f32 {
    let norms = a.norm() * b.norm();
    if norms <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Offset of `point` from its projection onto the line `start -> end`.
///
/// Degenerates to `point - start` when the line has zero length.
pub fn perpendicular_offset(point: &Vec3, start: &Vec3, end: &Vec3) -> Vec3 {
    let line = end - start;
    let to_point = point - start;
    let len_sq = line.norm_squared();
    if len_sq <= f32::EPSILON {
        return to_point;
    }
    to_point - line * (to_point.dot(&line) / len_sq)
}

/// Median of integer samples (upper median for even counts).
pub fn median(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}
