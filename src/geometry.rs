//! Rotation math for face turns.
//!
//! Points are rotated about an arbitrary unit axis through a pivot using the
//! Rodrigues rotation matrix `R = I + sin(θ)·K + (1 - cos(θ))·K²`, where `K`
//! is the cross-product matrix of the axis. Angles are in degrees.
//!
//! Multiples of 90° use exact sine/cosine values, so a completed quarter turn
//! maps grid positions onto grid positions without rounding.

use nalgebra::{Matrix3, Point3, Unit, UnitQuaternion, Vector3};

/// A position in assembly space (millimetres).
pub type Point = Point3<f64>;

/// A rotation axis. Must be unit length; the type only guarantees that when
/// it was built through [`Unit::new_normalize`] or one of the axis helpers.
pub type Axis = Unit<Vector3<f64>>;

/// Net rotation of a body relative to how it was created.
pub type Orientation = UnitQuaternion<f64>;

/// Sine and cosine of an angle given in degrees.
///
/// Exact for whole multiples of 90°.
pub fn sin_cos_deg(degrees: f64) -> (f64, f64) {
    let quarters = degrees / 90.0;
    if quarters.fract() == 0.0 && quarters.abs() < i64::MAX as f64 {
        match (quarters as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        degrees.to_radians().sin_cos()
    }
}

/// Rodrigues rotation matrix for `degrees` about `axis`.
pub fn rotation_matrix(axis: &Axis, degrees: f64) -> Matrix3<f64> {
    let (s, c) = sin_cos_deg(degrees);
    let k = axis.cross_matrix();
    Matrix3::identity() + k * s + k * k * (1.0 - c)
}

/// Rotate `point` by `degrees` about the line through `pivot` along `axis`.
pub fn rotate_point(point: &Point, pivot: &Point, axis: &Axis, degrees: f64) -> Point {
    pivot + rotation_matrix(axis, degrees) * (point - pivot)
}

/// Rotation by `degrees` about `axis` as a quaternion.
pub fn rotation_quaternion(axis: &Axis, degrees: f64) -> Orientation {
    UnitQuaternion::from_axis_angle(axis, degrees.to_radians())
}

/// Apply a turn of `degrees` about `axis` on top of `orientation`.
pub fn rotate_orientation(orientation: &Orientation, axis: &Axis, degrees: f64) -> Orientation {
    let mut q = rotation_quaternion(axis, degrees) * orientation;
    q.renormalize();
    q
}

/// Positive unit axis for an axis index (0 = X, 1 = Y, 2 = Z).
pub fn axis_unit(index: usize) -> Axis {
    match index {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        _ => Vector3::z_axis(),
    }
}

/// Grid cell of a position, each coordinate rounded to the nearest slice.
pub fn grid_coords(position: &Point, spacing: f64) -> [i32; 3] {
    [
        (position.x / spacing).round() as i32,
        (position.y / spacing).round() as i32,
        (position.z / spacing).round() as i32,
    ]
}

/// Distance from `value` to the closest of the three slice values
/// `{-spacing, 0, +spacing}`.
pub fn slice_deviation(value: f64, spacing: f64) -> f64 {
    [-spacing, 0.0, spacing]
        .iter()
        .map(|s| (value - s).abs())
        .fold(f64::INFINITY, f64::min)
}
