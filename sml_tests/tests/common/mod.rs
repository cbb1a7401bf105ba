//! Tolerance helpers shared by the integration tests.

#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use sml_math::{Quaternion, Vector3};

pub fn assert_vec3_near(got: Vector3<f64>, want: Vector3<f64>, eps: f64) {
    for (g, w) in got.as_array().into_iter().zip(want.as_array()) {
        assert_abs_diff_eq!(g, w, epsilon = eps);
    }
}

pub fn assert_vec3_near_f32(got: Vector3<f32>, want: Vector3<f32>, eps: f32) {
    for (g, w) in got.as_array().into_iter().zip(want.as_array()) {
        assert_abs_diff_eq!(g, w, epsilon = eps);
    }
}

pub fn assert_quat_near(got: Quaternion<f64>, want: Quaternion<f64>, eps: f64) {
    for (g, w) in got.as_array().into_iter().zip(want.as_array()) {
        assert_abs_diff_eq!(g, w, epsilon = eps);
    }
}

/// Same rotation, allowing `q` and `-q`.
pub fn same_rotation(a: Quaternion<f64>, b: Quaternion<f64>, eps: f64) -> bool {
    (a.dot(b).abs() - 1.0).abs() <= eps
}

/// Angle difference on the circle, in degrees.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
