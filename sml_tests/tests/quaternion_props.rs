//! Property-based tests for Quaternion.
//!
//! Run with: cargo test -p sml_tests --test quaternion_props

mod common;

use common::{angle_diff, assert_quat_near, assert_vec3_near, same_rotation};
use proptest::prelude::*;
use sml_math::{DQuat, DVec3, Quaternion, Vector3};

fn arb_dvec3() -> impl Strategy<Value = DVec3> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(Vector3::from_array)
}

/// Random unit quaternion, away from the zero quaternion before normalizing.
fn arb_unit_quat() -> impl Strategy<Value = DQuat> {
    prop::array::uniform4(-1.0..1.0f64)
        .prop_filter("needs a direction", |c| {
            c.iter().map(|x| x * x).sum::<f64>() > 1e-3
        })
        .prop_map(|c| Quaternion::from_array(c).normalized())
}

/// Euler angles in degrees with pitch kept clear of the poles.
fn arb_euler() -> impl Strategy<Value = DVec3> {
    (-80.0..80.0f64, -180.0..180.0f64, -180.0..180.0f64)
        .prop_map(|(pitch, yaw, roll)| Vector3::new(pitch, yaw, roll))
}

proptest! {
    #[test]
    fn rotation_preserves_length(q in arb_unit_quat(), v in arb_dvec3()) {
        let r = q.rotate(v);
        prop_assert!((r.length() - v.length()).abs() <= 1e-9 * (1.0 + v.length()));
    }

    #[test]
    fn conjugate_inverts_unit_quaternions(q in arb_unit_quat()) {
        assert_quat_near(q.conjugate(), q.inverse(), 1e-12);
        assert_quat_near(q * q.inverse(), Quaternion::identity(), 1e-12);
    }

    #[test]
    fn inverse_undoes_rotation(q in arb_unit_quat(), v in arb_dvec3()) {
        assert_vec3_near(q.inverse().rotate(q.rotate(v)), v, 1e-9);
    }

    #[test]
    fn composition_matches_sequential_rotation(
        a in arb_unit_quat(),
        b in arb_unit_quat(),
        v in arb_dvec3(),
    ) {
        assert_vec3_near((a * b).rotate(v), a.rotate(b.rotate(v)), 1e-9);
    }

    #[test]
    fn euler_round_trips_off_the_poles(angles in arb_euler()) {
        let q = Quaternion::euler(angles);
        let back = q.euler_angles();
        prop_assert!(same_rotation(Quaternion::euler(back), q, 1e-9));
        prop_assert!(angle_diff(back.x(), angles.x()) < 1e-6);
        prop_assert!(angle_diff(back.y(), angles.y()) < 1e-6);
        prop_assert!(angle_diff(back.z(), angles.z()) < 1e-6);
    }

    #[test]
    fn euler_is_yaw_pitch_roll_product(angles in arb_euler()) {
        let r = angles * std::f64::consts::PI / 180.0;
        let composed = Quaternion::axis_angle(Vector3::Y, r.y())
            * Quaternion::axis_angle(Vector3::X, r.x())
            * Quaternion::axis_angle(Vector3::Z, r.z());
        assert_quat_near(Quaternion::euler(angles), composed, 1e-12);
    }

    #[test]
    fn euler_angles_are_wrapped(q in arb_unit_quat()) {
        let e = q.euler_angles();
        for i in 0..3 {
            prop_assert!((0.0..360.0).contains(&e[i]), "component {} = {}", i, e[i]);
        }
    }

    #[test]
    fn slerp_between_identical_is_constant(q in arb_unit_quat(), t in 0.0..=1.0f64) {
        prop_assert_eq!(Quaternion::slerp(q, q, t), q);
    }

    #[test]
    fn slerp_hits_endpoints(a in arb_unit_quat(), b in arb_unit_quat()) {
        prop_assert!(same_rotation(Quaternion::slerp(a, b, 0.0), a, 1e-9));
        prop_assert!(same_rotation(Quaternion::slerp(a, b, 1.0), b, 1e-9));
    }

    #[test]
    fn slerp_stays_unit(a in arb_unit_quat(), b in arb_unit_quat(), t in 0.0..=1.0f64) {
        prop_assert!((Quaternion::slerp(a, b, t).length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_conversion_round_trips(q in arb_unit_quat()) {
        let back = Quaternion::from_matrix3(&q.to_matrix3());
        prop_assert!(same_rotation(back, q, 1e-9));
    }
}
