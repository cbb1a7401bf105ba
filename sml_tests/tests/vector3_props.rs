//! Property-based tests for Vector3.
//!
//! Run with: cargo test -p sml_tests --test vector3_props

mod common;

use common::assert_vec3_near;
use proptest::prelude::*;
use sml_math::{DVec3, FVec3, IVec3, Vector3};

fn arb_dvec3() -> impl Strategy<Value = DVec3> {
    prop::array::uniform3(-1.0e3..1.0e3f64).prop_map(Vector3::from_array)
}

fn arb_fvec3() -> impl Strategy<Value = FVec3> {
    prop::array::uniform3(-1.0e3..1.0e3f32).prop_map(Vector3::from_array)
}

fn arb_ivec3() -> impl Strategy<Value = IVec3> {
    prop::array::uniform3(-1000..1000i32).prop_map(Vector3::from_array)
}

proptest! {
    #[test]
    fn cross_is_anticommutative(a in arb_dvec3(), b in arb_dvec3()) {
        prop_assert_eq!(a.cross(b), -b.cross(a));
    }

    #[test]
    fn integer_cross_is_anticommutative(a in arb_ivec3(), b in arb_ivec3()) {
        prop_assert_eq!(a.cross(b), -b.cross(a));
    }

    #[test]
    fn cross_is_perpendicular(a in arb_dvec3(), b in arb_dvec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length() * (a.length() + b.length()) + 1.0;
        prop_assert!(c.dot(a).abs() <= 1e-12 * scale);
        prop_assert!(c.dot(b).abs() <= 1e-12 * scale);
    }

    #[test]
    fn dot_sums_in_component_order(a in arb_fvec3(), b in arb_fvec3()) {
        let want = a.x() * b.x() + a.y() * b.y() + a.z() * b.z();
        prop_assert_eq!(a.dot(b).to_bits(), want.to_bits());
    }

    #[test]
    fn normalized_is_unit_or_zero(v in arb_dvec3()) {
        let n = v.normalized();
        if v.length() > f64::EPSILON {
            prop_assert!((n.length() - 1.0).abs() < 1e-12);
        } else {
            prop_assert_eq!(n, DVec3::ZERO);
        }
    }

    #[test]
    fn clamp_stays_in_box(v in arb_dvec3(), a in arb_dvec3(), b in arb_dvec3()) {
        let (lo, hi) = (a.min(b), a.max(b));
        let c = v.clamp(lo, hi);
        for i in 0..3 {
            prop_assert!(c[i] >= lo[i] && c[i] <= hi[i]);
        }
    }

    #[test]
    fn lerp_hits_endpoints(a in arb_dvec3(), b in arb_dvec3()) {
        assert_vec3_near(a.lerp(b, 0.0), a, 1e-12);
        assert_vec3_near(a.lerp(b, 1.0), b, 1e-9);
        prop_assert_eq!(a.lerp_clamped(b, 7.0), a.lerp_clamped(b, 1.0));
    }

    #[test]
    fn projection_is_parallel(v in arb_dvec3(), onto in arb_dvec3()) {
        prop_assume!(onto.length() > 1e-3);
        let p = v.project(onto);
        let scale = p.length() * onto.length() + 1.0;
        prop_assert!(p.cross(onto).length() <= 1e-9 * scale);
    }
}
