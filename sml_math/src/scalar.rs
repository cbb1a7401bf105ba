//! Scalar primitives.
//!
//! Element traits the vector types are generic over, plus the small set of
//! scalar helpers (trig, sqrt, lerp, clamp, angle wrapping) the vector and
//! quaternion formulas are written against. Trig functions take radians and
//! follow IEEE-754 semantics.

use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, Neg, SubAssign};

use crate::lanes::LaneOps;

/// Anything that can occupy a lane.
pub trait Element: Copy + PartialEq + Default + fmt::Debug + fmt::Display + 'static {
    /// Non-zero for numbers, `true` for bools.
    fn is_truthy(self) -> bool;
}

/// Element with componentwise arithmetic.
pub trait Number:
    Element + LaneOps + PartialOrd + AddAssign + SubAssign + MulAssign + DivAssign
{
    const ZERO: Self;
    const ONE: Self;
}

/// Floating-point element. Everything transcendental hangs off this.
pub trait Real: Number + Neg<Output = Self> {
    const PI: Self;
    const EPSILON: Self;
    const DEG2RAD: Self;
    const RAD2DEG: Self;
    /// Quaternions whose 4D dot product exceeds this are the same rotation.
    const ROTATION_EQ_THRESHOLD: Self;

    fn from_f64(v: f64) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    /// `self` is the y coordinate.
    fn atan2(self, x: Self) -> Self;
    fn abs(self) -> Self;
    fn rem_euclid(self, rhs: Self) -> Self;
}

impl Element for bool {
    fn is_truthy(self) -> bool {
        self
    }
}

macro_rules! impl_int {
    ($($t:ty),*) => {$(
        impl Element for $t {
            fn is_truthy(self) -> bool {
                self != 0
            }
        }

        impl Number for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
        }
    )*};
}

impl_int!(i32, u32);

macro_rules! impl_real {
    ($t:ident) => {
        impl Element for $t {
            fn is_truthy(self) -> bool {
                self != 0.0
            }
        }

        impl Number for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
        }

        impl Real for $t {
            const PI: Self = std::$t::consts::PI;
            const EPSILON: Self = $t::EPSILON;
            const DEG2RAD: Self = std::$t::consts::PI / 180.0;
            const RAD2DEG: Self = 180.0 / std::$t::consts::PI;
            const ROTATION_EQ_THRESHOLD: Self = 0.999999;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn sqrt(self) -> Self {
                $t::sqrt(self)
            }

            #[inline]
            fn sin(self) -> Self {
                $t::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                $t::cos(self)
            }

            #[inline]
            fn asin(self) -> Self {
                $t::asin(self)
            }

            #[inline]
            fn acos(self) -> Self {
                $t::acos(self)
            }

            #[inline]
            fn atan2(self, x: Self) -> Self {
                $t::atan2(self, x)
            }

            #[inline]
            fn abs(self) -> Self {
                $t::abs(self)
            }

            #[inline]
            fn rem_euclid(self, rhs: Self) -> Self {
                $t::rem_euclid(self, rhs)
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);

/// Smaller of two values; returns `b` when they are unordered.
#[inline]
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// Larger of two values; returns `b` when they are unordered.
#[inline]
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

/// `max(lo, min(v, hi))`. Deterministic even when `lo > hi` (yields `lo`).
#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    max(lo, min(v, hi))
}

#[inline]
pub fn lerp<T: Real>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Like [`lerp`] with `t` clamped to `[0, 1]` first.
#[inline]
pub fn lerp_clamped<T: Real>(a: T, b: T, t: T) -> T {
    lerp(a, b, clamp(t, T::ZERO, T::ONE))
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_angle<T: Real>(degrees: T) -> T {
    let full = T::from_f64(360.0);
    let wrapped = degrees.rem_euclid(full);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= full {
        T::ZERO
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_is_max_of_min() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        // Inverted bounds resolve to the lower bound.
        assert_eq!(clamp(2, 3, 0), 3);
    }

    #[test]
    fn lerp_clamped_limits_blend() {
        assert_eq!(lerp(0.0_f32, 10.0, 1.5), 15.0);
        assert_eq!(lerp_clamped(0.0_f32, 10.0, 1.5), 10.0);
        assert_eq!(lerp_clamped(0.0_f64, 10.0, -0.5), 0.0);
    }

    #[test]
    fn normalize_angle_wraps_into_range() {
        assert_eq!(normalize_angle(370.0_f64), 10.0);
        assert_eq!(normalize_angle(-90.0_f64), 270.0);
        assert_eq!(normalize_angle(360.0_f32), 0.0);
        assert_eq!(normalize_angle(-1e-30_f32), 0.0);
    }

    #[test]
    fn truthiness() {
        assert!(true.is_truthy());
        assert!(!0_u32.is_truthy());
        assert!((-2_i32).is_truthy());
        assert!(!0.0_f64.is_truthy());
        assert!(!(-0.0_f32).is_truthy());
    }
}
