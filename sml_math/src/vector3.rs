//! 3D vector.
//!
//! Components live in a [`Lanes`] block whose fourth lane is pinned to zero,
//! so `f32`/`f64` arithmetic can go through the SSE2 path four lanes at a
//! time. Every constructor and operator re-zeroes that lane; it never
//! reaches a public result.

use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MathError;
use crate::lanes::Lanes;
use crate::scalar::{self, Element, Number, Real};

/// 3D vector over a uniform element type.
#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Vector3<T> {
    lanes: Lanes<T>,
}

pub type BVec3 = Vector3<bool>;
pub type UVec3 = Vector3<u32>;
pub type IVec3 = Vector3<i32>;
pub type FVec3 = Vector3<f32>;
pub type DVec3 = Vector3<f64>;

impl<T: Element> Vector3<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Self {
        Self {
            lanes: Lanes([x, y, z, T::default()]),
        }
    }

    /// Same value in all three components.
    #[inline]
    pub fn splat(v: T) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub fn from_array([x, y, z]: [T; 3]) -> Self {
        Self::new(x, y, z)
    }

    #[inline]
    pub fn as_array(&self) -> [T; 3] {
        [self.lanes.0[0], self.lanes.0[1], self.lanes.0[2]]
    }

    #[inline]
    pub fn x(&self) -> T {
        self.lanes.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.lanes.0[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.lanes.0[2]
    }

    #[inline]
    pub fn set_x(&mut self, x: T) {
        self.lanes.0[0] = x;
    }

    #[inline]
    pub fn set_y(&mut self, y: T) {
        self.lanes.0[1] = y;
    }

    #[inline]
    pub fn set_z(&mut self, z: T) {
        self.lanes.0[2] = z;
    }

    #[inline]
    pub fn set(&mut self, x: T, y: T, z: T) {
        *self = Self::new(x, y, z);
    }

    /// At least one component is non-zero.
    pub fn any(&self) -> bool {
        self.as_array().iter().any(|c| c.is_truthy())
    }

    /// Every component is non-zero.
    pub fn all(&self) -> bool {
        self.as_array().iter().all(|c| c.is_truthy())
    }

    /// Every component is zero.
    pub fn none(&self) -> bool {
        !self.any()
    }

    #[inline]
    pub(crate) fn from_lanes(mut lanes: Lanes<T>) -> Self {
        lanes.0[3] = T::default();
        Self { lanes }
    }

    #[inline]
    pub(crate) fn lanes(&self) -> &Lanes<T> {
        &self.lanes
    }
}

impl<T: Number> Vector3<T> {
    pub const ZERO: Self = Self {
        lanes: Lanes([T::ZERO; 4]),
    };
    pub const ONE: Self = Self {
        lanes: Lanes([T::ONE, T::ONE, T::ONE, T::ZERO]),
    };
    pub const X: Self = Self {
        lanes: Lanes([T::ONE, T::ZERO, T::ZERO, T::ZERO]),
    };
    pub const Y: Self = Self {
        lanes: Lanes([T::ZERO, T::ONE, T::ZERO, T::ZERO]),
    };
    pub const Z: Self = Self {
        lanes: Lanes([T::ZERO, T::ZERO, T::ONE, T::ZERO]),
    };

    #[inline]
    pub fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub fn set_zero(&mut self) {
        *self = Self::ZERO;
    }

    /// Euclidean inner product.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        let p = T::mul_lanes(&self.lanes, &other.lanes).0;
        p[0] + p[1] + p[2]
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        let [x, y, z] = self.as_array();
        let [ox, oy, oz] = other.as_array();
        Self::new(y * oz - z * oy, z * ox - x * oz, x * oy - y * ox)
    }

    /// Prefer this over `length` when only comparing magnitudes.
    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::from_lanes(T::min_lanes(&self.lanes, &other.lanes))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::from_lanes(T::max_lanes(&self.lanes, &other.lanes))
    }

    /// `max(lo, min(self, hi))`, componentwise. With `lo > hi` the result is `lo`.
    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        lo.max(self.min(hi))
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.as_array().iter().any(|&c| c == T::ZERO) {
            return Err(MathError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    pub fn checked_div_scalar(self, rhs: T) -> Result<Self, MathError> {
        if rhs == T::ZERO {
            return Err(MathError::DivisionByZero);
        }
        Ok(self / rhs)
    }
}

impl<T: Real> Vector3<T> {
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Scales to unit length in place.
    ///
    /// A vector no longer than epsilon becomes the zero vector rather than
    /// dividing by (almost) zero.
    pub fn normalize(&mut self) -> &mut Self {
        let mag = self.length();
        if mag > T::EPSILON {
            *self /= mag;
        } else {
            self.set_zero();
        }
        self
    }

    pub fn normalized(self) -> Self {
        let mut v = self;
        v.normalize();
        v
    }

    /// Like [`normalized`](Self::normalized), but reports the epsilon case.
    pub fn try_normalized(self) -> Result<Self, MathError> {
        let mag = self.length();
        if mag > T::EPSILON {
            Ok(self / mag)
        } else {
            Err(MathError::DegenerateInput)
        }
    }

    /// Componentwise linear interpolation; `t` is not clamped.
    pub fn lerp(self, to: Self, t: T) -> Self {
        Self::new(
            scalar::lerp(self.x(), to.x(), t),
            scalar::lerp(self.y(), to.y(), t),
            scalar::lerp(self.z(), to.z(), t),
        )
    }

    /// Componentwise linear interpolation with `t` clamped to `[0, 1]`.
    pub fn lerp_clamped(self, to: Self, t: T) -> Self {
        Self::new(
            scalar::lerp_clamped(self.x(), to.x(), t),
            scalar::lerp_clamped(self.y(), to.y(), t),
            scalar::lerp_clamped(self.z(), to.z(), t),
        )
    }

    #[inline]
    pub fn distance(self, other: Self) -> T {
        (other - self).length()
    }

    /// Projection of `self` onto `onto`. A zero `onto` yields NaNs.
    pub fn project(self, onto: Self) -> Self {
        onto * (self.dot(onto) / onto.dot(onto))
    }

    pub fn try_project(self, onto: Self) -> Result<Self, MathError> {
        let denom = onto.dot(onto);
        if denom == T::ZERO {
            return Err(MathError::DivisionByZero);
        }
        Ok(onto * (self.dot(onto) / denom))
    }
}

impl<T: Number> Add for Vector3<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_lanes(T::add_lanes(&self.lanes, &rhs.lanes))
    }
}

impl<T: Number> Sub for Vector3<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_lanes(T::sub_lanes(&self.lanes, &rhs.lanes))
    }
}

impl<T: Number> Mul for Vector3<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_lanes(T::mul_lanes(&self.lanes, &rhs.lanes))
    }
}

impl<T: Number> Mul<T> for Vector3<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::from_lanes(T::scale_lanes(&self.lanes, rhs))
    }
}

/// Float components divide per IEEE-754; integer components panic on zero
/// like the scalar operator.
impl<T: Number> Div for Vector3<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        // Padding lane would be 0 / 0, which panics for integers.
        let mut divisor = rhs.lanes;
        divisor.0[3] = T::ONE;
        Self::from_lanes(T::div_lanes(&self.lanes, &divisor))
    }
}

impl<T: Number> Div<T> for Vector3<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::from_lanes(T::div_scalar_lanes(&self.lanes, rhs))
    }
}

impl<T: Number> AddAssign for Vector3<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Number> SubAssign for Vector3<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Number> MulAssign for Vector3<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Number> MulAssign<T> for Vector3<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Number> DivAssign for Vector3<T> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<T: Number> DivAssign<T> for Vector3<T> {
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

impl<T: Number + Neg<Output = T>> Neg for Vector3<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x(), -self.y(), -self.z())
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {$(
        impl Mul<Vector3<$t>> for $t {
            type Output = Vector3<$t>;

            #[inline]
            fn mul(self, rhs: Vector3<$t>) -> Vector3<$t> {
                rhs * self
            }
        }
    )*};
}

impl_scalar_lhs_mul!(f32, f64, i32, u32);

impl<T> Index<usize> for Vector3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.lanes.0[..3][i]
    }
}

impl<T> IndexMut<usize> for Vector3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.lanes.0[..3][i]
    }
}

impl<T: Element> PartialEq for Vector3<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_array() == other.as_array()
    }
}

impl<T: Element> From<[T; 3]> for Vector3<T> {
    fn from(v: [T; 3]) -> Self {
        Self::from_array(v)
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector3")
            .field("x", &self.lanes.0[0])
            .field("y", &self.lanes.0[1])
            .field("z", &self.lanes.0[2])
            .finish()
    }
}

impl<T: Element> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x(), self.y(), self.z())
    }
}

/// Wire shape: named components only, no padding lane.
#[derive(Serialize, Deserialize)]
struct Xyz<T> {
    x: T,
    y: T,
    z: T,
}

impl<T: Element + Serialize> Serialize for Vector3<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: self.x(),
            y: self.y(),
            z: self.z(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Element + Deserialize<'de>> Deserialize<'de> for Vector3<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Xyz { x, y, z } = Xyz::deserialize(deserializer)?;
        Ok(Self::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(FVec3::default(), FVec3::ZERO);
        assert_eq!(IVec3::default().as_array(), [0, 0, 0]);
    }

    #[test]
    fn splat_broadcasts() {
        assert_eq!(DVec3::splat(2.5), DVec3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = FVec3::new(1.0, 2.0, 3.0);
        let b = FVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, FVec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, FVec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, FVec3::new(4.0, 10.0, 18.0));
        assert_eq!(b / a, FVec3::new(4.0, 2.5, 2.0));
        assert_eq!(a * 2.0, FVec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, FVec3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, FVec3::new(2.0, 2.5, 3.0));
        assert_eq!(-a, FVec3::new(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= FVec3::splat(2.0);
        assert_eq!(c, b);
    }

    #[test]
    fn integer_vectors_support_arithmetic() {
        let a = IVec3::new(6, -4, 9);
        let b = IVec3::new(3, 2, -3);
        assert_eq!(a + b, IVec3::new(9, -2, 6));
        assert_eq!(a / b, IVec3::new(2, -2, -3));
        assert_eq!(a.dot(b), 18 - 8 - 27);
        assert_eq!(UVec3::new(1, 2, 3) * 3, UVec3::new(3, 6, 9));
    }

    #[test]
    fn padding_lane_stays_zero() {
        let a = FVec3::new(1.0, 2.0, 3.0);
        let q = a / FVec3::new(0.5, 0.25, 2.0);
        assert_eq!(q.lanes().0[3], 0.0);
        let s = a * f32::INFINITY;
        assert_eq!(s.lanes().0[3], 0.0);
        let d = a / 0.0;
        assert_eq!(d.lanes().0[3], 0.0);
        assert!(d.x().is_infinite());
    }

    #[test]
    fn dot_and_cross() {
        let x = DVec3::X;
        let y = DVec3::Y;
        assert_eq!(x.dot(y), 0.0);
        assert_eq!(x.cross(y), DVec3::Z);
        assert_eq!(y.cross(x), -DVec3::Z);

        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(-2.0, 0.5, 4.0);
        assert_eq!(a.cross(b), -b.cross(a));
        assert_eq!(a.dot(b), -2.0 + 1.0 + 12.0);
    }

    #[test]
    fn length_and_distance() {
        let v = FVec3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(FVec3::ZERO.distance(v), 5.0);
        assert_eq!(v.distance(FVec3::ZERO), 5.0);
    }

    #[test]
    fn normalize_snaps_tiny_vectors_to_zero() {
        assert_eq!(FVec3::ZERO.normalized(), FVec3::ZERO);
        let tiny = FVec3::splat(1e-9);
        assert_eq!(tiny.normalized(), FVec3::ZERO);
        assert_eq!(tiny.try_normalized(), Err(MathError::DegenerateInput));

        let mut v = DVec3::new(0.0, 3.0, 4.0);
        v.normalize();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.y(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn min_max_clamp() {
        let a = FVec3::new(1.0, 5.0, -2.0);
        let b = FVec3::new(3.0, 2.0, -1.0);
        assert_eq!(a.min(b), FVec3::new(1.0, 2.0, -2.0));
        assert_eq!(a.max(b), FVec3::new(3.0, 5.0, -1.0));

        let lo = FVec3::splat(0.0);
        let hi = FVec3::splat(2.0);
        assert_eq!(a.clamp(lo, hi), FVec3::new(1.0, 2.0, 0.0));
        // Inverted bounds pick `lo`.
        assert_eq!(a.clamp(hi, lo), hi);
    }

    #[test]
    fn lerp_variants() {
        let a = FVec3::new(0.0, 0.0, 0.0);
        let b = FVec3::new(2.0, 4.0, 6.0);
        assert_eq!(a.lerp(b, 0.5), FVec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.lerp(b, 2.0), FVec3::new(4.0, 8.0, 12.0));
        assert_eq!(a.lerp_clamped(b, 2.0), b);
        assert_eq!(a.lerp_clamped(b, -1.0), a);
    }

    #[test]
    fn project_onto_axis() {
        let v = DVec3::new(3.0, 4.0, 5.0);
        assert_eq!(v.project(DVec3::X * 2.0), DVec3::new(3.0, 0.0, 0.0));
        assert!(v.project(DVec3::ZERO).x().is_nan());
        assert_eq!(v.try_project(DVec3::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn checked_division() {
        let v = FVec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            v.checked_div(FVec3::new(1.0, 0.0, 1.0)),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(v.checked_div_scalar(0.0), Err(MathError::DivisionByZero));
        assert_eq!(v.checked_div_scalar(2.0), Ok(FVec3::new(0.5, 1.0, 1.5)));
        assert_eq!(
            IVec3::new(1, 2, 3).checked_div(IVec3::new(1, 0, 1)),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn truthiness_reductions() {
        assert!(BVec3::new(false, true, false).any());
        assert!(!BVec3::new(false, true, false).all());
        assert!(BVec3::new(true, true, true).all());
        assert!(BVec3::default().none());
        assert!(IVec3::new(0, 0, 0).none());
        assert!(FVec3::new(0.0, 0.0, 0.5).any());
    }

    #[test]
    fn indexing() {
        let mut v = IVec3::new(7, 8, 9);
        assert_eq!(v[2], 9);
        v[0] = 1;
        assert_eq!(v.as_array(), [1, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn padding_lane_is_not_indexable() {
        let v = IVec3::new(7, 8, 9);
        let _out_of_range = v[3];
    }

    #[test]
    fn display_and_serde() {
        let v = FVec3::new(1.5, -2.0, 0.25);
        assert_eq!(v.to_string(), "1.5, -2, 0.25");

        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":-2.0,"z":0.25}"#);
        let back: FVec3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
