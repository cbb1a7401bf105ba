//! 4D vector.
//!
//! Kept to what [`Quaternion`](crate::quaternion::Quaternion) builds on:
//! lane arithmetic, scaling, dot product and length. All four lanes carry
//! data.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::lanes::Lanes;
use crate::scalar::{Element, Number, Real};
use crate::vector3::Vector3;

#[derive(Clone, Copy, Default, PartialEq)]
#[repr(transparent)]
pub struct Vector4<T> {
    lanes: Lanes<T>,
}

impl<T: Element> Vector4<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self {
            lanes: Lanes([x, y, z, w]),
        }
    }

    #[inline]
    pub fn splat(v: T) -> Self {
        Self::new(v, v, v, v)
    }

    #[inline]
    pub fn from_array(v: [T; 4]) -> Self {
        Self { lanes: Lanes(v) }
    }

    #[inline]
    pub fn as_array(&self) -> [T; 4] {
        self.lanes.0
    }

    /// Vector part plus a fourth component.
    #[inline]
    pub fn from_xyz_w(xyz: Vector3<T>, w: T) -> Self {
        Self::new(xyz.x(), xyz.y(), xyz.z(), w)
    }

    #[inline]
    pub fn xyz(&self) -> Vector3<T> {
        Vector3::new(self.x(), self.y(), self.z())
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
    pub fn w(&self) -> T {
        self.lanes.0[3]
    }

    #[inline]
    pub fn set(&mut self, x: T, y: T, z: T, w: T) {
        self.lanes = Lanes([x, y, z, w]);
    }

    #[inline]
    pub fn set_xyz(&mut self, xyz: Vector3<T>) {
        self.lanes.0[..3].copy_from_slice(&xyz.as_array());
    }

    #[inline]
    pub fn set_w(&mut self, w: T) {
        self.lanes.0[3] = w;
    }
}

impl<T: Number> Vector4<T> {
    pub const ZERO: Self = Self {
        lanes: Lanes([T::ZERO; 4]),
    };

    #[inline]
    pub fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub fn set_zero(&mut self) {
        *self = Self::ZERO;
    }

    /// Products go through the lane dispatch; the sum is always x, y, z, w
    /// in that order.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        let p = T::mul_lanes(&self.lanes, &other.lanes).0;
        p[0] + p[1] + p[2] + p[3]
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }
}

impl<T: Real> Vector4<T> {
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }
}

impl<T: Number> Add for Vector4<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            lanes: T::add_lanes(&self.lanes, &rhs.lanes),
        }
    }
}

impl<T: Number> Sub for Vector4<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            lanes: T::sub_lanes(&self.lanes, &rhs.lanes),
        }
    }
}

impl<T: Number> Mul<T> for Vector4<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self {
            lanes: T::scale_lanes(&self.lanes, rhs),
        }
    }
}

impl<T: Number> AddAssign for Vector4<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Number> SubAssign for Vector4<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Number> MulAssign<T> for Vector4<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Number + std::ops::Neg<Output = T>> Neg for Vector4<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x(), -self.y(), -self.z(), -self.w())
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector4")
            .field("x", &self.lanes.0[0])
            .field("y", &self.lanes.0[1])
            .field("z", &self.lanes.0[2])
            .field("w", &self.lanes.0[3])
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct Xyzw<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl<T: Element + Serialize> Serialize for Vector4<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [x, y, z, w] = self.as_array();
        Xyzw { x, y, z, w }.serialize(serializer)
    }
}

impl<'de, T: Element + Deserialize<'de>> Deserialize<'de> for Vector4<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Xyzw { x, y, z, w } = Xyzw::deserialize(deserializer)?;
        Ok(Self::new(x, y, z, w))
    }
}
