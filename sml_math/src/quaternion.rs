//! Rotation quaternion.
//!
//! A [`Quaternion`] is a [`Vector4`] read as `(x, y, z, w)` with `xyz` the
//! vector part and `w` the scalar part. Unit length is a soft invariant:
//! the rotation constructors (`identity`, `euler`, `axis_angle`, `slerp`,
//! `from_matrix3`) produce unit quaternions, while `+`, `-` and scalar
//! multiplication do not preserve it and exist for interpolation math.
//!
//! Equality is "same rotation, same sign": two quaternions compare equal
//! when their 4D dot product exceeds [`Real::ROTATION_EQ_THRESHOLD`]. `q`
//! and `-q` encode the same rotation but are not equal under this rule.
//!
//! Euler angles are in degrees: `x` is pitch about X, `y` yaw about Y and
//! `z` roll about Z, composed as `yaw * pitch * roll` (roll applied first).

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::error::MathError;
use crate::matrix3::Matrix3;
use crate::scalar::{normalize_angle, Real};
use crate::vector3::Vector3;
use crate::vector4::{Vector4, Xyzw};

/// Share of `|q|²` past which `euler_angles` treats the pitch as ±90°.
const GIMBAL_POLE_THRESHOLD: f64 = 0.4995;

/// `slerp` switches to a plain linear blend above this `cos(θ)`.
const SLERP_LINEAR_THRESHOLD: f64 = 0.99;

#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Quaternion<T> {
    v: Vector4<T>,
}

pub type FQuat = Quaternion<f32>;
pub type DQuat = Quaternion<f64>;

impl<T: Real> Quaternion<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self {
            v: Vector4::new(x, y, z, w),
        }
    }

    #[inline]
    pub fn from_xyz_w(xyz: Vector3<T>, w: T) -> Self {
        Self {
            v: Vector4::from_xyz_w(xyz, w),
        }
    }

    #[inline]
    pub fn from_w_xyz(w: T, xyz: Vector3<T>) -> Self {
        Self::from_xyz_w(xyz, w)
    }

    /// Same value in all four components. Not a rotation in general.
    #[inline]
    pub fn splat(v: T) -> Self {
        Self {
            v: Vector4::splat(v),
        }
    }

    /// The no-op rotation. Note that `Default` is the zero quaternion.
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::ZERO, T::ZERO, T::ZERO, T::ONE)
    }

    #[inline]
    pub fn from_array(v: [T; 4]) -> Self {
        Self {
            v: Vector4::from_array(v),
        }
    }

    #[inline]
    pub fn as_array(&self) -> [T; 4] {
        self.v.as_array()
    }

    #[inline]
    pub fn as_vector4(&self) -> Vector4<T> {
        self.v
    }

    #[inline]
    pub fn x(&self) -> T {
        self.v.x()
    }

    #[inline]
    pub fn y(&self) -> T {
        self.v.y()
    }

    #[inline]
    pub fn z(&self) -> T {
        self.v.z()
    }

    #[inline]
    pub fn w(&self) -> T {
        self.v.w()
    }

    /// Vector part.
    #[inline]
    pub fn xyz(&self) -> Vector3<T> {
        self.v.xyz()
    }

    #[inline]
    pub fn set(&mut self, x: T, y: T, z: T, w: T) {
        self.v.set(x, y, z, w);
    }

    #[inline]
    pub fn set_xyz(&mut self, xyz: Vector3<T>) {
        self.v.set_xyz(xyz);
    }

    #[inline]
    pub fn set_w(&mut self, w: T) {
        self.v.set_w(w);
    }

    #[inline]
    pub fn set_zero(&mut self) {
        self.v.set_zero();
    }

    #[inline]
    pub fn dot(self, other: Self) -> T {
        self.v.dot(other.v)
    }

    #[inline]
    pub fn length(self) -> T {
        self.v.length()
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.v.length_squared()
    }

    /// Scales to unit length in place. A zero quaternion turns into NaNs;
    /// use [`try_normalized`](Self::try_normalized) to catch that.
    pub fn normalize(&mut self) {
        let scale = T::ONE / self.length();
        self.v *= scale;
    }

    pub fn normalized(self) -> Self {
        let mut q = self;
        q.normalize();
        q
    }

    pub fn try_normalized(self) -> Result<Self, MathError> {
        if self.length_squared() == T::ZERO {
            return Err(MathError::DegenerateInput);
        }
        Ok(self.normalized())
    }

    /// Negated vector part. The inverse rotation when `self` is unit length.
    pub fn conjugate(self) -> Self {
        Self::from_xyz_w(-self.xyz(), self.w())
    }

    /// General inverse, `conjugate / |q|²`.
    ///
    /// Leaves `self` untouched when `|q|²` is exactly zero.
    pub fn invert(&mut self) {
        let length_sq = self.length_squared();
        if length_sq == T::ZERO {
            trace!("invert on zero quaternion left unchanged");
            return;
        }
        let inv = T::ONE / length_sq;
        *self = Self::from_xyz_w(self.xyz() * -inv, self.w() * inv);
    }

    pub fn inverse(self) -> Self {
        let mut q = self;
        q.invert();
        q
    }

    pub fn try_inverse(self) -> Result<Self, MathError> {
        if self.length_squared() == T::ZERO {
            return Err(MathError::DivisionByZero);
        }
        Ok(self.inverse())
    }

    /// Rotates `v`. Assumes `self` is unit length; otherwise the result is
    /// also scaled and sheared.
    pub fn rotate(self, v: Vector3<T>) -> Vector3<T> {
        let two = T::ONE + T::ONE;
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        let (x2, y2, z2) = (x * two, y * two, z * two);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Vector3::new(
            (T::ONE - (yy + zz)) * v.x() + (xy - wz) * v.y() + (xz + wy) * v.z(),
            (xy + wz) * v.x() + (T::ONE - (xx + zz)) * v.y() + (yz - wx) * v.z(),
            (xz - wy) * v.x() + (yz + wx) * v.y() + (T::ONE - (xx + yy)) * v.z(),
        )
    }

    /// Each axis wrapped into `[0, 360)` independently.
    pub fn normalize_angles(angles: Vector3<T>) -> Vector3<T> {
        Vector3::new(
            normalize_angle(angles.x()),
            normalize_angle(angles.y()),
            normalize_angle(angles.z()),
        )
    }

    /// Euler angles in degrees, each in `[0, 360)`.
    ///
    /// Near the pitch poles (|pitch| ≈ 90°) yaw and roll are not separable;
    /// there the whole remaining rotation is reported as yaw and roll is 0.
    /// Any non-zero scaling of `self` reads the same angles; the zero
    /// quaternion reads as all zeros.
    pub fn euler_angles(self) -> Vector3<T> {
        let two = T::ONE + T::ONE;
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        let unit = self.length_squared();
        if unit == T::ZERO {
            trace!("euler_angles on zero quaternion");
            return Vector3::ZERO;
        }
        let test = x * w - y * z;
        let pole = T::from_f64(GIMBAL_POLE_THRESHOLD) * unit;

        if test > pole {
            trace!("euler_angles at north pole");
            let res = Vector3::new(T::PI / two, two * y.atan2(x), T::ZERO);
            return Self::normalize_angles(res * T::RAD2DEG);
        }

        if test < -pole {
            trace!("euler_angles at south pole");
            let res = Vector3::new(-T::PI / two, -two * y.atan2(x), T::ZERO);
            return Self::normalize_angles(res * T::RAD2DEG);
        }

        // Reordered so the yaw/pitch/roll extraction reads as the textbook
        // ZYX formula.
        let (qx, qy, qz, qw) = (w, z, x, y);
        // Terms are relative to `unit`; q need not be unit length.
        let yaw = (two * qx * qw + two * qy * qz).atan2(unit - two * (qz * qz + qw * qw));
        let pitch = (two * test / unit).asin();
        let roll = (two * qx * qy + two * qz * qw).atan2(unit - two * (qy * qy + qz * qz));

        Self::normalize_angles(Vector3::new(pitch, yaw, roll) * T::RAD2DEG)
    }

    /// Rotation from Euler angles in degrees, the inverse of
    /// [`euler_angles`](Self::euler_angles) away from the poles.
    pub fn euler(degrees: Vector3<T>) -> Self {
        let half = T::ONE / (T::ONE + T::ONE);
        let r = degrees * T::DEG2RAD;
        let (pitch, yaw, roll) = (r.x() * half, r.y() * half, r.z() * half);
        let (sp, cp) = (pitch.sin(), pitch.cos());
        let (sy, cy) = (yaw.sin(), yaw.cos());
        let (sr, cr) = (roll.sin(), roll.cos());

        Self::new(
            cy * sp * cr + sy * cp * sr,
            sy * cp * cr - cy * sp * sr,
            cy * cp * sr - sy * sp * cr,
            cy * cp * cr + sy * sp * sr,
        )
    }

    pub fn euler_xyz(x: T, y: T, z: T) -> Self {
        Self::euler(Vector3::new(x, y, z))
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` need not be normalized. An axis too short to normalize yields
    /// the identity.
    pub fn axis_angle(axis: Vector3<T>, angle: T) -> Self {
        if axis.length_squared() == T::ZERO {
            trace!("axis_angle with zero axis, returning identity");
            return Self::identity();
        }
        let axis = axis.normalized();
        if axis.length_squared() == T::ZERO {
            trace!("axis_angle axis below epsilon, returning identity");
            return Self::identity();
        }

        let half = angle / (T::ONE + T::ONE);
        Self::from_xyz_w(axis * half.sin(), half.cos()).normalized()
    }

    /// Rotation matrix to quaternion (Shepperd's method).
    ///
    /// Picks the largest of `w`, `x`, `y`, `z` to take the square root of,
    /// so the divisor never gets close to zero. `m` is expected to be a
    /// proper rotation.
    pub fn from_matrix3(m: &Matrix3<T>) -> Self {
        let one = T::ONE;
        let two = one + one;
        let half = one / two;
        let quarter = half * half;
        let trace = m.trace();

        let q = if trace > T::ZERO {
            let s = (trace + one).sqrt();
            let k = half / s;
            Self::new(
                (m[(2, 1)] - m[(1, 2)]) * k,
                (m[(0, 2)] - m[(2, 0)]) * k,
                (m[(1, 0)] - m[(0, 1)]) * k,
                s * half,
            )
        } else if m[(0, 0)] >= m[(1, 1)] && m[(0, 0)] >= m[(2, 2)] {
            let s = ((one + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]) * quarter).sqrt();
            let k = quarter / s;
            Self::new(
                s,
                (m[(0, 1)] + m[(1, 0)]) * k,
                (m[(0, 2)] + m[(2, 0)]) * k,
                (m[(2, 1)] - m[(1, 2)]) * k,
            )
        } else if m[(1, 1)] >= m[(2, 2)] {
            let s = ((one - m[(0, 0)] + m[(1, 1)] - m[(2, 2)]) * quarter).sqrt();
            let k = quarter / s;
            Self::new(
                (m[(0, 1)] + m[(1, 0)]) * k,
                s,
                (m[(1, 2)] + m[(2, 1)]) * k,
                (m[(0, 2)] - m[(2, 0)]) * k,
            )
        } else {
            let s = ((one - m[(0, 0)] - m[(1, 1)] + m[(2, 2)]) * quarter).sqrt();
            let k = quarter / s;
            Self::new(
                (m[(0, 2)] + m[(2, 0)]) * k,
                (m[(1, 2)] + m[(2, 1)]) * k,
                s,
                (m[(1, 0)] - m[(0, 1)]) * k,
            )
        };

        q.normalized()
    }

    /// Rotation matrix of a unit quaternion; columns are the rotated basis
    /// vectors.
    pub fn to_matrix3(self) -> Matrix3<T> {
        Matrix3::from_cols(
            self.rotate(Vector3::X),
            self.rotate(Vector3::Y),
            self.rotate(Vector3::Z),
        )
    }

    /// Spherical linear interpolation from `a` (t = 0) to `b` (t = 1).
    ///
    /// Degenerate inputs short-circuit: a zero quaternion on one side
    /// returns the other side, zero on both returns identity, and inputs
    /// whose dot product is already at or beyond ±1 return `a`. When the
    /// inputs lie in opposite hemispheres `b` is negated so the blend takes
    /// the shorter arc; the result then ends at `-b` for t = 1.
    pub fn slerp(a: Self, b: Self, t: T) -> Self {
        let a_zero = a.length_squared() == T::ZERO;
        let b_zero = b.length_squared() == T::ZERO;
        match (a_zero, b_zero) {
            (true, true) => {
                trace!("slerp between two zero quaternions, returning identity");
                return Self::identity();
            }
            (true, false) => return b,
            (false, true) => return a,
            (false, false) => {}
        }

        let mut b = b;
        let mut cos_half = a.dot(b);
        if cos_half >= T::ONE || cos_half <= -T::ONE {
            return a;
        }

        if cos_half < T::ZERO {
            b = -b;
            cos_half = -cos_half;
        }

        let (blend_a, blend_b) = if cos_half < T::from_f64(SLERP_LINEAR_THRESHOLD) {
            let half = cos_half.acos();
            let inv_sin = T::ONE / half.sin();
            (
                (half * (T::ONE - t)).sin() * inv_sin,
                (half * t).sin() * inv_sin,
            )
        } else {
            (T::ONE - t, t)
        };

        let res = Self {
            v: a.v * blend_a + b.v * blend_b,
        };
        if res.length_squared() > T::ZERO {
            res.normalized()
        } else {
            trace!("slerp blend collapsed to zero, returning identity");
            Self::identity()
        }
    }
}

impl<T: Real> From<Vector4<T>> for Quaternion<T> {
    fn from(v: Vector4<T>) -> Self {
        Self { v }
    }
}

/// Approximate rotation equality: `dot > ROTATION_EQ_THRESHOLD`.
///
/// `q` and `-q` describe the same rotation but compare unequal here. In
/// particular [`Quaternion::slerp`] may end at `-b` for `t = 1`; test such
/// endpoints with `end.dot(b).abs()` instead of `==`.
impl<T: Real> PartialEq for Quaternion<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dot(*other) > T::ROTATION_EQ_THRESHOLD
    }
}

impl<T: Real> Add for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { v: self.v + rhs.v }
    }
}

impl<T: Real> Sub for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { v: self.v - rhs.v }
    }
}

impl<T: Real> AddAssign for Quaternion<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.v += rhs.v;
    }
}

impl<T: Real> SubAssign for Quaternion<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.v -= rhs.v;
    }
}

/// Hamilton product: `(a * b)` rotates by `b` first, then `a`.
impl<T: Real> Mul for Quaternion<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.xyz(), rhs.xyz());
        let xyz = b * self.w() + a * rhs.w() + a.cross(b);
        let w = self.w() * rhs.w() - a.dot(b);
        Self::from_xyz_w(xyz, w)
    }
}

impl<T: Real> MulAssign for Quaternion<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Real> Mul<T> for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self { v: self.v * rhs }
    }
}

impl<T: Real> MulAssign<T> for Quaternion<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        self.v *= rhs;
    }
}

impl<T: Real> Mul<Vector3<T>> for Quaternion<T> {
    type Output = Vector3<T>;

    #[inline]
    fn mul(self, rhs: Vector3<T>) -> Vector3<T> {
        self.rotate(rhs)
    }
}

impl<T: Real> Neg for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self { v: -self.v }
    }
}

impl<T: Real> fmt::Debug for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quaternion")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("z", &self.z())
            .field("w", &self.w())
            .finish()
    }
}

impl<T: Real> fmt::Display for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.x(), self.y(), self.z(), self.w())
    }
}

impl<T: Real + Serialize> Serialize for Quaternion<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.v.serialize(serializer)
    }
}

impl<'de, T: Real + Deserialize<'de>> Deserialize<'de> for Quaternion<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Xyzw { x, y, z, w } = Xyzw::deserialize(deserializer)?;
        Ok(Self::new(x, y, z, w))
    }
}
