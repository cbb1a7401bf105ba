//! 3×3 matrix.
//!
//! Row-major, acting on column vectors (`m * v`). Only as much as the
//! quaternion conversions need.

use std::ops::{Index, Mul};

use serde::{Deserialize, Serialize};

use crate::scalar::Number;
use crate::vector3::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3<T> {
    /// `m[row][col]`.
    pub m: [[T; 3]; 3],
}

impl<T: Number> Default for Matrix3<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Number> Matrix3<T> {
    pub fn identity() -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [[l, o, o], [o, l, o], [o, o, l]],
        }
    }

    pub fn from_rows(r0: Vector3<T>, r1: Vector3<T>, r2: Vector3<T>) -> Self {
        Self {
            m: [r0.as_array(), r1.as_array(), r2.as_array()],
        }
    }

    pub fn from_cols(c0: Vector3<T>, c1: Vector3<T>, c2: Vector3<T>) -> Self {
        Self::from_rows(c0, c1, c2).transpose()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.m[row][col]
    }

    pub fn row(&self, i: usize) -> Vector3<T> {
        Vector3::from_array(self.m[i])
    }

    pub fn col(&self, j: usize) -> Vector3<T> {
        Vector3::new(self.m[0][j], self.m[1][j], self.m[2][j])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self {
            m: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    pub fn mul_vec(&self, v: Vector3<T>) -> Vector3<T> {
        Vector3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    #[inline]
    pub fn trace(&self) -> T {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }
}

impl<T> Index<(usize, usize)> for Matrix3<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.m[row][col]
    }
}

impl<T: Number> Mul<Vector3<T>> for Matrix3<T> {
    type Output = Vector3<T>;

    fn mul(self, rhs: Vector3<T>) -> Vector3<T> {
        self.mul_vec(rhs)
    }
}
