//! `sml_math`
//!
//! Small vector and quaternion kernel for 3D game code.
//!
//! Design goals:
//! - One generic [`Vector3`] over `bool`, `i32`, `u32`, `f32` and `f64`.
//! - Arithmetic runs on 16-byte aligned four-lane blocks. With the `simd`
//!   feature on x86_64 the float lanes use SSE2; everywhere else a scalar
//!   path gives the same bits.
//! - Quaternions for rotation, Euler conversion and interpolation.
//! - `unsafe` only inside the SSE2 lane bodies.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod lanes;
pub mod matrix3;
pub mod parity;
pub mod quaternion;
pub mod scalar;
pub mod vector3;
pub mod vector4;

pub use error::MathError;
pub use lanes::{LaneOps, Lanes, SIMD_ENABLED};
pub use matrix3::Matrix3;
pub use quaternion::{DQuat, FQuat, Quaternion};
pub use scalar::{Element, Number, Real};
pub use vector3::{BVec3, DVec3, FVec3, IVec3, UVec3, Vector3};
pub use vector4::Vector4;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::error::MathError;
    pub use crate::matrix3::Matrix3;
    pub use crate::quaternion::*;
    pub use crate::scalar::{Element, Number, Real};
    pub use crate::vector3::*;
    pub use crate::vector4::Vector4;
}
