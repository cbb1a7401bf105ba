//! Four-lane storage and per-element arithmetic dispatch.
//!
//! Every vector type keeps its components in a [`Lanes`] block. The block is
//! 16-byte aligned by type, which is what lets the SSE2 path use aligned
//! loads and stores without checking addresses at runtime.
//!
//! [`scalar`] holds the reference implementation. `f32` and `f64` swap in
//! SSE2 bodies when the `simd` feature is on and the target has SSE2; those
//! bodies must produce the same bits as the scalar ones for every input,
//! which the [`crate::parity`] checker verifies.

use std::ops::{Add, Div, Mul, Sub};

/// Four elements on a 16-byte boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C, align(16))]
pub struct Lanes<T>(pub [T; 4]);

impl<T: Copy> Lanes<T> {
    #[inline]
    pub const fn new(lanes: [T; 4]) -> Self {
        Self(lanes)
    }

    #[inline]
    pub const fn splat(v: T) -> Self {
        Self([v; 4])
    }
}

/// Whether the SSE2 bodies are compiled in for `f32`/`f64`.
pub const SIMD_ENABLED: bool = cfg!(all(
    feature = "simd",
    target_arch = "x86_64",
    target_feature = "sse2"
));

/// Lane arithmetic keyed on element type.
///
/// The default bodies are the scalar path; implementors only override them
/// with a bit-identical vectorized version.
pub trait LaneOps:
    Copy
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    #[inline]
    fn add_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::add(a, b)
    }

    #[inline]
    fn sub_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::sub(a, b)
    }

    #[inline]
    fn mul_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::mul(a, b)
    }

    #[inline]
    fn div_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::div(a, b)
    }

    #[inline]
    fn scale_lanes(a: &Lanes<Self>, s: Self) -> Lanes<Self> {
        scalar::scale(a, s)
    }

    #[inline]
    fn div_scalar_lanes(a: &Lanes<Self>, s: Self) -> Lanes<Self> {
        scalar::div_scalar(a, s)
    }

    #[inline]
    fn min_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::min(a, b)
    }

    #[inline]
    fn max_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
        scalar::max(a, b)
    }
}

/// Reference lane arithmetic, one element at a time.
pub mod scalar {
    use std::ops::{Add, Div, Mul, Sub};

    use super::Lanes;

    #[inline]
    fn zip<T: Copy>(a: &Lanes<T>, b: &Lanes<T>, f: impl Fn(T, T) -> T) -> Lanes<T> {
        let (a, b) = (a.0, b.0);
        Lanes([f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])])
    }

    #[inline]
    fn map<T: Copy>(a: &Lanes<T>, f: impl Fn(T) -> T) -> Lanes<T> {
        let a = a.0;
        Lanes([f(a[0]), f(a[1]), f(a[2]), f(a[3])])
    }

    #[inline]
    pub fn add<T: Copy + Add<Output = T>>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| x + y)
    }

    #[inline]
    pub fn sub<T: Copy + Sub<Output = T>>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| x - y)
    }

    #[inline]
    pub fn mul<T: Copy + Mul<Output = T>>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| x * y)
    }

    #[inline]
    pub fn div<T: Copy + Div<Output = T>>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| x / y)
    }

    #[inline]
    pub fn scale<T: Copy + Mul<Output = T>>(a: &Lanes<T>, s: T) -> Lanes<T> {
        map(a, |x| x * s)
    }

    #[inline]
    pub fn div_scalar<T: Copy + Div<Output = T>>(a: &Lanes<T>, s: T) -> Lanes<T> {
        map(a, |x| x / s)
    }

    /// Same selection rule as `minps`: the second operand wins ties and NaNs.
    #[inline]
    pub fn min<T: Copy + PartialOrd>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| if x < y { x } else { y })
    }

    /// Same selection rule as `maxps`: the second operand wins ties and NaNs.
    #[inline]
    pub fn max<T: Copy + PartialOrd>(a: &Lanes<T>, b: &Lanes<T>) -> Lanes<T> {
        zip(a, b, |x, y| if x > y { x } else { y })
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "sse2"))]
#[allow(unsafe_code)]
mod sse2 {
    use core::arch::x86_64::*;

    use super::Lanes;

    macro_rules! f32_binary {
        ($name:ident, $op:ident) => {
            #[inline]
            pub(super) fn $name(a: &Lanes<f32>, b: &Lanes<f32>) -> Lanes<f32> {
                let mut out = Lanes([0.0_f32; 4]);
                // SAFETY: `Lanes<f32>` is exactly one 16-byte aligned 128-bit block,
                // and SSE2 is statically enabled for this module.
                unsafe {
                    let r = $op(_mm_load_ps(a.0.as_ptr()), _mm_load_ps(b.0.as_ptr()));
                    _mm_store_ps(out.0.as_mut_ptr(), r);
                }
                out
            }
        };
    }

    macro_rules! f32_broadcast {
        ($name:ident, $op:ident) => {
            #[inline]
            pub(super) fn $name(a: &Lanes<f32>, s: f32) -> Lanes<f32> {
                let mut out = Lanes([0.0_f32; 4]);
                // SAFETY: as above.
                unsafe {
                    let r = $op(_mm_load_ps(a.0.as_ptr()), _mm_set1_ps(s));
                    _mm_store_ps(out.0.as_mut_ptr(), r);
                }
                out
            }
        };
    }

    macro_rules! f64_binary {
        ($name:ident, $op:ident) => {
            #[inline]
            pub(super) fn $name(a: &Lanes<f64>, b: &Lanes<f64>) -> Lanes<f64> {
                let mut out = Lanes([0.0_f64; 4]);
                // SAFETY: `Lanes<f64>` is 32 bytes on a 16-byte boundary, so lanes 0..2
                // and 2..4 are each an aligned 128-bit block.
                unsafe {
                    let (pa, pb, po) = (a.0.as_ptr(), b.0.as_ptr(), out.0.as_mut_ptr());
                    _mm_store_pd(po, $op(_mm_load_pd(pa), _mm_load_pd(pb)));
                    _mm_store_pd(
                        po.add(2),
                        $op(_mm_load_pd(pa.add(2)), _mm_load_pd(pb.add(2))),
                    );
                }
                out
            }
        };
    }

    macro_rules! f64_broadcast {
        ($name:ident, $op:ident) => {
            #[inline]
            pub(super) fn $name(a: &Lanes<f64>, s: f64) -> Lanes<f64> {
                let mut out = Lanes([0.0_f64; 4]);
                // SAFETY: as in `f64_binary`.
                unsafe {
                    let (pa, po) = (a.0.as_ptr(), out.0.as_mut_ptr());
                    let s = _mm_set1_pd(s);
                    _mm_store_pd(po, $op(_mm_load_pd(pa), s));
                    _mm_store_pd(po.add(2), $op(_mm_load_pd(pa.add(2)), s));
                }
                out
            }
        };
    }

    f32_binary!(add_f32, _mm_add_ps);
    f32_binary!(sub_f32, _mm_sub_ps);
    f32_binary!(mul_f32, _mm_mul_ps);
    f32_binary!(div_f32, _mm_div_ps);
    f32_binary!(min_f32, _mm_min_ps);
    f32_binary!(max_f32, _mm_max_ps);
    f32_broadcast!(scale_f32, _mm_mul_ps);
    f32_broadcast!(div_scalar_f32, _mm_div_ps);

    f64_binary!(add_f64, _mm_add_pd);
    f64_binary!(sub_f64, _mm_sub_pd);
    f64_binary!(mul_f64, _mm_mul_pd);
    f64_binary!(div_f64, _mm_div_pd);
    f64_binary!(min_f64, _mm_min_pd);
    f64_binary!(max_f64, _mm_max_pd);
    f64_broadcast!(scale_f64, _mm_mul_pd);
    f64_broadcast!(div_scalar_f64, _mm_div_pd);
}

macro_rules! simd_lane_ops {
    ($t:ty, $add:ident, $sub:ident, $mul:ident, $div:ident, $scale:ident, $divs:ident, $min:ident, $max:ident) => {
        #[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "sse2"))]
        impl LaneOps for $t {
            #[inline]
            fn add_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$add(a, b)
            }

            #[inline]
            fn sub_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$sub(a, b)
            }

            #[inline]
            fn mul_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$mul(a, b)
            }

            #[inline]
            fn div_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$div(a, b)
            }

            #[inline]
            fn scale_lanes(a: &Lanes<Self>, s: Self) -> Lanes<Self> {
                sse2::$scale(a, s)
            }

            #[inline]
            fn div_scalar_lanes(a: &Lanes<Self>, s: Self) -> Lanes<Self> {
                sse2::$divs(a, s)
            }

            #[inline]
            fn min_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$min(a, b)
            }

            #[inline]
            fn max_lanes(a: &Lanes<Self>, b: &Lanes<Self>) -> Lanes<Self> {
                sse2::$max(a, b)
            }
        }

        #[cfg(not(all(feature = "simd", target_arch = "x86_64", target_feature = "sse2")))]
        impl LaneOps for $t {}
    };
}

simd_lane_ops!(f32, add_f32, sub_f32, mul_f32, div_f32, scale_f32, div_scalar_f32, min_f32, max_f32);
simd_lane_ops!(f64, add_f64, sub_f64, mul_f64, div_f64, scale_f64, div_scalar_f64, min_f64, max_f64);

impl LaneOps for i32 {}
impl LaneOps for u32 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_are_16_byte_aligned() {
        assert_eq!(std::mem::align_of::<Lanes<f32>>(), 16);
        assert_eq!(std::mem::align_of::<Lanes<f64>>(), 16);
        assert_eq!(std::mem::size_of::<Lanes<f32>>(), 16);
        assert_eq!(std::mem::size_of::<Lanes<f64>>(), 32);
    }

    #[test]
    fn dispatch_matches_scalar_on_fixed_inputs() {
        let a = Lanes([1.5_f32, -2.0, 3.25, 0.0]);
        let b = Lanes([0.5_f32, 4.0, -1.0, 0.0]);
        assert_eq!(f32::add_lanes(&a, &b), scalar::add(&a, &b));
        assert_eq!(f32::mul_lanes(&a, &b), scalar::mul(&a, &b));
        assert_eq!(f32::min_lanes(&a, &b), scalar::min(&a, &b));
        assert_eq!(f32::max_lanes(&a, &b), scalar::max(&a, &b));
        assert_eq!(f32::scale_lanes(&a, 3.0), scalar::scale(&a, 3.0));

        let c = Lanes([1.0_f64, 2.0, 3.0, 4.0]);
        let d = Lanes([4.0_f64, 3.0, 2.0, 1.0]);
        assert_eq!(f64::sub_lanes(&c, &d), Lanes([-3.0, -1.0, 1.0, 3.0]));
        assert_eq!(f64::div_lanes(&c, &d), scalar::div(&c, &d));
        assert_eq!(f64::div_scalar_lanes(&c, 2.0), Lanes([0.5, 1.0, 1.5, 2.0]));
    }

    #[test]
    fn integer_lanes_use_scalar_path() {
        let a = Lanes([7_i32, -3, 0, 0]);
        let b = Lanes([2_i32, 5, 1, 1]);
        assert_eq!(i32::div_lanes(&a, &b), Lanes([3, 0, 0, 0]));
        assert_eq!(i32::min_lanes(&a, &b), Lanes([2, -3, 0, 0]));
    }
}
