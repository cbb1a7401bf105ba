//! Error type for the checked operations.
//!
//! The default operations never fail: they either take a documented
//! fallback (zero vector, identity, unchanged input) or let IEEE-754
//! infinities and NaNs propagate. The `checked_*`/`try_*` variants report
//! those cases with [`MathError`] instead.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// A divisor (component, scalar or squared length) was exactly zero.
    DivisionByZero,
    /// The input has no meaningful direction or rotation, e.g. a vector
    /// shorter than epsilon or a zero quaternion.
    DegenerateInput,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivisionByZero => write!(f, "division by zero"),
            MathError::DegenerateInput => write!(f, "degenerate input"),
        }
    }
}

impl std::error::Error for MathError {}
