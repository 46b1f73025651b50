//! Core types shared across the Resonant update engine.
//!
//! Field and polarization arrays are generic over their element type so the
//! same kernels serve both real-valued time-domain runs (`f64`) and complex
//! time-harmonic runs (`Complex64`). Real runs never allocate or iterate an
//! imaginary part.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use num_complex::Complex64;

/// Element type of field and polarization arrays.
///
/// Coefficients (couplings, inverse permittivity) are always real, so the
/// only scalar product the kernels need is `Self * f64`.
pub trait FieldScalar:
    Copy
    + Default
    + PartialEq
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + AddAssign
    + SubAssign
    + 'static
{
    /// Lift a real value into this representation.
    fn from_real(x: f64) -> Self;

    /// Real and imaginary parts.
    fn parts(self) -> [f64; 2];

    /// Whether an imaginary part is stored at all.
    const IS_COMPLEX: bool;
}

impl FieldScalar for f64 {
    fn from_real(x: f64) -> Self {
        x
    }

    fn parts(self) -> [f64; 2] {
        [self, 0.0]
    }

    const IS_COMPLEX: bool = false;
}

impl FieldScalar for Complex64 {
    fn from_real(x: f64) -> Self {
        Complex64::new(x, 0.0)
    }

    fn parts(self) -> [f64; 2] {
        [self.re, self.im]
    }

    const IS_COMPLEX: bool = true;
}
