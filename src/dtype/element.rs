//! Element trait for mapping Rust types to DType

use super::{Complex64, Complex128, DType};
use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for types that can be elements of an operand
///
/// This trait connects Rust's type system to lamina's runtime dtype system.
/// It is implemented for exactly the four datatype classes the blocksize
/// policy knows about: `f32`, `f64`, [`Complex64`], [`Complex128`].
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `Add + Sub + Mul + Div + Neg` - Field arithmetic (Output = Self)
///
/// Real-valued helpers (`abs_sq`, `scale`, `from_f64`) let kernels express
/// norm and scaling logic once for both real and complex classes: norms are
/// accumulated in f64 and re-embedded via `from_f64`/`scale`.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + PartialEq
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// One value
    fn one() -> Self;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Squared magnitude |x|² as f64
    fn abs_sq(self) -> f64;

    /// Embed a real value (imaginary part zero for complex types)
    fn from_f64(v: f64) -> Self;

    /// Multiply by a real scalar
    fn scale(self, s: f64) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        let v = self as f64;
        v * v
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        (self as f64 * s) as f32
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self * self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;

    #[inline]
    fn one() -> Self {
        Complex64::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.magnitude_squared() as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex64::new(v as f32, 0.0)
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        Complex64::new((self.re as f64 * s) as f32, (self.im as f64 * s) as f32)
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn one() -> Self {
        Complex128::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex128::conj(self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.magnitude_squared()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex128::new(v, 0.0)
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        Complex128::new(self.re * s, self.im * s)
    }
}
