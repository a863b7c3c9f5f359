//! Data type system for lamina operands
//!
//! This module provides the `DType` enum representing the four supported
//! element classes, the `Element` trait bridging concrete Rust types to the
//! runtime tag, and the complex number types.
//!
//! The four classes mirror the blocksize policy: a policy carries one chunk
//! size per class, and the dispatcher selects the size via the operand's
//! runtime tag.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::Element;

use std::fmt;

/// Data types supported by lamina operands
///
/// This enum represents the element type of an operand at runtime.
/// Using an enum (rather than only generics) allows:
/// - Runtime datatype-compatibility checks across operands
/// - Per-class blocksize selection inside control trees
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit float (single real)
    F32,
    /// 64-bit float (double real)
    F64,
    /// 64-bit complex (2 × f32, single complex)
    Complex64,
    /// 128-bit complex (2 × f64, double complex)
    Complex128,
}

impl DType {
    /// Size of one element in bytes
    pub const fn size_in_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::Complex64 => 8,
            DType::Complex128 => 16,
        }
    }

    /// Is this a complex class?
    pub const fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    /// Is this a double-precision class (F64 or Complex128)?
    pub const fn is_double_precision(self) -> bool {
        matches!(self, DType::F64 | DType::Complex128)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::Complex64.size_in_bytes(), 8);
        assert_eq!(DType::Complex128.size_in_bytes(), 16);
    }

    #[test]
    fn test_class_queries() {
        assert!(!DType::F32.is_complex());
        assert!(DType::Complex64.is_complex());
        assert!(DType::F64.is_double_precision());
        assert!(!DType::Complex64.is_double_precision());
    }
}
