//! Blocksize policy: per-dtype-class chunk sizes for blocked variants

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Chunk sizes used to partition a dimension during blocked dispatch
///
/// A policy carries one size per datatype class (single/double real,
/// single/double complex). The dispatcher selects the size via the operand's
/// runtime dtype tag. Policies are pure data: created once during control
/// tree initialization, immutable thereafter, and shared across control
/// nodes through `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blocksize {
    f32: usize,
    f64: usize,
    complex64: usize,
    complex128: usize,
}

impl Blocksize {
    /// Create a policy with one chunk size per datatype class
    ///
    /// All sizes must be positive; a zero size cannot partition anything and
    /// is rejected with [`Error::InvalidConfiguration`].
    pub fn new(f32: usize, f64: usize, complex64: usize, complex128: usize) -> Result<Self> {
        for (class, size) in [
            ("f32", f32),
            ("f64", f64),
            ("complex64", complex64),
            ("complex128", complex128),
        ] {
            if size == 0 {
                return Err(Error::invalid_configuration(format!(
                    "blocksize for {} must be positive",
                    class
                )));
            }
        }
        Ok(Self {
            f32,
            f64,
            complex64,
            complex128,
        })
    }

    /// Create a policy using the same chunk size for every datatype class
    pub fn uniform(size: usize) -> Result<Self> {
        Self::new(size, size, size, size)
    }

    /// Chunk size for one datatype class
    pub fn for_dtype(&self, dtype: DType) -> usize {
        match dtype {
            DType::F32 => self.f32,
            DType::F64 => self.f64,
            DType::Complex64 => self.complex64,
            DType::Complex128 => self.complex128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            Blocksize::new(8, 0, 8, 8),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_uniform_and_query() {
        let bs = Blocksize::uniform(16).unwrap();
        assert_eq!(bs.for_dtype(DType::F32), 16);
        assert_eq!(bs.for_dtype(DType::Complex128), 16);

        let bs = Blocksize::new(1, 2, 3, 4).unwrap();
        assert_eq!(bs.for_dtype(DType::F64), 2);
        assert_eq!(bs.for_dtype(DType::Complex64), 3);
    }
}
