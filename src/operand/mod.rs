//! Operand views: logical matrices and vectors over caller-owned memory
//!
//! An [`Operand`] never owns the numeric buffer it describes. It pairs a
//! shape with a runtime dtype tag, a storage kind (flat strided vs.
//! hierarchical tile grid), and a mutability flag. The caller that
//! constructed the view manages the buffer's lifetime; the borrow checker
//! ties the view to that borrow.
//!
//! Flat views are row-major with strides counted in elements. Hierarchical
//! views borrow a [`HierMatrix`] tile grid; individual tiles are exposed as
//! flat views so that child control trees can be invoked on them.

mod hier;

pub use hier::HierMatrix;

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::marker::PhantomData;

/// Storage representation of an operand
///
/// Control nodes carry the same tag; the dispatcher rejects an operand whose
/// representation does not match the node's declared representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One flat strided buffer
    Flat,
    /// A grid of tiles, each tile a flat sub-block
    Hier,
}

/// Flat strided view descriptor: base pointer + row stride in elements
#[derive(Copy, Clone, Debug)]
pub(crate) struct FlatView {
    pub(crate) ptr: *mut u8,
    pub(crate) row_stride: usize,
}

#[derive(Copy, Clone)]
pub(crate) enum OperandData<'a> {
    Flat(FlatView),
    Hier(&'a HierMatrix<'a>),
}

/// A logical matrix or vector view over caller-owned memory
///
/// Operands are cheap to copy (pointer + shape bookkeeping) and are read-only
/// metadata during dispatch; whether the underlying elements may be written
/// is recorded in the `writable` flag and enforced by the parameter
/// validator, not by this type.
pub struct Operand<'a> {
    rows: usize,
    cols: usize,
    dtype: DType,
    writable: bool,
    data: OperandData<'a>,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> Operand<'a> {
    /// Read-only flat view of a row-major `rows × cols` matrix
    ///
    /// Fails with [`Error::ShapeMismatch`] if the slice holds fewer than
    /// `rows * cols` elements.
    pub fn from_slice<T: Element>(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() < rows * cols {
            return Err(Error::shape_mismatch(&[rows, cols], &[data.len()]));
        }
        Ok(Self {
            rows,
            cols,
            dtype: T::DTYPE,
            writable: false,
            data: OperandData::Flat(FlatView {
                ptr: data.as_ptr() as *mut u8,
                row_stride: cols,
            }),
            _marker: PhantomData,
        })
    }

    /// Writable flat view of a row-major `rows × cols` matrix
    pub fn from_slice_mut<T: Element>(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() < rows * cols {
            return Err(Error::shape_mismatch(&[rows, cols], &[data.len()]));
        }
        Ok(Self {
            rows,
            cols,
            dtype: T::DTYPE,
            writable: true,
            data: OperandData::Flat(FlatView {
                ptr: data.as_mut_ptr() as *mut u8,
                row_stride: cols,
            }),
            _marker: PhantomData,
        })
    }

    /// Read-only 1×1 view of a single value
    pub fn scalar<T: Element>(value: &'a T) -> Self {
        Self {
            rows: 1,
            cols: 1,
            dtype: T::DTYPE,
            writable: false,
            data: OperandData::Flat(FlatView {
                ptr: value as *const T as *mut u8,
                row_stride: 1,
            }),
            _marker: PhantomData,
        }
    }

    /// Writable 1×1 view of a single value
    pub fn scalar_mut<T: Element>(value: &'a mut T) -> Self {
        Self {
            rows: 1,
            cols: 1,
            dtype: T::DTYPE,
            writable: true,
            data: OperandData::Flat(FlatView {
                ptr: value as *mut T as *mut u8,
                row_stride: 1,
            }),
            _marker: PhantomData,
        }
    }

    /// Hierarchical view of a tile grid
    ///
    /// The view inherits the grid's writability: a grid built with
    /// [`HierMatrix::from_slice_mut`] yields a writable operand.
    pub fn hier(matrix: &'a HierMatrix<'a>) -> Self {
        Self {
            rows: matrix.rows(),
            cols: matrix.cols(),
            dtype: matrix.dtype(),
            writable: matrix.is_writable(),
            data: OperandData::Hier(matrix),
            _marker: PhantomData,
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Runtime dtype tag
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Storage representation
    pub fn kind(&self) -> StorageKind {
        match self.data {
            OperandData::Flat(_) => StorageKind::Flat,
            OperandData::Hier(_) => StorageKind::Hier,
        }
    }

    /// May the underlying elements be written through this view?
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Is this a 1×1 view?
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Is this a row or column vector (one dimension equal to 1)?
    ///
    /// Scalars and zero-length vectors count as vectors.
    pub fn is_vector(&self) -> bool {
        self.rows <= 1 || self.cols <= 1
    }

    /// Vector length: `rows * cols` (meaningful for vector views)
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Is the view empty (zero rows or zero columns)?
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Tile grid dimensions, or `None` for a flat operand
    pub fn grid(&self) -> Option<(usize, usize)> {
        match self.data {
            OperandData::Flat(_) => None,
            OperandData::Hier(h) => Some(h.grid()),
        }
    }

    /// Flat view of one tile of a hierarchical operand
    ///
    /// Returns `None` for flat operands or out-of-range grid indices. The
    /// tile inherits this operand's writability.
    pub fn tile(&self, i: usize, j: usize) -> Option<Operand<'a>> {
        match self.data {
            OperandData::Flat(_) => None,
            OperandData::Hier(h) => {
                let desc = h.tile_desc(i, j)?;
                Some(Operand {
                    rows: desc.rows,
                    cols: desc.cols,
                    dtype: self.dtype,
                    writable: self.writable,
                    data: OperandData::Flat(FlatView {
                        ptr: desc.ptr,
                        row_stride: desc.row_stride,
                    }),
                    _marker: PhantomData,
                })
            }
        }
    }

    /// Sub-block view `[row_off .. row_off+rows) × [col_off .. col_off+cols)`
    /// of a flat operand
    ///
    /// # Panics
    ///
    /// Panics if the operand is hierarchical or the requested block is out
    /// of bounds. The dispatcher only calls this after partitioning an
    /// in-bounds dimension.
    pub fn sub(&self, row_off: usize, col_off: usize, rows: usize, cols: usize) -> Operand<'a> {
        let flat = match self.data {
            OperandData::Flat(f) => f,
            OperandData::Hier(_) => panic!("sub-blocking requires a flat operand"),
        };
        assert!(
            row_off + rows <= self.rows && col_off + cols <= self.cols,
            "sub-block [{}..{}) x [{}..{}) out of bounds for {}x{} operand",
            row_off,
            row_off + rows,
            col_off,
            col_off + cols,
            self.rows,
            self.cols
        );
        let elem = self.dtype.size_in_bytes();
        let offset = (row_off * flat.row_stride + col_off) * elem;
        Operand {
            rows,
            cols,
            dtype: self.dtype,
            writable: self.writable,
            // Safety of the pointer arithmetic: the bounds check above keeps
            // the sub-block inside the parent view.
            data: OperandData::Flat(FlatView {
                ptr: unsafe { flat.ptr.add(offset) },
                row_stride: flat.row_stride,
            }),
            _marker: PhantomData,
        }
    }

    /// Row-range view of a flat operand (all columns)
    pub fn rows_range(&self, start: usize, len: usize) -> Operand<'a> {
        self.sub(start, 0, len, self.cols)
    }

    /// Column-range view of a flat operand (all rows)
    pub fn cols_range(&self, start: usize, len: usize) -> Operand<'a> {
        self.sub(0, start, self.rows, len)
    }

    /// Row-range view of a vector operand, along whichever dimension is long
    ///
    /// For a column vector this is a row range; for a row vector, a column
    /// range.
    pub fn vec_range(&self, start: usize, len: usize) -> Operand<'a> {
        if self.cols <= 1 {
            self.rows_range(start, len)
        } else {
            self.cols_range(start, len)
        }
    }

    /// Base pointer of a flat operand, typed
    ///
    /// Returns `None` for hierarchical operands. Callers must have verified
    /// `T::DTYPE == self.dtype()`; kernels reached through dispatch have,
    /// via the dtype match.
    pub(crate) fn flat_ptr<T: Element>(&self) -> Option<*mut T> {
        debug_assert_eq!(T::DTYPE, self.dtype);
        match self.data {
            OperandData::Flat(f) => Some(f.ptr as *mut T),
            OperandData::Hier(_) => None,
        }
    }

    /// Row stride in elements of a flat operand
    pub(crate) fn row_stride(&self) -> Option<usize> {
        match self.data {
            OperandData::Flat(f) => Some(f.row_stride),
            OperandData::Hier(_) => None,
        }
    }

    /// Stride between consecutive elements of a vector operand
    ///
    /// 1 for row vectors, the row stride for column vectors.
    pub(crate) fn vec_stride(&self) -> Option<usize> {
        let rs = self.row_stride()?;
        Some(if self.cols <= 1 { rs } else { 1 })
    }
}
