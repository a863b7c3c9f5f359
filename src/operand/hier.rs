//! Hierarchical (tiled) matrix views
//!
//! A [`HierMatrix`] represents a large matrix as a grid of smaller tiles.
//! The grid is a view over one caller-owned flat row-major buffer: each tile
//! is a strided sub-block sharing the parent's row stride, so constructing
//! the grid copies no numeric data.

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::marker::PhantomData;

/// Descriptor of one tile: base pointer plus tile shape and parent stride
pub(crate) struct TileDesc {
    pub(crate) ptr: *mut u8,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) row_stride: usize,
}

/// A tile-grid view over a caller-owned flat buffer
///
/// Both dimensions are partitioned into `tile_size` chunks; the last tile in
/// each direction gets the remainder. Tiles are addressed by grid
/// coordinates in row-major order. The grid never owns the buffer.
pub struct HierMatrix<'a> {
    rows: usize,
    cols: usize,
    tile_size: usize,
    grid_rows: usize,
    grid_cols: usize,
    dtype: DType,
    writable: bool,
    tiles: Vec<TileDesc>,
    _marker: PhantomData<&'a mut [u8]>,
}

fn div_ceil(a: usize, b: usize) -> usize {
    if a == 0 {
        0
    } else {
        (a - 1) / b + 1
    }
}

impl<'a> HierMatrix<'a> {
    fn build<T: Element>(
        ptr: *mut T,
        len: usize,
        rows: usize,
        cols: usize,
        tile_size: usize,
        writable: bool,
    ) -> Result<Self> {
        if tile_size == 0 {
            return Err(Error::invalid_configuration("tile size must be positive"));
        }
        if len < rows * cols {
            return Err(Error::shape_mismatch(&[rows, cols], &[len]));
        }
        let grid_rows = div_ceil(rows, tile_size);
        let grid_cols = div_ceil(cols, tile_size);
        let mut tiles = Vec::with_capacity(grid_rows * grid_cols);
        for ti in 0..grid_rows {
            let row_off = ti * tile_size;
            let tile_rows = tile_size.min(rows - row_off);
            for tj in 0..grid_cols {
                let col_off = tj * tile_size;
                let tile_cols = tile_size.min(cols - col_off);
                // In bounds: row_off < rows and col_off < cols here.
                let offset = row_off * cols + col_off;
                tiles.push(TileDesc {
                    ptr: unsafe { ptr.add(offset) } as *mut u8,
                    rows: tile_rows,
                    cols: tile_cols,
                    row_stride: cols,
                });
            }
        }
        Ok(Self {
            rows,
            cols,
            tile_size,
            grid_rows,
            grid_cols,
            dtype: T::DTYPE,
            writable,
            tiles,
            _marker: PhantomData,
        })
    }

    /// Read-only tile grid over a row-major `rows × cols` buffer
    ///
    /// Fails with [`Error::InvalidConfiguration`] for a zero tile size and
    /// [`Error::ShapeMismatch`] for a short buffer.
    pub fn from_slice<T: Element>(
        data: &'a [T],
        rows: usize,
        cols: usize,
        tile_size: usize,
    ) -> Result<Self> {
        Self::build(
            data.as_ptr() as *mut T,
            data.len(),
            rows,
            cols,
            tile_size,
            false,
        )
    }

    /// Writable tile grid over a row-major `rows × cols` buffer
    pub fn from_slice_mut<T: Element>(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        tile_size: usize,
    ) -> Result<Self> {
        Self::build(data.as_mut_ptr(), data.len(), rows, cols, tile_size, true)
    }

    /// Total rows of the underlying matrix
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total columns of the underlying matrix
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Nominal tile size (last tiles may be smaller)
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Grid dimensions `(grid_rows, grid_cols)` in tiles
    pub fn grid(&self) -> (usize, usize) {
        (self.grid_rows, self.grid_cols)
    }

    /// Element dtype
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Was this grid built over a mutable borrow?
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub(crate) fn tile_desc(&self, i: usize, j: usize) -> Option<&TileDesc> {
        if i >= self.grid_rows || j >= self.grid_cols {
            return None;
        }
        Some(&self.tiles[i * self.grid_cols + j])
    }
}
