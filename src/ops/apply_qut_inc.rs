//! Incremental (hierarchical) composite Q transform dispatch

use crate::check;
use crate::control::{chunks, ApplyQutIncTree, ApplyQutIncVariant, OpFamily};
use crate::error::{Error, Result};
use crate::operand::{Operand, StorageKind};
use crate::ops::{apply_qut, require_storage};

/// Overwrite hierarchical `B` with `Qᴴ·B`, tile by tile
///
/// `b` is a tile-grid view; `u` and `t` are flat, exactly as in
/// [`apply_qut`]. The variant partitions the grid's tile-columns into
/// blocksize chunks (counted in tiles); within a chunk, tiles are visited
/// in ascending row-major order and the child flat tree is invoked on each,
/// forming the composite case of the dispatch recursion. Every tile must have
/// `u.rows()` rows, so the grid's tile size must divide `b`'s row count (a
/// 1×N grid of full-height tiles, or any grid whose tiles span all the rows
/// the reflectors touch).
///
/// An empty grid succeeds with no kernel calls. A failure on one tile
/// leaves earlier tiles transformed.
pub fn apply_qut_inc(
    u: &Operand<'_>,
    t: &Operand<'_>,
    b: &Operand<'_>,
    cntl: &ApplyQutIncTree,
) -> Result<()> {
    check::apply_qut_inc_check(u, t, b)?;
    require_storage(OpFamily::ApplyQutInc, "u", u, StorageKind::Flat)?;
    require_storage(OpFamily::ApplyQutInc, "t", t, StorageKind::Flat)?;
    require_storage(OpFamily::ApplyQutInc, "b", b, cntl.storage())?;

    let Some((grid_rows, grid_cols)) = b.grid() else {
        return Err(Error::invalid_state(
            OpFamily::ApplyQutInc,
            "expected a hierarchical target operand",
        ));
    };
    if grid_rows == 0 || grid_cols == 0 {
        return Ok(());
    }

    let ApplyQutIncVariant::BlockedVar1 { blocksize, sub } = cntl.variant();
    let nb = blocksize.for_dtype(b.dtype());
    for (chunk_start, chunk_len) in chunks(grid_cols, nb) {
        for i in 0..grid_rows {
            for j in chunk_start..chunk_start + chunk_len {
                let Some(tile) = b.tile(i, j) else {
                    return Err(Error::invalid_state(
                        OpFamily::ApplyQutInc,
                        format!("tile ({}, {}) missing from grid", i, j),
                    ));
                };
                if tile.rows() != u.rows() {
                    return Err(Error::shape_mismatch(
                        &[u.rows(), tile.cols()],
                        &[tile.rows(), tile.cols()],
                    ));
                }
                apply_qut(u, t, &tile, sub)?;
            }
        }
    }
    Ok(())
}
