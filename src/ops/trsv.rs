//! Triangular solve front-end and blocked dispatch

use crate::check;
use crate::control::{chunks, OpFamily, TrsvTree, TrsvVariant};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernel;
use crate::operand::Operand;
use crate::ops::{require_storage, Diag};

/// Solve `L·x = b` in place (lower triangle, not transposed)
///
/// `a` is an n×n flat view whose lower triangle is referenced; `x` enters
/// holding b and leaves holding the solution. `Diag::Unit` treats the
/// diagonal as 1 without reading it.
///
/// Blocked variants partition the solve dimension by the node's blocksize
/// and recurse on the child tree for each diagonal block; chunks are
/// processed ascending because each depends on the previously solved ones.
/// The arithmetic sequence per element is identical across variants, so
/// blocked and unblocked dispatch produce bit-for-bit equal results.
///
/// An n = 0 system succeeds with no kernel calls. On failure partway
/// through, already-solved leading chunks keep their values.
pub fn trsv(diag: Diag, a: &Operand<'_>, x: &Operand<'_>, cntl: &TrsvTree) -> Result<()> {
    check::trsv_check(a, x)?;
    require_storage(OpFamily::Trsv, "a", a, cntl.storage())?;
    require_storage(OpFamily::Trsv, "x", x, cntl.storage())?;

    if a.rows() != a.cols() {
        return Err(Error::shape_mismatch(
            &[a.rows(), a.rows()],
            &[a.rows(), a.cols()],
        ));
    }
    if x.len() != a.rows() {
        return Err(Error::shape_mismatch(&[a.rows()], &[x.len()]));
    }
    if a.rows() == 0 {
        return Ok(());
    }

    match a.dtype() {
        DType::F32 => trsv_impl::<f32>(diag, a, x, cntl),
        DType::F64 => trsv_impl::<f64>(diag, a, x, cntl),
        DType::Complex64 => trsv_impl::<crate::dtype::Complex64>(diag, a, x, cntl),
        DType::Complex128 => trsv_impl::<crate::dtype::Complex128>(diag, a, x, cntl),
    }
}

fn trsv_impl<T: Element>(
    diag: Diag,
    a: &Operand<'_>,
    x: &Operand<'_>,
    cntl: &TrsvTree,
) -> Result<()> {
    let n = a.rows();
    let (Some(a_ptr), Some(lda), Some(x_ptr), Some(incx)) = (
        a.flat_ptr::<T>(),
        a.row_stride(),
        x.flat_ptr::<T>(),
        x.vec_stride(),
    ) else {
        return Err(Error::invalid_state(OpFamily::Trsv, "expected flat operands"));
    };

    match cntl.variant() {
        TrsvVariant::Unblocked => {
            // Safety: shapes were verified by the front-end; a and x are
            // disjoint caller buffers.
            unsafe {
                kernel::trsv_ln_unb(diag == Diag::Unit, a_ptr, lda, n, x_ptr, incx);
            }
            Ok(())
        }
        TrsvVariant::BlockedVar1 { blocksize, sub } => {
            let nb = blocksize.for_dtype(T::DTYPE);
            for (start, len) in chunks(n, nb) {
                let x1 = x.vec_range(start, len);
                if start > 0 {
                    // Lazy: apply every pending update from the already
                    // solved leading chunks before solving this one.
                    let a10 = a.sub(start, 0, len, start);
                    let x0 = x.vec_range(0, start);
                    panel_update::<T>(&a10, &x0, &x1)?;
                }
                trsv(diag, &a.sub(start, start, len, len), &x1, sub)?;
            }
            Ok(())
        }
        TrsvVariant::BlockedVar2 { blocksize, sub } => {
            let nb = blocksize.for_dtype(T::DTYPE);
            for (start, len) in chunks(n, nb) {
                let x1 = x.vec_range(start, len);
                trsv(diag, &a.sub(start, start, len, len), &x1, sub)?;
                let trailing = n - start - len;
                if trailing > 0 {
                    // Eager: push this chunk's contribution into the
                    // trailing part of x right away.
                    let a21 = a.sub(start + len, start, trailing, len);
                    let x2 = x.vec_range(start + len, trailing);
                    panel_update::<T>(&a21, &x1, &x2)?;
                }
            }
            Ok(())
        }
    }
}

/// `y := y − A·x` over flat panel views (column-ordered micro-kernel call)
fn panel_update<T: Element>(a: &Operand<'_>, x: &Operand<'_>, y: &Operand<'_>) -> Result<()> {
    let (Some(a_ptr), Some(lda), Some(x_ptr), Some(incx), Some(y_ptr), Some(incy)) = (
        a.flat_ptr::<T>(),
        a.row_stride(),
        x.flat_ptr::<T>(),
        x.vec_stride(),
        y.flat_ptr::<T>(),
        y.vec_stride(),
    ) else {
        return Err(Error::invalid_state(OpFamily::Trsv, "expected flat operands"));
    };
    // Safety: the sub-block views are in bounds of the parent operands and
    // x/y are disjoint ranges of the solve vector.
    unsafe {
        kernel::gemv_sub(a_ptr, lda, a.rows(), a.cols(), x_ptr, incx, y_ptr, incy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Blocksize;
    use crate::operand::StorageKind;
    use std::sync::Arc;

    fn unblocked() -> Arc<TrsvTree> {
        Arc::new(TrsvTree::new(StorageKind::Flat, TrsvVariant::Unblocked))
    }

    fn blocked_var1(nb: usize) -> TrsvTree {
        TrsvTree::new(
            StorageKind::Flat,
            TrsvVariant::BlockedVar1 {
                blocksize: Arc::new(Blocksize::uniform(nb).unwrap()),
                sub: unblocked(),
            },
        )
    }

    #[test]
    fn test_blocked_solve_known_values() {
        // L = [[2,0,0],[1,3,0],[0,1,4]], b = [2, 7, 11] => x = [1, 2, 9/4].
        let a = vec![2.0f64, 0.0, 0.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0];
        let mut x = vec![2.0f64, 7.0, 11.0];
        let a_op = Operand::from_slice(&a, 3, 3).unwrap();
        let x_op = Operand::from_slice_mut(&mut x, 3, 1).unwrap();
        trsv(Diag::NonUnit, &a_op, &x_op, &blocked_var1(2)).unwrap();
        drop(x_op);
        assert_eq!(x, vec![1.0, 2.0, 2.25]);
    }

    #[test]
    fn test_non_square_rejected() {
        let a = vec![1.0f64; 6];
        let mut x = vec![1.0f64; 2];
        let a_op = Operand::from_slice(&a, 2, 3).unwrap();
        let x_op = Operand::from_slice_mut(&mut x, 2, 1).unwrap();
        assert!(matches!(
            trsv(Diag::NonUnit, &a_op, &x_op, &blocked_var1(2)),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_dimension_noop() {
        let a: Vec<f64> = vec![];
        let mut x: Vec<f64> = vec![];
        let a_op = Operand::from_slice(&a, 0, 0).unwrap();
        let x_op = Operand::from_slice_mut(&mut x, 0, 1).unwrap();
        trsv(Diag::NonUnit, &a_op, &x_op, &blocked_var1(4)).unwrap();
    }
}
