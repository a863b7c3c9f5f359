//! Composite Q transform front-end and blocked dispatch

use crate::check;
use crate::control::{chunks, ApplyQutTree, ApplyQutVariant, OpFamily};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernel;
use crate::operand::Operand;
use crate::ops::require_storage;

/// Overwrite `B` with `Qᴴ·B`
///
/// `Q` is the composite of k UT Householder reflectors: reflector j lives
/// in column j of the unit-lower-trapezoidal m×k matrix `u` (implicit unit
/// head on the diagonal, tail below it) with its τ scalar in `t[j]`.
/// Reflectors are applied in ascending order, which is Qᴴ for Q = H₀·…·Hₖ₋₁
/// (each Hⱼ is Hermitian).
///
/// The blocked variant partitions `b`'s columns by the node's blocksize and
/// recurses on the child tree per panel; columns are independent, so blocked
/// and unblocked dispatch produce bit-for-bit equal results.
///
/// k = 0 or an empty `b` succeeds with no kernel calls.
pub fn apply_qut(
    u: &Operand<'_>,
    t: &Operand<'_>,
    b: &Operand<'_>,
    cntl: &ApplyQutTree,
) -> Result<()> {
    check::apply_qut_check(u, t, b)?;
    require_storage(OpFamily::ApplyQut, "u", u, cntl.storage())?;
    require_storage(OpFamily::ApplyQut, "t", t, cntl.storage())?;
    require_storage(OpFamily::ApplyQut, "b", b, cntl.storage())?;

    if u.rows() != b.rows() {
        return Err(Error::shape_mismatch(
            &[u.rows(), b.cols()],
            &[b.rows(), b.cols()],
        ));
    }
    if t.len() != u.cols() {
        return Err(Error::shape_mismatch(&[u.cols()], &[t.len()]));
    }
    if u.cols() > u.rows() {
        return Err(Error::shape_mismatch(
            &[u.rows(), u.rows()],
            &[u.rows(), u.cols()],
        ));
    }
    if u.cols() == 0 || b.cols() == 0 || b.rows() == 0 {
        return Ok(());
    }

    match u.dtype() {
        DType::F32 => apply_qut_impl::<f32>(u, t, b, cntl),
        DType::F64 => apply_qut_impl::<f64>(u, t, b, cntl),
        DType::Complex64 => apply_qut_impl::<crate::dtype::Complex64>(u, t, b, cntl),
        DType::Complex128 => apply_qut_impl::<crate::dtype::Complex128>(u, t, b, cntl),
    }
}

fn apply_qut_impl<T: Element>(
    u: &Operand<'_>,
    t: &Operand<'_>,
    b: &Operand<'_>,
    cntl: &ApplyQutTree,
) -> Result<()> {
    match cntl.variant() {
        ApplyQutVariant::Unblocked => {
            let m = u.rows();
            let k = u.cols();
            let (Some(u_ptr), Some(ldu), Some(t_ptr), Some(inct), Some(b_ptr), Some(ldb)) = (
                u.flat_ptr::<T>(),
                u.row_stride(),
                t.flat_ptr::<T>(),
                t.vec_stride(),
                b.flat_ptr::<T>(),
                b.row_stride(),
            ) else {
                return Err(Error::invalid_state(
                    OpFamily::ApplyQut,
                    "expected flat operands",
                ));
            };
            for j in 0..k {
                // Reflector j: unit head at (j, j), tail in rows j+1..m of
                // column j. The kernel sees b shifted down to row j. The
                // last reflector of a square U has an empty tail; its offset
                // would land outside the allocation, so wrapping_add keeps
                // the never-read pointer well defined.
                //
                // Safety: j < k <= m keeps every dereferenced access in
                // bounds of the verified shapes; u/t are read-only and
                // disjoint from b.
                unsafe {
                    let u2 = u_ptr.wrapping_add((j + 1) * ldu + j);
                    let tau = *t_ptr.add(j * inct);
                    kernel::apply_hv(
                        u2,
                        m - j - 1,
                        ldu,
                        tau,
                        b_ptr.add(j * ldb),
                        b.cols(),
                        ldb,
                    );
                }
            }
            Ok(())
        }
        ApplyQutVariant::BlockedVar1 { blocksize, sub } => {
            let nb = blocksize.for_dtype(T::DTYPE);
            for (start, len) in chunks(b.cols(), nb) {
                apply_qut(u, t, &b.cols_range(start, len), sub)?;
            }
            Ok(())
        }
    }
}
