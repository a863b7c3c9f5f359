//! Householder reflector construction front-end

use crate::check;
use crate::control::{HouseTree, HouseVariant, OpFamily};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernel;
use crate::operand::Operand;
use crate::ops::require_storage;

/// Construct a UT Householder reflector in place
///
/// On entry `alpha` (1×1) holds χ and `x` the tail of the vector [χ; x]; on
/// return `alpha` holds β, `x` the reflector tail u₂ and `tau` the UT scalar
/// τ, such that `H = I − (1/τ)·u·uᴴ` with `u = [1; u₂]` maps [χ; x] to
/// [β; 0]. All three operands must be writable, flat, and share one dtype.
///
/// A base operation: the control tree's single variant invokes the
/// unblocked kernel with no recursion.
pub fn house2(
    alpha: &Operand<'_>,
    x: &Operand<'_>,
    tau: &Operand<'_>,
    cntl: &HouseTree,
) -> Result<()> {
    check::house2_check(alpha, x, tau)?;
    require_storage(OpFamily::Householder, "alpha", alpha, cntl.storage())?;
    require_storage(OpFamily::Householder, "x", x, cntl.storage())?;
    require_storage(OpFamily::Householder, "tau", tau, cntl.storage())?;

    match alpha.dtype() {
        DType::F32 => house2_impl::<f32>(alpha, x, tau, cntl),
        DType::F64 => house2_impl::<f64>(alpha, x, tau, cntl),
        DType::Complex64 => house2_impl::<crate::dtype::Complex64>(alpha, x, tau, cntl),
        DType::Complex128 => house2_impl::<crate::dtype::Complex128>(alpha, x, tau, cntl),
    }
}

fn house2_impl<T: Element>(
    alpha: &Operand<'_>,
    x: &Operand<'_>,
    tau: &Operand<'_>,
    cntl: &HouseTree,
) -> Result<()> {
    let (Some(alpha_ptr), Some(x_ptr), Some(x_stride), Some(tau_ptr)) = (
        alpha.flat_ptr::<T>(),
        x.flat_ptr::<T>(),
        x.vec_stride(),
        tau.flat_ptr::<T>(),
    ) else {
        return Err(Error::invalid_state(
            OpFamily::Householder,
            "expected flat operands",
        ));
    };

    match cntl.variant() {
        HouseVariant::UnbUt => {
            // Safety: the views were constructed over live caller borrows
            // with verified shapes; house2 operands never alias.
            unsafe { kernel::house2_unb(alpha_ptr, x_ptr, x.len(), x_stride, tau_ptr) };
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::StorageKind;

    fn flat_tree() -> HouseTree {
        HouseTree::new(StorageKind::Flat, HouseVariant::UnbUt)
    }

    #[test]
    fn test_house2_writes_beta_and_tau() {
        let mut alpha = 3.0f64;
        let mut x = vec![4.0f64];
        let mut tau = 0.0f64;
        let a_op = Operand::scalar_mut(&mut alpha);
        let x_op = Operand::from_slice_mut(&mut x, 1, 1).unwrap();
        let t_op = Operand::scalar_mut(&mut tau);
        house2(&a_op, &x_op, &t_op, &flat_tree()).unwrap();
        drop((a_op, x_op, t_op));
        assert!((alpha + 5.0).abs() < 1e-14);
        assert!((tau - 0.625).abs() < 1e-14);
        assert!((x[0] - 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_house2_readonly_output_rejected() {
        let alpha = 3.0f64;
        let mut x = vec![4.0f64];
        let mut tau = 0.0f64;
        let a_op = Operand::scalar(&alpha);
        let x_op = Operand::from_slice_mut(&mut x, 1, 1).unwrap();
        let t_op = Operand::scalar_mut(&mut tau);
        assert!(matches!(
            house2(&a_op, &x_op, &t_op, &flat_tree()),
            Err(Error::Validation { .. })
        ));
    }
}
