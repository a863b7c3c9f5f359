//! Parameter validation: operand compatibility checks run before dispatch
//!
//! Every front-end operation evaluates a fixed, ordered list of predicates
//! over its operands and short-circuits on the first failure. The failing
//! predicate is reported as [`CheckFailure`], tagged with the invoking
//! operation family in [`Error::Validation`]; the dispatch engine propagates
//! it unchanged and performs no recovery.

use crate::control::OpFamily;
use crate::error::{Error, Result};
use crate::operand::{Operand, StorageKind};
use thiserror::Error;

/// The operand-compatibility predicate that failed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// An output operand is not writable
    #[error("operand is constant (read-only) but the operation writes it")]
    ConstantOperand,
    /// Two operands carry different dtype tags
    #[error("operands have mismatched datatypes")]
    DtypeMismatch,
    /// An operand expected to be 1×1 is not
    #[error("operand is not a scalar")]
    NotScalar,
    /// An operand expected to be a vector has two non-unit dimensions
    #[error("operand is not a vector")]
    NotVector,
    /// Operand storage representation does not match what was expected
    #[error("operand storage representation mismatch")]
    StorageMismatch,
}

type CheckResult = std::result::Result<(), CheckFailure>;

/// Operand must be writable
pub fn nonconstant(a: &Operand<'_>) -> CheckResult {
    if a.is_writable() {
        Ok(())
    } else {
        Err(CheckFailure::ConstantOperand)
    }
}

/// Operands must carry the same dtype tag
pub fn identical_dtype(a: &Operand<'_>, b: &Operand<'_>) -> CheckResult {
    if a.dtype() == b.dtype() {
        Ok(())
    } else {
        Err(CheckFailure::DtypeMismatch)
    }
}

/// Operand must be 1×1
pub fn if_scalar(a: &Operand<'_>) -> CheckResult {
    if a.is_scalar() {
        Ok(())
    } else {
        Err(CheckFailure::NotScalar)
    }
}

/// Operand must have at most one non-unit dimension
pub fn if_vector(a: &Operand<'_>) -> CheckResult {
    if a.is_vector() {
        Ok(())
    } else {
        Err(CheckFailure::NotVector)
    }
}

/// Operand storage representation must match `kind`
pub fn storage_is(a: &Operand<'_>, kind: StorageKind) -> CheckResult {
    if a.kind() == kind {
        Ok(())
    } else {
        Err(CheckFailure::StorageMismatch)
    }
}

fn tag(op: OpFamily) -> impl Fn(CheckFailure) -> Error {
    move |check| Error::validation(op, check)
}

/// Check routine for Householder reflector construction
///
/// Predicates in order: alpha writable, dtypes of alpha/x/tau identical,
/// x and tau writable, x a vector, alpha and tau scalars.
pub fn house2_check(alpha: &Operand<'_>, x: &Operand<'_>, tau: &Operand<'_>) -> Result<()> {
    let tag = tag(OpFamily::Householder);
    nonconstant(alpha).map_err(&tag)?;
    identical_dtype(alpha, x).map_err(&tag)?;
    identical_dtype(alpha, tau).map_err(&tag)?;
    nonconstant(x).map_err(&tag)?;
    nonconstant(tau).map_err(&tag)?;
    if_vector(x).map_err(&tag)?;
    if_scalar(alpha).map_err(&tag)?;
    if_scalar(tau).map_err(&tag)?;
    Ok(())
}

/// Check routine for the triangular solve
///
/// Predicates in order: x writable, dtypes of a/x identical, x a vector.
pub fn trsv_check(a: &Operand<'_>, x: &Operand<'_>) -> Result<()> {
    let tag = tag(OpFamily::Trsv);
    nonconstant(x).map_err(&tag)?;
    identical_dtype(a, x).map_err(&tag)?;
    if_vector(x).map_err(&tag)?;
    Ok(())
}

/// Check routine for applying the composite Q transform
///
/// Predicates in order: b writable, dtypes of u/t/b identical, t a vector.
pub fn apply_qut_check(u: &Operand<'_>, t: &Operand<'_>, b: &Operand<'_>) -> Result<()> {
    let tag = tag(OpFamily::ApplyQut);
    nonconstant(b).map_err(&tag)?;
    identical_dtype(u, b).map_err(&tag)?;
    identical_dtype(u, t).map_err(&tag)?;
    if_vector(t).map_err(&tag)?;
    Ok(())
}

/// Check routine for the incremental (hierarchical) composite Q transform
///
/// Same predicate list as [`apply_qut_check`], tagged with the incremental
/// family so validation errors name the operation the caller invoked.
pub fn apply_qut_inc_check(u: &Operand<'_>, t: &Operand<'_>, b: &Operand<'_>) -> Result<()> {
    let tag = tag(OpFamily::ApplyQutInc);
    nonconstant(b).map_err(&tag)?;
    identical_dtype(u, b).map_err(&tag)?;
    identical_dtype(u, t).map_err(&tag)?;
    if_vector(t).map_err(&tag)?;
    Ok(())
}
