//! Operation front-ends and variant dispatchers
//!
//! Every front-end follows the same step order: validate operands, confirm
//! operand/control-node storage agreement, then switch exhaustively on the
//! node's variant. Blocked variants partition the
//! relevant dimension by the node's blocksize (last chunk gets the
//! remainder) and process chunks sequentially in ascending order, because
//! later sub-blocks may depend on earlier updates. The first error aborts
//! remaining chunks and propagates unchanged.
//!
//! Zero-sized dimensions are immediate successes with no kernel calls.
//! Writes performed by chunks that completed before a failure are not
//! rolled back.

mod apply_qut;
mod apply_qut_inc;
mod house;
mod trsv;

pub use apply_qut::apply_qut;
pub use apply_qut_inc::apply_qut_inc;
pub use house::house2;
pub use trsv::trsv;

use crate::control::OpFamily;
use crate::error::{Error, Result};
use crate::operand::{Operand, StorageKind};

/// Diagonal handling for triangular solves
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Diag {
    /// Divide by the stored diagonal entries
    NonUnit,
    /// Treat diagonal entries as 1 (do not read them)
    Unit,
}

/// Reject an operand whose representation differs from what the control
/// node dispatches over
pub(crate) fn require_storage(
    op: OpFamily,
    name: &'static str,
    operand: &Operand<'_>,
    expected: StorageKind,
) -> Result<()> {
    if operand.kind() == expected {
        Ok(())
    } else {
        Err(Error::invalid_state(
            op,
            format!(
                "operand '{}' has {:?} storage but the control node expects {:?}",
                name,
                operand.kind(),
                expected
            ),
        ))
    }
}
