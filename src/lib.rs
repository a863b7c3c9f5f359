//! # lamina
//!
//! **Control-tree driven blocked linear algebra kernels.**
//!
//! lamina implements dense linear algebra operations (Householder
//! reflections, triangular solves, composite Q transforms) as families of
//! algorithmic *variants* selected by per-operation *control trees*. A
//! control tree fixes ahead of time which variant runs at each recursion
//! level and which blocksize partitions the operands there; dispatch walks
//! the tree with no runtime allocation and no heuristic re-evaluation.
//!
//! ## Why control trees?
//!
//! - **Variant selection is data**: blockings and loop orderings are chosen
//!   once at initialization, not re-derived per call
//! - **Uniform recursion**: blocked variants decompose operands into chunks
//!   and invoke child trees on sub-blocks until a micro-kernel base case
//! - **Flat and tiled storage**: the same dispatch engine drives flat
//!   strided views and hierarchical tile grids
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lamina::prelude::*;
//!
//! let env = Environment::with_defaults()?;
//!
//! let a = Operand::from_slice(&lower, n, n)?;
//! let x = Operand::from_slice_mut(&mut rhs, n, 1)?;
//! env.trsv(Diag::NonUnit, &a, &x)?;
//! ```
//!
//! ## Lifecycle
//!
//! Control trees live in an explicit [`Environment`](control::Environment):
//! per-family `init_*` routines register trees in dependency order, the
//! matching `finalize_*` routines remove them in reverse order. Child trees
//! shared by several parents are `Arc`-owned and survive until the last
//! referent drops. Setup and teardown take `&mut self`; a built environment
//! is read-only and can be shared freely.
//!
//! ## Error model
//!
//! Fail-fast: validation and configuration errors abort the whole top-level
//! operation and propagate unchanged. Output chunks written before a
//! failure are NOT rolled back; callers must treat operands passed to a
//! failed operation as clobbered.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod check;
pub mod control;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod operand;
pub mod ops;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::control::{Blocksize, Environment, OpFamily};
    pub use crate::dtype::{Complex64, Complex128, DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::operand::{HierMatrix, Operand, StorageKind};
    pub use crate::ops::{apply_qut, apply_qut_inc, house2, trsv, Diag};
}
