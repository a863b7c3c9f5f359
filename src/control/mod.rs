//! Control trees: blocksize policies, per-operation variant nodes, and the
//! registry that owns them
//!
//! Each operation family (triangular solve, Householder construction, ...)
//! is implemented by one or more algorithmic variants. A control tree fixes,
//! ahead of time, which variant runs at each recursion level and which
//! blocksize partitions the operands at that level. Trees are built once by
//! the per-family `init` routines on [`Environment`], are immutable while
//! dispatch reads them, and are torn down by the matching `finalize`
//! routines.
//!
//! # Architecture
//!
//! ```text
//! Environment (registry)
//! ├── Blocksize (per-dtype-class chunk sizes, Arc-shared)
//! ├── HouseTree / TrsvTree / ApplyQutTree / ApplyQutIncTree (variant nodes)
//! └── init_* / finalize_* lifecycle (dependency-ordered)
//! ```

mod blocksize;
mod registry;
mod tree;

pub use blocksize::Blocksize;
pub use registry::Environment;
pub use tree::{
    ApplyQutIncTree, ApplyQutIncVariant, ApplyQutTree, ApplyQutVariant, HouseTree, HouseVariant,
    TrsvTree, TrsvVariant,
};

use std::fmt;

/// Operation families with registered control trees
///
/// A family is a named mathematical transformation; each family has one or
/// more algorithmic variants encoded in its control tree type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpFamily {
    /// Householder reflector construction
    Householder,
    /// Triangular solve (lower, non-transposed)
    Trsv,
    /// Apply composite Q transform (UT Householder block)
    ApplyQut,
    /// Apply composite Q transform incrementally over a tile grid
    ApplyQutInc,
}

impl fmt::Display for OpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpFamily::Householder => "householder",
            OpFamily::Trsv => "trsv",
            OpFamily::ApplyQut => "apply_qut",
            OpFamily::ApplyQutInc => "apply_qut_inc",
        };
        write!(f, "{}", name)
    }
}

/// Partition a dimension into blocksize chunks
///
/// Yields `(start, len)` pairs in ascending order. Every chunk has
/// `len == blocksize` except possibly the last, which gets the remainder
/// (`min(blocksize, total - start)`). A zero `total` yields nothing.
///
/// Chunk order is part of the dispatch contract: blocked variants process
/// chunks sequentially in ascending index order because later sub-blocks may
/// depend on earlier updates.
pub fn chunks(total: usize, blocksize: usize) -> Chunks {
    debug_assert!(blocksize > 0);
    Chunks {
        next: 0,
        total,
        blocksize,
    }
}

/// Iterator over `(start, len)` chunks of a partitioned dimension
///
/// Created by [`chunks`].
#[derive(Clone, Debug)]
pub struct Chunks {
    next: usize,
    total: usize,
    blocksize: usize,
}

impl Iterator for Chunks {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.next >= self.total {
            return None;
        }
        let start = self.next;
        let len = self.blocksize.min(self.total - start);
        self.next = start + len;
        Some((start, len))
    }
}
