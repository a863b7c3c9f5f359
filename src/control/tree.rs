//! Per-family control node types
//!
//! Each operation family gets a root node type pairing a storage tag with a
//! closed variant enum. Blocked variants carry the blocksize policy that
//! partitions their operands; composite variants additionally carry the
//! child tree they invoke on sub-blocks. Children are `Arc`-shared: a child
//! tree registered once may be referenced by several parents and survives
//! until the last referent is dropped.
//!
//! Nodes are immutable after construction. Variant selection at dispatch
//! time is a pure exhaustive match, never a heuristic.

use crate::control::Blocksize;
use crate::error::{Error, Result};
use crate::operand::StorageKind;
use std::sync::Arc;

/// Control tree for Householder reflector construction
///
/// A base operation: the single variant invokes the unblocked kernel
/// directly and never recurses.
#[derive(Clone, Debug)]
pub struct HouseTree {
    storage: StorageKind,
    variant: HouseVariant,
}

/// Algorithmic variants for Householder construction
#[derive(Copy, Clone, Debug)]
pub enum HouseVariant {
    /// Unblocked UT-convention reflector construction
    UnbUt,
}

impl HouseTree {
    /// Create a Householder control node
    pub fn new(storage: StorageKind, variant: HouseVariant) -> Self {
        Self { storage, variant }
    }

    /// Declared operand storage representation
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Selected variant
    pub fn variant(&self) -> HouseVariant {
        self.variant
    }
}

/// Control tree for the triangular solve
#[derive(Clone, Debug)]
pub struct TrsvTree {
    storage: StorageKind,
    variant: TrsvVariant,
}

/// Algorithmic variants for the triangular solve
///
/// Both blocked variants partition the solve dimension and delegate the
/// diagonal block to `sub`; they differ in when the off-diagonal update is
/// applied relative to the block solve.
#[derive(Clone, Debug)]
pub enum TrsvVariant {
    /// Column-oriented forward substitution, no recursion
    Unblocked,
    /// Lazy: apply all pending updates to a chunk, then solve it
    BlockedVar1 {
        /// Partition sizes per dtype class
        blocksize: Arc<Blocksize>,
        /// Tree solving the diagonal block
        sub: Arc<TrsvTree>,
    },
    /// Eager: solve a chunk, then immediately update the trailing part
    BlockedVar2 {
        /// Partition sizes per dtype class
        blocksize: Arc<Blocksize>,
        /// Tree solving the diagonal block
        sub: Arc<TrsvTree>,
    },
}

impl TrsvTree {
    /// Create a triangular solve control node
    pub fn new(storage: StorageKind, variant: TrsvVariant) -> Self {
        Self { storage, variant }
    }

    /// Declared operand storage representation
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Selected variant
    pub fn variant(&self) -> &TrsvVariant {
        &self.variant
    }
}

/// Control tree for applying the composite Q transform
#[derive(Clone, Debug)]
pub struct ApplyQutTree {
    storage: StorageKind,
    variant: ApplyQutVariant,
}

/// Algorithmic variants for the composite Q transform
#[derive(Clone, Debug)]
pub enum ApplyQutVariant {
    /// Apply reflectors one at a time across the full target
    Unblocked,
    /// Partition the target's columns and recurse per panel
    BlockedVar1 {
        /// Partition sizes per dtype class
        blocksize: Arc<Blocksize>,
        /// Tree applied to each column panel
        sub: Arc<ApplyQutTree>,
    },
}

impl ApplyQutTree {
    /// Create an apply-Q control node
    pub fn new(storage: StorageKind, variant: ApplyQutVariant) -> Self {
        Self { storage, variant }
    }

    /// Declared operand storage representation
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Selected variant
    pub fn variant(&self) -> &ApplyQutVariant {
        &self.variant
    }
}

/// Control tree for the incremental (hierarchical) composite Q transform
///
/// The blocked variant walks the target's tile grid and invokes the child
/// flat [`ApplyQutTree`] per tile, so the child's storage tag must be
/// [`StorageKind::Flat`]; the constructor enforces this.
#[derive(Clone, Debug)]
pub struct ApplyQutIncTree {
    storage: StorageKind,
    variant: ApplyQutIncVariant,
}

/// Algorithmic variants for the incremental composite Q transform
#[derive(Clone, Debug)]
pub enum ApplyQutIncVariant {
    /// Partition the tile grid's columns; per tile, invoke the child tree
    BlockedVar1 {
        /// Partition sizes per dtype class, counted in tiles
        blocksize: Arc<Blocksize>,
        /// Flat tree invoked on each tile
        sub: Arc<ApplyQutTree>,
    },
}

impl ApplyQutIncTree {
    /// Create an incremental apply-Q control node
    ///
    /// Fails with [`Error::InvalidConfiguration`] if the child tree of a
    /// blocked variant is not a flat tree: tiles handed to it are flat
    /// views.
    pub fn new(storage: StorageKind, variant: ApplyQutIncVariant) -> Result<Self> {
        let ApplyQutIncVariant::BlockedVar1 { ref sub, .. } = variant;
        if sub.storage() != StorageKind::Flat {
            return Err(Error::invalid_configuration(
                "apply_qut_inc child tree must use flat storage",
            ));
        }
        Ok(Self { storage, variant })
    }

    /// Declared operand storage representation
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Selected variant
    pub fn variant(&self) -> &ApplyQutIncVariant {
        &self.variant
    }
}
