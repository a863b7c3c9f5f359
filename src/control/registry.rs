//! Environment: the control tree registry and its lifecycle
//!
//! The control tree table is an explicit [`Environment`] value rather than
//! process-wide global state, so independent instances can coexist (tests
//! build throwaway environments).
//! Setup and teardown take `&mut self`; dispatch only reads, so a built
//! environment can be shared across threads.
//!
//! Trees are registered per `(operation family, storage representation)` key
//! by `init_*` routines and removed by the matching `finalize_*` routines.
//! Registration order follows dependencies: a parent family's init fails
//! with [`Error::PreconditionViolation`] until the child family it
//! references has been registered. Finalizing a child family only removes
//! the registry entry; parents holding an `Arc` to the child tree keep it
//! alive.

use crate::control::{
    ApplyQutIncTree, ApplyQutIncVariant, ApplyQutTree, ApplyQutVariant, Blocksize, HouseTree,
    HouseVariant, OpFamily, TrsvTree, TrsvVariant,
};
use crate::error::{Error, Result};
use crate::operand::{Operand, StorageKind};
use crate::ops::{self, Diag};
use std::collections::HashMap;
use std::sync::Arc;

/// Default chunk sizes for flat blocked trees: register-friendly panels,
/// halved for complex classes (an element is twice as wide).
const DEFAULT_BLOCKSIZE_REAL: usize = 128;
const DEFAULT_BLOCKSIZE_COMPLEX: usize = 64;

/// A registered root control tree
enum CntlEntry {
    Householder(Arc<HouseTree>),
    Trsv(Arc<TrsvTree>),
    ApplyQut(Arc<ApplyQutTree>),
    ApplyQutInc(Arc<ApplyQutIncTree>),
}

/// Registry mapping `(operation family, storage representation)` to root
/// control trees, with explicit init/finalize lifecycle
///
/// See the [module docs](self) for the lifecycle contract.
#[derive(Default)]
pub struct Environment {
    entries: HashMap<(OpFamily, StorageKind), CntlEntry>,
}

impl Environment {
    /// Create an empty environment with no registered trees
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment with the full default catalog registered
    pub fn with_defaults() -> Result<Self> {
        let mut env = Self::new();
        env.init_all()?;
        Ok(env)
    }

    /// Is a tree registered for this family and representation?
    pub fn is_initialized(&self, family: OpFamily, storage: StorageKind) -> bool {
        self.entries.contains_key(&(family, storage))
    }

    /// Register the whole catalog in dependency order
    pub fn init_all(&mut self) -> Result<()> {
        self.init_householder()?;
        self.init_trsv()?;
        self.init_apply_qut()?;
        self.init_apply_qut_inc()?;
        Ok(())
    }

    /// Remove the whole catalog in reverse dependency order
    pub fn finalize_all(&mut self) -> Result<()> {
        self.finalize_apply_qut_inc()?;
        self.finalize_apply_qut()?;
        self.finalize_trsv()?;
        self.finalize_householder()?;
        Ok(())
    }

    fn insert(&mut self, family: OpFamily, storage: StorageKind, entry: CntlEntry) -> Result<()> {
        if self.entries.contains_key(&(family, storage)) {
            return Err(Error::precondition(format!(
                "control tree for '{}' is already initialized",
                family
            )));
        }
        self.entries.insert((family, storage), entry);
        Ok(())
    }

    fn remove(&mut self, family: OpFamily, storage: StorageKind) -> Result<()> {
        if self.entries.remove(&(family, storage)).is_none() {
            return Err(Error::precondition(format!(
                "finalize without init for '{}' control tree",
                family
            )));
        }
        Ok(())
    }

    fn default_flat_blocksize() -> Result<Arc<Blocksize>> {
        Ok(Arc::new(Blocksize::new(
            DEFAULT_BLOCKSIZE_REAL,
            DEFAULT_BLOCKSIZE_REAL,
            DEFAULT_BLOCKSIZE_COMPLEX,
            DEFAULT_BLOCKSIZE_COMPLEX,
        )?))
    }

    // ------------------------------------------------------------------
    // Householder construction
    // ------------------------------------------------------------------

    /// Register the default Householder construction tree (unblocked UT)
    pub fn init_householder(&mut self) -> Result<()> {
        let tree = Arc::new(HouseTree::new(StorageKind::Flat, HouseVariant::UnbUt));
        self.insert(
            OpFamily::Householder,
            StorageKind::Flat,
            CntlEntry::Householder(tree),
        )
    }

    /// Remove the Householder construction tree
    pub fn finalize_householder(&mut self) -> Result<()> {
        self.remove(OpFamily::Householder, StorageKind::Flat)
    }

    /// Registered Householder tree, or `PreconditionViolation` when absent
    pub fn house_tree(&self) -> Result<&Arc<HouseTree>> {
        match self.entries.get(&(OpFamily::Householder, StorageKind::Flat)) {
            Some(CntlEntry::Householder(tree)) => Ok(tree),
            _ => Err(Error::precondition(
                "control tree for 'householder' is not initialized",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Triangular solve
    // ------------------------------------------------------------------

    /// Register the default triangular solve tree: blocked variant 1 over
    /// the default blocksize, unblocked at the base
    pub fn init_trsv(&mut self) -> Result<()> {
        let blocksize = Self::default_flat_blocksize()?;
        let sub = Arc::new(TrsvTree::new(StorageKind::Flat, TrsvVariant::Unblocked));
        let tree = Arc::new(TrsvTree::new(
            StorageKind::Flat,
            TrsvVariant::BlockedVar1 { blocksize, sub },
        ));
        self.register_trsv(tree)
    }

    /// Register a caller-built triangular solve tree
    ///
    /// The tree must carry the flat storage tag: lookup and finalize use the
    /// `(Trsv, Flat)` key, so a tree registered under any other tag could
    /// never be retrieved or torn down again.
    pub fn register_trsv(&mut self, tree: Arc<TrsvTree>) -> Result<()> {
        if tree.storage() != StorageKind::Flat {
            return Err(Error::invalid_configuration(
                "trsv control trees are registered under flat storage",
            ));
        }
        self.insert(OpFamily::Trsv, StorageKind::Flat, CntlEntry::Trsv(tree))
    }

    /// Remove the triangular solve tree
    pub fn finalize_trsv(&mut self) -> Result<()> {
        self.remove(OpFamily::Trsv, StorageKind::Flat)
    }

    /// Registered triangular solve tree
    pub fn trsv_tree(&self) -> Result<&Arc<TrsvTree>> {
        match self.entries.get(&(OpFamily::Trsv, StorageKind::Flat)) {
            Some(CntlEntry::Trsv(tree)) => Ok(tree),
            _ => Err(Error::precondition(
                "control tree for 'trsv' is not initialized",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Apply composite Q transform
    // ------------------------------------------------------------------

    /// Register the default apply-Q tree: blocked variant 1 partitioning
    /// target columns, unblocked at the base
    pub fn init_apply_qut(&mut self) -> Result<()> {
        let blocksize = Self::default_flat_blocksize()?;
        let sub = Arc::new(ApplyQutTree::new(
            StorageKind::Flat,
            ApplyQutVariant::Unblocked,
        ));
        let tree = Arc::new(ApplyQutTree::new(
            StorageKind::Flat,
            ApplyQutVariant::BlockedVar1 { blocksize, sub },
        ));
        self.insert(OpFamily::ApplyQut, StorageKind::Flat, CntlEntry::ApplyQut(tree))
    }

    /// Remove the apply-Q tree
    ///
    /// Parents registered by [`init_apply_qut_inc`](Self::init_apply_qut_inc)
    /// keep their `Arc` reference to this tree; finalizing here only removes
    /// the registry entry.
    pub fn finalize_apply_qut(&mut self) -> Result<()> {
        self.remove(OpFamily::ApplyQut, StorageKind::Flat)
    }

    /// Registered apply-Q tree
    pub fn apply_qut_tree(&self) -> Result<&Arc<ApplyQutTree>> {
        match self.entries.get(&(OpFamily::ApplyQut, StorageKind::Flat)) {
            Some(CntlEntry::ApplyQut(tree)) => Ok(tree),
            _ => Err(Error::precondition(
                "control tree for 'apply_qut' is not initialized",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Apply composite Q transform, incremental (hierarchical)
    // ------------------------------------------------------------------

    /// Register the incremental apply-Q tree over the hierarchical
    /// representation
    ///
    /// Requires [`init_apply_qut`](Self::init_apply_qut) first: the
    /// incremental tree invokes the flat apply-Q tree per tile. Uses the
    /// degenerate tile blocksize of 1: one tile per chunk.
    pub fn init_apply_qut_inc(&mut self) -> Result<()> {
        let child = Arc::clone(self.apply_qut_tree().map_err(|_| {
            Error::precondition("init_apply_qut_inc requires the 'apply_qut' tree (dependency order)")
        })?);
        let blocksize = Arc::new(Blocksize::new(1, 1, 1, 1)?);
        let tree = Arc::new(ApplyQutIncTree::new(
            StorageKind::Hier,
            ApplyQutIncVariant::BlockedVar1 {
                blocksize,
                sub: child,
            },
        )?);
        self.insert(
            OpFamily::ApplyQutInc,
            StorageKind::Hier,
            CntlEntry::ApplyQutInc(tree),
        )
    }

    /// Remove the incremental apply-Q tree
    pub fn finalize_apply_qut_inc(&mut self) -> Result<()> {
        self.remove(OpFamily::ApplyQutInc, StorageKind::Hier)
    }

    /// Registered incremental apply-Q tree
    pub fn apply_qut_inc_tree(&self) -> Result<&Arc<ApplyQutIncTree>> {
        match self.entries.get(&(OpFamily::ApplyQutInc, StorageKind::Hier)) {
            Some(CntlEntry::ApplyQutInc(tree)) => Ok(tree),
            _ => Err(Error::precondition(
                "control tree for 'apply_qut_inc' is not initialized",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Convenience front-ends: look up the registered tree and dispatch
    // ------------------------------------------------------------------

    /// Construct a Householder reflector using the registered tree
    pub fn house2(
        &self,
        alpha: &Operand<'_>,
        x: &Operand<'_>,
        tau: &Operand<'_>,
    ) -> Result<()> {
        ops::house2(alpha, x, tau, self.house_tree()?)
    }

    /// Solve `L x = b` in place using the registered tree
    pub fn trsv(&self, diag: Diag, a: &Operand<'_>, x: &Operand<'_>) -> Result<()> {
        ops::trsv(diag, a, x, self.trsv_tree()?)
    }

    /// Overwrite `B` with `Qᴴ B` using the registered tree
    pub fn apply_qut(&self, u: &Operand<'_>, t: &Operand<'_>, b: &Operand<'_>) -> Result<()> {
        ops::apply_qut(u, t, b, self.apply_qut_tree()?)
    }

    /// Overwrite hierarchical `B` with `Qᴴ B` tile by tile using the
    /// registered tree
    pub fn apply_qut_inc(&self, u: &Operand<'_>, t: &Operand<'_>, b: &Operand<'_>) -> Result<()> {
        ops::apply_qut_inc(u, t, b, self.apply_qut_inc_tree()?)
    }
}
