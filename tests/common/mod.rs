//! Common test utilities
#![allow(dead_code)]

use lamina::control::{Blocksize, TrsvTree, TrsvVariant};
use lamina::operand::StorageKind;
use std::sync::Arc;

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Deterministic pseudo-random values in (-1, 1), good enough for
/// well-conditioned test fixtures
pub fn pseudo_random_f64(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
        })
        .collect()
}

/// Row-major n×n lower-triangular matrix with a dominant diagonal
pub fn lower_triangular_f64(n: usize, seed: u64) -> Vec<f64> {
    let raw = pseudo_random_f64(n * n, seed);
    let mut a = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..=i {
            a[i * n + j] = if i == j {
                // Keep the solve well conditioned.
                2.0 + raw[i * n + j].abs()
            } else {
                raw[i * n + j]
            };
        }
    }
    a
}

/// Unblocked trsv control tree
pub fn trsv_unblocked() -> Arc<TrsvTree> {
    Arc::new(TrsvTree::new(StorageKind::Flat, TrsvVariant::Unblocked))
}

/// Blocked variant-1 trsv tree with a uniform blocksize over an unblocked
/// base
pub fn trsv_blocked_var1(nb: usize) -> Arc<TrsvTree> {
    Arc::new(TrsvTree::new(
        StorageKind::Flat,
        TrsvVariant::BlockedVar1 {
            blocksize: Arc::new(Blocksize::uniform(nb).unwrap()),
            sub: trsv_unblocked(),
        },
    ))
}

/// Blocked variant-2 trsv tree with a uniform blocksize over an unblocked
/// base
pub fn trsv_blocked_var2(nb: usize) -> Arc<TrsvTree> {
    Arc::new(TrsvTree::new(
        StorageKind::Flat,
        TrsvVariant::BlockedVar2 {
            blocksize: Arc::new(Blocksize::uniform(nb).unwrap()),
            sub: trsv_unblocked(),
        },
    ))
}
