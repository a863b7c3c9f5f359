//! Integration tests for Householder reflector construction
//!
//! Tests verify:
//! - The constructed reflector annihilates the vector tail (via apply_qut)
//! - The UT tau convention (real tau, H Hermitian and involutive)
//! - Complex phase handling
//! - Validator short-circuit ordering

mod common;

use common::{assert_allclose_f64, pseudo_random_f64};
use lamina::check::CheckFailure;
use lamina::control::{ApplyQutTree, ApplyQutVariant, Environment, HouseTree, HouseVariant, OpFamily};
use lamina::dtype::Complex128;
use lamina::error::Error;
use lamina::operand::{Operand, StorageKind};
use lamina::ops::{apply_qut, house2};

fn house_tree() -> HouseTree {
    HouseTree::new(StorageKind::Flat, HouseVariant::UnbUt)
}

fn apply_tree() -> ApplyQutTree {
    ApplyQutTree::new(StorageKind::Flat, ApplyQutVariant::Unblocked)
}

/// Build a reflector from [alpha; tail], returning (beta, u2, tau)
fn build_reflector(alpha: f64, tail: &[f64]) -> (f64, Vec<f64>, f64) {
    let mut a = alpha;
    let mut x = tail.to_vec();
    let mut tau = 0.0f64;
    let len = x.len();
    let a_op = Operand::scalar_mut(&mut a);
    let x_op = Operand::from_slice_mut(&mut x, len, 1).unwrap();
    let t_op = Operand::scalar_mut(&mut tau);
    house2(&a_op, &x_op, &t_op, &house_tree()).unwrap();
    drop((a_op, x_op, t_op));
    (a, x, tau)
}

// ============================================================================
// Reflector properties
// ============================================================================

#[test]
fn test_reflector_annihilates_tail() {
    let alpha = 1.5f64;
    let tail = pseudo_random_f64(7, 31);
    let (beta, u2, tau) = build_reflector(alpha, &tail);

    // beta magnitude is the norm of the original vector.
    let norm: f64 = (alpha * alpha + tail.iter().map(|v| v * v).sum::<f64>()).sqrt();
    assert!((beta.abs() - norm).abs() < 1e-13);
    // Opposite sign from alpha, so chi - beta is safely away from zero.
    assert!(beta * alpha < 0.0);

    // Apply H to the original vector: the tail must vanish.
    let m = tail.len() + 1;
    let mut u = vec![1.0f64];
    u.extend_from_slice(&u2);
    let t = vec![tau];
    let mut v = vec![alpha];
    v.extend_from_slice(&tail);

    let u_op = Operand::from_slice(&u, m, 1).unwrap();
    let t_op = Operand::from_slice(&t, 1, 1).unwrap();
    let v_op = Operand::from_slice_mut(&mut v, m, 1).unwrap();
    apply_qut(&u_op, &t_op, &v_op, &apply_tree()).unwrap();
    drop(v_op);

    let mut expected = vec![0.0f64; m];
    expected[0] = beta;
    assert_allclose_f64(&v, &expected, 1e-13, 1e-13, "H*[alpha; x] == [beta; 0]");
}

#[test]
fn test_reflector_is_involutive() {
    // H*(H*v) == v for arbitrary v, since H is Hermitian unitary.
    let (_, u2, tau) = build_reflector(2.0, &[1.0, -3.0, 0.5]);
    let m = 4;
    let mut u = vec![1.0f64];
    u.extend_from_slice(&u2);
    let t = vec![tau];

    let original = pseudo_random_f64(m, 77);
    let mut v = original.clone();
    let u_op = Operand::from_slice(&u, m, 1).unwrap();
    let t_op = Operand::from_slice(&t, 1, 1).unwrap();
    {
        let v_op = Operand::from_slice_mut(&mut v, m, 1).unwrap();
        apply_qut(&u_op, &t_op, &v_op, &apply_tree()).unwrap();
        apply_qut(&u_op, &t_op, &v_op, &apply_tree()).unwrap();
    }
    assert_allclose_f64(&v, &original, 1e-13, 1e-13, "H*H == I");
}

#[test]
fn test_tau_convention() {
    // tau == (1 + u2^H u2) / 2.
    let (_, u2, tau) = build_reflector(3.0, &[4.0]);
    let expected = (1.0 + u2.iter().map(|v| v * v).sum::<f64>()) / 2.0;
    assert!((tau - expected).abs() < 1e-15);
    // The classic [3; 4] example: beta = -5, u2 = 0.5, tau = 0.625.
    assert!((u2[0] - 0.5).abs() < 1e-15);
    assert!((tau - 0.625).abs() < 1e-15);
}

#[test]
fn test_zero_vector_degenerate_case() {
    let (beta, u2, tau) = build_reflector(0.0, &[0.0, 0.0]);
    assert_eq!(beta, 0.0);
    assert_eq!(u2, vec![0.0, 0.0]);
    assert_eq!(tau, 0.5);
}

#[test]
fn test_empty_tail() {
    // m == 1: the reflector reduces to a sign flip of the head.
    let (beta, u2, tau) = build_reflector(2.5, &[]);
    assert!(u2.is_empty());
    assert_eq!(tau, 0.5);
    assert!((beta + 2.5).abs() < 1e-15);
}

#[test]
fn test_complex_reflector_preserves_phase() {
    let chi = Complex128::new(1.0, 2.0);
    let tail = [Complex128::new(0.5, -0.5), Complex128::new(2.0, 1.0)];

    let mut alpha = chi;
    let mut x = tail.to_vec();
    let mut tau = Complex128::ZERO;
    {
        let a_op = Operand::scalar_mut(&mut alpha);
        let x_op = Operand::from_slice_mut(&mut x, 2, 1).unwrap();
        let t_op = Operand::scalar_mut(&mut tau);
        house2(&a_op, &x_op, &t_op, &house_tree()).unwrap();
    }

    // beta = -chi * (norm / |chi|): same phase as chi, negated.
    let norm = (chi.magnitude_squared()
        + tail.iter().map(|z| z.magnitude_squared()).sum::<f64>())
    .sqrt();
    assert!((alpha.magnitude() - norm).abs() < 1e-13);
    let phase_ratio = alpha / chi;
    assert!(phase_ratio.im.abs() < 1e-13);
    assert!(phase_ratio.re < 0.0);
    // tau stays real.
    assert!(tau.im.abs() < 1e-15);

    // And it annihilates the tail.
    let u = [Complex128::ONE, x[0], x[1]];
    let t = [tau];
    let mut v = vec![chi, tail[0], tail[1]];
    let u_op = Operand::from_slice(&u, 3, 1).unwrap();
    let t_op = Operand::from_slice(&t, 1, 1).unwrap();
    let v_op = Operand::from_slice_mut(&mut v, 3, 1).unwrap();
    apply_qut(&u_op, &t_op, &v_op, &apply_tree()).unwrap();
    drop(v_op);
    assert!((v[0] - alpha).magnitude() < 1e-13);
    assert!(v[1].magnitude() < 1e-13);
    assert!(v[2].magnitude() < 1e-13);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validator_short_circuits_on_first_predicate() {
    // alpha is read-only AND dtype-mismatched against x; the non-constant
    // check runs first and must be the reported failure.
    let alpha = 1.0f64;
    let mut x = vec![1.0f32; 3];
    let mut tau = 0.0f32;
    let a_op = Operand::scalar(&alpha);
    let x_op = Operand::from_slice_mut(&mut x, 3, 1).unwrap();
    let t_op = Operand::scalar_mut(&mut tau);

    match house2(&a_op, &x_op, &t_op, &house_tree()) {
        Err(Error::Validation { op, check }) => {
            assert_eq!(op, OpFamily::Householder);
            assert_eq!(check, CheckFailure::ConstantOperand);
        }
        other => panic!("expected validation failure, got {:?}", other.err()),
    }
}

#[test]
fn test_non_scalar_alpha_rejected() {
    let mut alpha = vec![1.0f64; 2];
    let mut x = vec![1.0f64; 3];
    let mut tau = 0.0f64;
    let a_op = Operand::from_slice_mut(&mut alpha, 2, 1).unwrap();
    let x_op = Operand::from_slice_mut(&mut x, 3, 1).unwrap();
    let t_op = Operand::scalar_mut(&mut tau);

    match house2(&a_op, &x_op, &t_op, &house_tree()) {
        Err(Error::Validation { check, .. }) => {
            assert_eq!(check, CheckFailure::NotScalar);
        }
        other => panic!("expected NotScalar, got {:?}", other.err()),
    }
}

#[test]
fn test_environment_front_end() {
    let env = Environment::with_defaults().unwrap();
    let mut alpha = 3.0f64;
    let mut x = vec![4.0f64];
    let mut tau = 0.0f64;
    {
        let a_op = Operand::scalar_mut(&mut alpha);
        let x_op = Operand::from_slice_mut(&mut x, 1, 1).unwrap();
        let t_op = Operand::scalar_mut(&mut tau);
        env.house2(&a_op, &x_op, &t_op).unwrap();
    }
    assert!((alpha + 5.0).abs() < 1e-14);
    assert!((tau - 0.625).abs() < 1e-14);
}
