//! Numeric micro-kernels invoked at dispatch base cases
//!
//! Scalar reference implementations, generic over [`Element`]. Kernels
//! receive fully-resolved flat buffers (base pointer, dimensions, strides in
//! elements) after the dispatcher has finished partitioning; they perform
//! the arithmetic and nothing else. All loops are column-ordered
//! fused-multiply-subtract sequences so that blocked and unblocked dispatch
//! paths execute the identical per-element arithmetic.
//!
//! Reflectors use the UT convention: `H = I - (1/τ)·u·uᴴ` with
//! `u = [1; u₂]` and real `τ = (1 + u₂ᴴu₂)/2`.

use crate::dtype::Element;

/// Construct a UT Householder reflector in place
///
/// On entry `alpha` points to χ and `x` to the m−1 tail of the vector
/// [χ; x]. On return `alpha` holds β = −sign(χ)·‖[χ; x]‖ (complex sign
/// χ/|χ|, so β keeps χ's phase), `x` holds the reflector tail
/// u₂ = x/(χ−β), and `tau` holds τ = (1 + u₂ᴴu₂)/2.
///
/// A zero input vector yields β = χ, u₂ = 0, τ = 1/2 (H flips the head
/// component's sign, which maps 0 to 0).
///
/// # Safety
/// - `alpha` and `tau` must be valid for reads and writes
/// - `x` must be valid for `x_len` reads and writes at stride `x_stride`
/// - The regions must not overlap
pub unsafe fn house2_unb<T: Element>(
    alpha: *mut T,
    x: *mut T,
    x_len: usize,
    x_stride: usize,
    tau: *mut T,
) {
    let chi = *alpha;

    let mut sigma = 0.0f64;
    for i in 0..x_len {
        sigma += (*x.add(i * x_stride)).abs_sq();
    }

    let mag = (chi.abs_sq() + sigma).sqrt();
    if mag == 0.0 {
        *tau = T::from_f64(0.5);
        return;
    }

    let chi_mag = chi.abs_sq().sqrt();
    let beta = if chi_mag == 0.0 {
        T::from_f64(-mag)
    } else {
        -chi.scale(mag / chi_mag)
    };

    // nu = chi - beta is nonzero: beta points opposite to chi.
    let nu = chi - beta;
    let inv_nu = T::one() / nu;
    let mut sigma_u = 0.0f64;
    for i in 0..x_len {
        let p = x.add(i * x_stride);
        let u = *p * inv_nu;
        *p = u;
        sigma_u += u.abs_sq();
    }

    *alpha = beta;
    *tau = T::from_f64((1.0 + sigma_u) / 2.0);
}

/// Apply one UT reflector to a matrix block: `B := H·B`
///
/// `u2` is the reflector tail (head component implicitly 1), `tau` the UT
/// scalar. `b` points to the block's first row, which corresponds to the
/// reflector's unit head; rows `1..=u2_len` correspond to the tail. For
/// each column: `w = (b[0] + u₂ᴴ·b[1..]) / τ`, then `b[0] -= w` and
/// `b[1..] -= u₂·w`.
///
/// # Safety
/// - `u2` must be valid for `u2_len` reads at stride `u2_stride`
/// - `b` must be valid for a `(u2_len + 1) × b_cols` block at row stride
///   `b_stride`, reads and writes
/// - `u2` and `b` must not overlap
pub unsafe fn apply_hv<T: Element>(
    u2: *const T,
    u2_len: usize,
    u2_stride: usize,
    tau: T,
    b: *mut T,
    b_cols: usize,
    b_stride: usize,
) {
    let inv_tau = T::one() / tau;
    for c in 0..b_cols {
        let head = b.add(c);
        let mut w = *head;
        for i in 0..u2_len {
            let u = *u2.add(i * u2_stride);
            w = w + u.conj() * *b.add((i + 1) * b_stride + c);
        }
        w = w * inv_tau;
        *head = *head - w;
        for i in 0..u2_len {
            let u = *u2.add(i * u2_stride);
            let p = b.add((i + 1) * b_stride + c);
            *p = *p - u * w;
        }
    }
}

/// Unblocked lower-triangular solve: `x := L⁻¹·x`, column-oriented forward
/// substitution
///
/// `a` is the n×n matrix whose lower triangle is referenced (`unit` skips
/// the diagonal divide). For each column j ascending: divide `x[j]` by the
/// diagonal, then subtract the scaled column tail from `x[j+1..]`.
///
/// # Safety
/// - `a` must be valid for `n` rows of `n` elements at row stride `lda`
/// - `x` must be valid for `n` reads and writes at stride `incx`
/// - `a` and `x` must not overlap
pub unsafe fn trsv_ln_unb<T: Element>(
    unit: bool,
    a: *const T,
    lda: usize,
    n: usize,
    x: *mut T,
    incx: usize,
) {
    for j in 0..n {
        let xj_ptr = x.add(j * incx);
        if !unit {
            *xj_ptr = *xj_ptr / *a.add(j * lda + j);
        }
        let xj = *xj_ptr;
        for i in (j + 1)..n {
            let p = x.add(i * incx);
            *p = *p - *a.add(i * lda + j) * xj;
        }
    }
}

/// Panel update: `y := y − A·x`, column-ordered
///
/// `A` is p×q; columns are processed ascending, each as a fused
/// multiply-subtract sweep over y, preserving the exact arithmetic order of
/// the unblocked substitution.
///
/// # Safety
/// - `a` must be valid for `p` rows of `q` elements at row stride `lda`
/// - `x` must be valid for `q` reads at stride `incx`
/// - `y` must be valid for `p` reads and writes at stride `incy`
/// - `y` must not overlap `a` or `x`
pub unsafe fn gemv_sub<T: Element>(
    a: *const T,
    lda: usize,
    p: usize,
    q: usize,
    x: *const T,
    incx: usize,
    y: *mut T,
    incy: usize,
) {
    for j in 0..q {
        let xj = *x.add(j * incx);
        for i in 0..p {
            let py = y.add(i * incy);
            *py = *py - *a.add(i * lda + j) * xj;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;

    #[test]
    fn test_house2_annihilates_tail() {
        // Reflector built from [3, 4]: beta = -5.
        let mut alpha = 3.0f64;
        let mut x = [4.0f64];
        let mut tau = 0.0f64;
        unsafe { house2_unb(&mut alpha, x.as_mut_ptr(), 1, 1, &mut tau) };
        assert!((alpha + 5.0).abs() < 1e-14);

        // Apply H to the original vector; tail must vanish.
        let mut v = [3.0f64, 4.0];
        unsafe { apply_hv(x.as_ptr(), 1, 1, tau, v.as_mut_ptr(), 1, 1) };
        assert!((v[0] - alpha).abs() < 1e-14);
        assert!(v[1].abs() < 1e-14);
    }

    #[test]
    fn test_house2_zero_vector() {
        let mut alpha = 0.0f64;
        let mut x = [0.0f64, 0.0];
        let mut tau = 0.0f64;
        unsafe { house2_unb(&mut alpha, x.as_mut_ptr(), 2, 1, &mut tau) };
        assert_eq!(alpha, 0.0);
        assert_eq!(tau, 0.5);
        assert_eq!(x, [0.0, 0.0]);
    }

    #[test]
    fn test_house2_complex_keeps_phase() {
        let mut alpha = Complex128::new(0.0, 2.0);
        let mut x = [Complex128::new(1.0, 0.0)];
        let mut tau = Complex128::ZERO;
        unsafe { house2_unb(&mut alpha, x.as_mut_ptr(), 1, 1, &mut tau) };
        // beta = -i * sqrt(5): phase of chi preserved, magnitude is the norm.
        assert!((alpha.magnitude() - 5.0f64.sqrt()).abs() < 1e-14);
        assert!(alpha.re.abs() < 1e-14);
        assert!(alpha.im < 0.0);

        let mut v = [Complex128::new(0.0, 2.0), Complex128::new(1.0, 0.0)];
        unsafe { apply_hv(x.as_ptr(), 1, 1, tau, v.as_mut_ptr(), 1, 1) };
        assert!((v[0] - alpha).magnitude() < 1e-14);
        assert!(v[1].magnitude() < 1e-14);
    }

    #[test]
    fn test_trsv_ln_unb_known_solution() {
        // L = [[2, 0], [1, 3]], b = [4, 11] => x = [2, 3].
        let a = [2.0f64, 0.0, 1.0, 3.0];
        let mut x = [4.0f64, 11.0];
        unsafe { trsv_ln_unb(false, a.as_ptr(), 2, 2, x.as_mut_ptr(), 1) };
        assert_eq!(x, [2.0, 3.0]);
    }

    #[test]
    fn test_trsv_unit_diagonal_skips_divide() {
        // Same matrix, unit diag: diagonal entries treated as 1.
        let a = [2.0f64, 0.0, 1.0, 3.0];
        let mut x = [4.0f64, 11.0];
        unsafe { trsv_ln_unb(true, a.as_ptr(), 2, 2, x.as_mut_ptr(), 1) };
        assert_eq!(x, [4.0, 7.0]);
    }

    #[test]
    fn test_gemv_sub() {
        // y -= A x with A = [[1, 2], [3, 4]], x = [1, 1].
        let a = [1.0f64, 2.0, 3.0, 4.0];
        let x = [1.0f64, 1.0];
        let mut y = [10.0f64, 10.0];
        unsafe { gemv_sub(a.as_ptr(), 2, 2, 2, x.as_ptr(), 1, y.as_mut_ptr(), 1) };
        assert_eq!(y, [7.0, 3.0]);
    }
}
