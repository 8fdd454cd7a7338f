//! Pivot handling shared by every orthogonalization variant.
//!
//! Each algorithm eventually has to decide whether the residual of a column
//! still carries a new direction. That decision (and what happens when it does
//! not) lives here so all variants degrade identically:
//!
//! - residual norm `<= tol` (or non-finite): the Q column is zero and the
//!   R diagonal is exactly `0.0`
//! - otherwise: the Q column is the unit residual and the R diagonal is its norm

use log::trace;
use nalgebra::storage::Storage;
use nalgebra::{DMatrix, Dyn, Vector};

/// `true` when `norm` is too small (or not finite) to normalise by.
pub fn is_degenerate(norm: f64, tol: f64) -> bool {
    !(norm.is_finite() && norm > tol)
}

/// Write the normalised residual `v` into column `col` of `q`.
///
/// Returns the value to store on the R diagonal.
pub fn normalize_into<S>(q: &mut DMatrix<f64>, col: usize, v: &Vector<f64, Dyn, S>, tol: f64) -> f64
where
    S: Storage<f64, Dyn>,
{
    let norm = v.norm();
    if is_degenerate(norm, tol) {
        trace!("column {col} is degenerate (residual norm {norm:e})");
        q.column_mut(col).fill(0.0);
        return 0.0;
    }

    let inv = 1.0 / norm;
    for (dst, &src) in q.column_mut(col).iter_mut().zip(v.iter()) {
        *dst = src * inv;
    }
    norm
}

/// Normalise the diagonal entry `i` of a reflection/rotation based factorization.
///
/// Householder and Givens produce a full orthonormal Q with diagonal entries of
/// either sign. Afterwards:
/// - a degenerate diagonal clears Q column `i` and R row `i`
/// - a negative diagonal flips the sign of R row `i` and Q column `i`, so the
///   result matches the Gram-Schmidt convention `R(i,i) >= 0`
pub fn settle_diagonal(q: &mut DMatrix<f64>, r: &mut DMatrix<f64>, i: usize, tol: f64) {
    let d = r[(i, i)];
    let n = r.ncols();

    if is_degenerate(d.abs(), tol) {
        trace!("diagonal {i} is degenerate ({d:e})");
        q.column_mut(i).fill(0.0);
        for j in i..n {
            r[(i, j)] = 0.0;
        }
        return;
    }

    if d < 0.0 {
        for j in i..n {
            r[(i, j)] = -r[(i, j)];
        }
        for x in q.column_mut(i).iter_mut() {
            *x = -*x;
        }
    }
}

/// Compute a Givens rotation `(c, s, r)` such that
/// `[c s; -s c] · [a; b] = [r; 0]` with `r >= 0`.
pub fn givens(a: f64, b: f64) -> (f64, f64, f64) {
    if b == 0.0 {
        return if a < 0.0 { (-1.0, 0.0, -a) } else { (1.0, 0.0, a) };
    }
    let r = a.hypot(b);
    (a / r, b / r, r)
}
