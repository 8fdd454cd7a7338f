//! Column-by-column Gram-Schmidt variants: classical, modified and iterative.
//!
//! All three build Q (m × k) and R (k × n) with k = min(m, n). Columns past
//! `k` (wide inputs) only receive projection coefficients in R.

use nalgebra::{DMatrix, DVector};

use super::Factors;
use crate::math::normalize_into;

/// Classical Gram-Schmidt.
///
/// Projection coefficients are taken against the *original* column, so rounding
/// errors accumulate once columns become nearly dependent.
pub fn cgs(a: &DMatrix<f64>, tol: f64) -> Factors {
    project_and_normalize(a, 1, tol)
}

/// Iterative Gram-Schmidt: classical projection followed by a second pass of
/// the residual against all previous Q columns ("twice is enough").
pub fn igs(a: &DMatrix<f64>, tol: f64) -> Factors {
    project_and_normalize(a, 2, tol)
}

fn project_and_normalize(a: &DMatrix<f64>, passes: usize, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);

    let mut q = DMatrix::zeros(m, k);
    let mut r = DMatrix::zeros(k, n);
    let mut u = DVector::zeros(m);

    for i in 0..n {
        let v = a.column(i);
        u.copy_from(&v);
        let prev = k.min(i);

        // First pass projects the original column.
        for j in 0..prev {
            let e = q.column(j);
            let proj = v.dot(&e);
            r[(j, i)] = proj;
            u.axpy(-proj, &e, 1.0);
        }

        // Later passes re-project the residual and fold corrections into R.
        for _ in 1..passes {
            for j in 0..prev {
                let e = q.column(j);
                let corr = u.dot(&e);
                r[(j, i)] += corr;
                u.axpy(-corr, &e, 1.0);
            }
        }

        if i < k {
            r[(i, i)] = normalize_into(&mut q, i, &u, tol);
        }
    }

    Factors::new(q, r)
}

/// Modified Gram-Schmidt.
///
/// Each pivot column is normalised and then immediately removed from every
/// later working column, so projections are always taken against purified
/// residuals.
pub fn mgs(a: &DMatrix<f64>, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);

    let mut q = DMatrix::zeros(m, k);
    let mut r = DMatrix::zeros(k, n);
    let mut w = a.clone();

    for j in 0..k {
        r[(j, j)] = normalize_into(&mut q, j, &w.column(j), tol);
        if r[(j, j)] == 0.0 {
            // Zero Q column: nothing to remove, R row stays zero.
            continue;
        }
        sweep_later_columns(&q, j, &mut w, &mut r, j + 1, n);
    }

    Factors::new(q, r)
}

/// Remove the projection on `q[:, j]` from working columns `from..to`,
/// recording the coefficients in row `j` of R.
pub(crate) fn sweep_later_columns(
    q: &DMatrix<f64>,
    j: usize,
    w: &mut DMatrix<f64>,
    r: &mut DMatrix<f64>,
    from: usize,
    to: usize,
) {
    let qj = q.column(j);
    for l in from..to {
        let d = qj.dot(&w.column(l));
        r[(j, l)] = d;
        w.column_mut(l).axpy(-d, &qj, 1.0);
    }
}
