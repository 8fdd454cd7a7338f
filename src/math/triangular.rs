//! Upper-triangular back-substitution.
//!
//! Least-squares solves reduce to `R·z = c` where R is `k × n` and upper
//! triangular in its leading `k × k` block. We resolve unknowns from row
//! `k - 1` down to `0`:
//!
//! ```text
//! z_i = (c_i - Σ_{j > i} R_ij z_j) / R_ii
//! ```
//!
//! Rank-deficient rows (`R_ii` degenerate) leave `z_i` free; we pick `0`.
//! Unknowns `k..n` (wide systems) are also `0`, giving the basic solution.

use nalgebra::DMatrix;

use super::pivot::is_degenerate;

/// Solve `R·z = c` column by column. Returns an `n × c.ncols()` matrix.
///
/// # Panics
/// Panics if `c.nrows()` differs from `r.nrows()` or R has more rows than columns.
pub fn back_substitute(r: &DMatrix<f64>, c: &DMatrix<f64>, tol: f64) -> DMatrix<f64> {
    let k = r.nrows();
    let n = r.ncols();
    assert_eq!(c.nrows(), k, "right-hand side must have one row per row of R");
    assert!(k <= n, "R must not have more rows than columns");

    let mut z = DMatrix::zeros(n, c.ncols());
    for col in 0..c.ncols() {
        for i in (0..k).rev() {
            let d = r[(i, i)];
            if is_degenerate(d.abs(), tol) {
                continue;
            }
            let mut acc = c[(i, col)];
            for j in (i + 1)..k {
                acc -= r[(i, j)] * z[(j, col)];
            }
            z[(i, col)] = acc / d;
        }
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_upper_system() {
        // [2 1; 0 4] z = [5; 8] -> z = [1.5, 2]
        let r = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 0.0, 4.0]);
        let c = DMatrix::from_row_slice(2, 1, &[5.0, 8.0]);
        let z = back_substitute(&r, &c, 1e-10);
        assert!((z[(0, 0)] - 1.5).abs() < 1e-15);
        assert!((z[(1, 0)] - 2.0).abs() < 1e-15);
    }

    #[test]
    fn zero_diagonal_leaves_unknown_free() {
        let r = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        let c = DMatrix::from_row_slice(3, 1, &[1.0, 9.0, 4.0]);
        let z = back_substitute(&r, &c, 1e-10);
        assert_eq!(z[(1, 0)], 0.0);
        assert_eq!(z[(2, 0)], 2.0);
        assert_eq!(z[(0, 0)], 1.0 - 3.0 * 2.0);
        assert!(z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn wide_system_pads_with_zeros() {
        let r = DMatrix::from_row_slice(1, 3, &[2.0, 5.0, 7.0]);
        let c = DMatrix::from_row_slice(1, 2, &[4.0, -2.0]);
        let z = back_substitute(&r, &c, 1e-10);
        assert_eq!(z.shape(), (3, 2));
        assert_eq!(z[(0, 0)], 2.0);
        assert_eq!(z[(0, 1)], -1.0);
        assert_eq!(z.rows(1, 2).iter().filter(|&&v| v != 0.0).count(), 0);
    }
}
