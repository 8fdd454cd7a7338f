//! Orthogonalization engine.
//!
//! Every variant is a stateless function from `A` (m × n) to `Factors`:
//!
//! - `Q` (m × k), orthonormal columns or exact zero columns for degenerate pivots
//! - `R` (k × n), exactly zero below the diagonal
//! - `perm`, the column order actually factored (`A·P = Q·R`)
//!
//! with k = min(m, n). Variants differ only in stability/performance
//! trade-offs; they all share the degeneracy policy in `crate::math::pivot`.

pub mod block;
pub mod givens;
pub mod gram_schmidt;
pub mod householder;
pub mod reordered;

use log::debug;
use nalgebra::DMatrix;

use crate::domain::{QrConfig, QrMethod};
use crate::math::settle_diagonal;

pub use block::bgs;
pub use givens::givens;
pub use gram_schmidt::{cgs, igs, mgs};
pub use householder::householder;
pub use reordered::{cgsp, rgs};

/// Output of a single orthogonalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Factors {
    pub q: DMatrix<f64>,
    pub r: DMatrix<f64>,
    /// `perm[i]` is the column of `A` that ended up in position `i`.
    pub perm: Vec<usize>,
}

impl Factors {
    /// Factors of an unpermuted factorization.
    pub fn new(q: DMatrix<f64>, r: DMatrix<f64>) -> Self {
        let perm = (0..r.ncols()).collect();
        Self { q, r, perm }
    }

    pub fn permuted(q: DMatrix<f64>, r: DMatrix<f64>, perm: Vec<usize>) -> Self {
        debug_assert_eq!(perm.len(), r.ncols());
        Self { q, r, perm }
    }

    /// Number of non-zero diagonal entries of R.
    pub fn rank(&self) -> usize {
        let k = self.r.nrows().min(self.r.ncols());
        (0..k).filter(|&i| self.r[(i, i)] != 0.0).count()
    }
}

/// Run the selected variant on `a`.
pub fn orthogonalize(a: &DMatrix<f64>, method: QrMethod, config: &QrConfig) -> Factors {
    let tol = config.rank_tolerance;
    let factors = match method {
        QrMethod::Cgs => cgs(a, tol),
        QrMethod::Mgs => mgs(a, tol),
        QrMethod::Igs => igs(a, tol),
        QrMethod::Bgs => bgs(a, config.block_size, tol),
        QrMethod::Rgs => rgs(a, tol),
        QrMethod::Cgsp => cgsp(a, tol),
        QrMethod::Householder => householder(a, tol),
        QrMethod::Givens => givens(a, tol),
    };
    debug!(
        "qr {}: {}x{} -> rank {}",
        method,
        a.nrows(),
        a.ncols(),
        factors.rank()
    );
    factors
}

/// Thin factors from a reflection/rotation sweep.
///
/// `pivot_rows[j]` is the row of `w` (and column of `q_full`) that column `j`
/// was reduced onto, or `None` when column `j` was degenerate. A degenerate
/// column consumes no row, so every direction of `A` reaches a later pivot.
pub(crate) fn gather_pivots(
    q_full: &DMatrix<f64>,
    w: &DMatrix<f64>,
    pivot_rows: &[Option<usize>],
    tol: f64,
) -> Factors {
    let (m, n) = w.shape();
    let k = pivot_rows.len();
    let mut q = DMatrix::zeros(m, k);
    let mut r = DMatrix::zeros(k, n);
    for (j, row) in pivot_rows.iter().enumerate() {
        let Some(p) = *row else { continue };
        q.set_column(j, &q_full.column(p));
        for col in j..n {
            r[(j, col)] = w[(p, col)];
        }
    }
    for i in 0..k {
        settle_diagonal(&mut q, &mut r, i, tol);
    }
    Factors::new(q, r)
}

/// `A·P`: the columns of `a` in the order given by `perm`.
pub fn permute_columns(a: &DMatrix<f64>, perm: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), perm.len(), |i, j| a[(i, perm[j])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{random_matrix, well_conditioned};

    const TOL: f64 = 1e-8;

    fn run_all(a: &DMatrix<f64>) -> Vec<(QrMethod, Factors)> {
        let config = QrConfig {
            block_size: 2,
            ..QrConfig::default()
        };
        QrMethod::ALL
            .into_iter()
            .map(|m| (m, orthogonalize(a, m, &config)))
            .collect()
    }

    fn gram_error(q: &DMatrix<f64>) -> f64 {
        let k = q.ncols();
        (q.transpose() * q - DMatrix::identity(k, k)).amax()
    }

    fn reconstruction_error(a: &DMatrix<f64>, f: &Factors) -> f64 {
        (&f.q * &f.r - permute_columns(a, &f.perm)).amax()
    }

    fn assert_structurally_upper(method: QrMethod, r: &DMatrix<f64>) {
        for i in 0..r.nrows() {
            for j in 0..i.min(r.ncols()) {
                assert_eq!(r[(i, j)], 0.0, "{method}: R[{i},{j}] = {}", r[(i, j)]);
            }
        }
    }

    fn assert_finite(method: QrMethod, f: &Factors) {
        assert!(f.q.iter().chain(f.r.iter()).all(|v| v.is_finite()), "{method}: non-finite entry");
    }

    #[test]
    fn square_well_conditioned_all_variants() {
        let a = well_conditioned(6, 11);
        for (method, f) in run_all(&a) {
            assert_eq!(f.q.shape(), (6, 6));
            assert_eq!(f.r.shape(), (6, 6));
            assert!(gram_error(&f.q) < TOL, "{method}: QᵀQ error {}", gram_error(&f.q));
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
            assert_structurally_upper(method, &f.r);
            if !method.is_pivoted() {
                assert_eq!(f.perm, (0..6).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn random_tall_all_variants() {
        let a = random_matrix(9, 4, 3);
        for (method, f) in run_all(&a) {
            assert_eq!(f.q.shape(), (9, 4));
            assert_eq!(f.r.shape(), (4, 4));
            assert!(gram_error(&f.q) < TOL, "{method}");
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
            assert_structurally_upper(method, &f.r);
        }
    }

    #[test]
    fn four_by_two_full_column_rank() {
        let a = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 9.0]);
        for (method, f) in run_all(&a) {
            assert_eq!(f.q.shape(), (4, 2), "{method}");
            assert_eq!(f.r.shape(), (2, 2), "{method}");
            assert!(gram_error(&f.q) < TOL, "{method}");
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
            assert_eq!(f.r[(1, 0)], 0.0);
        }
    }

    #[test]
    fn wide_input_all_variants() {
        let a = well_conditioned(5, 8).rows(0, 3).into_owned();
        for (method, f) in run_all(&a) {
            assert_eq!(f.q.shape(), (3, 3), "{method}");
            assert_eq!(f.r.shape(), (3, 5), "{method}");
            assert!(gram_error(&f.q) < TOL, "{method}");
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
            assert_structurally_upper(method, &f.r);
        }
    }

    #[test]
    fn duplicate_last_column_degrades_gracefully() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        for (method, f) in run_all(&a) {
            assert_finite(method, &f);
            assert_eq!(f.rank(), 2, "{method}");
            if method.is_pivoted() {
                // The duplicate may be moved, but some column still collapses.
                continue;
            }
            let q2 = f.q.column(2);
            assert!(q2.iter().all(|&x| x == 0.0), "{method}: Q[:,2] = {q2}");
            assert_eq!(f.r[(2, 2)], 0.0, "{method}");
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
        }
    }

    #[test]
    fn dependent_middle_column_keeps_range() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 1.0]);
        for (method, f) in run_all(&a) {
            assert_finite(method, &f);
            assert_eq!(f.rank(), 2, "{method}");
            assert!(reconstruction_error(&a, &f) < TOL, "{method}");
            assert_structurally_upper(method, &f.r);
            if !method.is_pivoted() {
                assert_eq!(f.r[(1, 1)], 0.0, "{method}");
                assert!(f.q.column(1).iter().all(|&x| x == 0.0), "{method}");
            }
        }
    }

    #[test]
    fn proportional_column_collapses() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, -3.0, 2.0, -6.0, 3.0, -9.0]);
        for (method, f) in run_all(&a) {
            assert_finite(method, &f);
            assert_eq!(f.rank(), 1, "{method}");
            assert_eq!(f.r[(1, 1)], 0.0, "{method}");
            assert!(f.q.column(1).iter().all(|&x| x == 0.0), "{method}");
        }
    }

    #[test]
    fn zero_matrix_gives_zero_factors() {
        let a = DMatrix::zeros(4, 3);
        for (method, f) in run_all(&a) {
            assert!(f.q.iter().all(|&x| x == 0.0), "{method}");
            assert!(f.r.iter().all(|&x| x == 0.0), "{method}");
            assert_eq!(f.rank(), 0);
        }
    }

    #[test]
    fn single_element_matrix() {
        let a = DMatrix::from_element(1, 1, -4.0);
        for (method, f) in run_all(&a) {
            assert!((f.r[(0, 0)] - 4.0).abs() < 1e-15, "{method}");
            assert!((f.q[(0, 0)] + 1.0).abs() < 1e-15, "{method}");
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let a = random_matrix(5, 5, 42);
        let config = QrConfig {
            block_size: 2,
            ..QrConfig::default()
        };
        for (method, first) in run_all(&a) {
            let second = orthogonalize(&a, method, &config);
            assert_eq!(first, second, "{method}");
        }
    }
}
