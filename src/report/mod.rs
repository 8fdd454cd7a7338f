//! Factorization diagnostics and method comparison.
//!
//! Useful when picking a variant for a given class of inputs: every method is
//! run on its own copy of the matrix and scored on the same three errors.

pub mod format;

use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{QrConfig, QrMethod};
use crate::error::{QrError, Result};
use crate::ortho::permute_columns;
use crate::qr::Qr;

pub use format::*;

/// Accuracy summary of one factorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub method: QrMethod,
    pub rows: usize,
    pub cols: usize,
    pub rank: usize,
    /// `max |QᵀQ − D|`, D being 1 on non-degenerate columns and 0 elsewhere.
    pub orthogonality_error: f64,
    /// `max |A·P − Q·R|`.
    pub reconstruction_error: f64,
    /// Largest magnitude strictly below the diagonal of R (0 by construction).
    pub lower_triangle_max: f64,
}

impl Diagnostics {
    /// Score an already factorized handle.
    pub fn of(qr: &Qr) -> Result<Self> {
        let method = qr.method().ok_or(QrError::NotFactorized)?;
        let (q, r) = (qr.q(), qr.r());
        let (rows, cols) = qr.a().shape();

        let gram = q.tr_mul(q);
        let mut orthogonality_error: f64 = 0.0;
        for i in 0..gram.nrows() {
            for j in 0..gram.ncols() {
                let target = if i == j && r[(i, i)] != 0.0 { 1.0 } else { 0.0 };
                orthogonality_error = orthogonality_error.max((gram[(i, j)] - target).abs());
            }
        }

        let reconstruction_error = (q * r - permute_columns(qr.a(), qr.permutation())).amax();

        let mut lower_triangle_max: f64 = 0.0;
        for i in 0..r.nrows() {
            for j in 0..i.min(r.ncols()) {
                lower_triangle_max = lower_triangle_max.max(r[(i, j)].abs());
            }
        }

        Ok(Self {
            method,
            rows,
            cols,
            rank: qr.rank(),
            orthogonality_error,
            reconstruction_error,
            lower_triangle_max,
        })
    }
}

/// Factorize `a` with every method (in parallel) and score each result.
///
/// Output order follows `QrMethod::ALL`.
pub fn compare_methods(a: &DMatrix<f64>, config: &QrConfig) -> Result<Vec<Diagnostics>> {
    let base = Qr::with_config(a, *config)?;
    QrMethod::ALL
        .par_iter()
        .map(|&method| {
            let mut qr = base.clone();
            qr.factorize_with(method);
            Diagnostics::of(&qr)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::well_conditioned;

    #[test]
    fn diagnostics_require_factorization() {
        let qr = Qr::new(&well_conditioned(3, 1)).unwrap();
        assert_eq!(Diagnostics::of(&qr).unwrap_err(), QrError::NotFactorized);
    }

    #[test]
    fn compare_methods_scores_every_variant_in_order() {
        let a = well_conditioned(5, 3);
        let report = compare_methods(&a, &QrConfig::default()).unwrap();
        let methods: Vec<QrMethod> = report.iter().map(|d| d.method).collect();
        assert_eq!(methods, QrMethod::ALL.to_vec());
        for d in &report {
            assert_eq!((d.rows, d.cols, d.rank), (5, 5, 5));
            assert!(d.orthogonality_error < 1e-8, "{}", d.method);
            assert!(d.reconstruction_error < 1e-8, "{}", d.method);
            assert_eq!(d.lower_triangle_max, 0.0);
        }
    }

    #[test]
    fn degenerate_columns_do_not_count_as_orthogonality_loss() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let mut qr = Qr::new(&a).unwrap();
        qr.mgs();
        let d = Diagnostics::of(&qr).unwrap();
        assert_eq!(d.rank, 2);
        assert!(d.orthogonality_error < 1e-12);
    }

    #[test]
    fn compare_methods_rejects_empty_input() {
        let a = DMatrix::<f64>::zeros(0, 3);
        assert!(compare_methods(&a, &QrConfig::default()).is_err());
    }
}
