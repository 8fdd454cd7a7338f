//! Factorization handle.
//!
//! `Qr` owns the input matrix together with the most recently computed Q, R
//! and column permutation. Construction only validates and copies A; Q and R
//! stay empty (0 × 0) until one of the factorization methods is called.
//!
//! ```
//! use nalgebra::DMatrix;
//! use qr_engine::Qr;
//!
//! let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
//! let mut qr = Qr::new(&a).unwrap();
//! qr.householder();
//!
//! let b = DMatrix::from_row_slice(3, 1, &[2.0, 5.0, 8.0]);
//! let x = qr.solve(&b).unwrap();
//! assert!((x[(0, 0)] - 2.0).abs() < 1e-12);
//! assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
//! ```

use nalgebra::{DMatrix, DVector};

use crate::domain::{QrConfig, QrMethod};
use crate::error::{QrError, Result};
use crate::ortho::{Factors, orthogonalize};
use crate::solve;

#[derive(Debug, Clone)]
pub struct Qr {
    a: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    perm: Vec<usize>,
    method: Option<QrMethod>,
    config: QrConfig,
}

impl Qr {
    /// Copy `a` into a new handle with the default configuration.
    pub fn new(a: &DMatrix<f64>) -> Result<Self> {
        Self::with_config(a, QrConfig::default())
    }

    /// Copy `a` into a new handle using `config` for every later call.
    pub fn with_config(a: &DMatrix<f64>, config: QrConfig) -> Result<Self> {
        let (rows, cols) = a.shape();
        if rows < 1 || cols < 1 {
            return Err(QrError::EmptyMatrix { rows, cols });
        }
        config.validate()?;

        Ok(Self {
            a: a.clone(),
            q: DMatrix::zeros(0, 0),
            r: DMatrix::zeros(0, 0),
            perm: (0..cols).collect(),
            method: None,
            config,
        })
    }

    /// Factorize with the configured method (Classical Gram-Schmidt by default).
    pub fn factorize(&mut self) {
        self.factorize_with(self.config.method);
    }

    /// Factorize with an explicit method, replacing any previous Q/R.
    pub fn factorize_with(&mut self, method: QrMethod) {
        let Factors { q, r, perm } = orthogonalize(&self.a, method, &self.config);
        self.q = q;
        self.r = r;
        self.perm = perm;
        self.method = Some(method);
    }

    pub fn cgs(&mut self) {
        self.factorize_with(QrMethod::Cgs);
    }

    pub fn mgs(&mut self) {
        self.factorize_with(QrMethod::Mgs);
    }

    pub fn igs(&mut self) {
        self.factorize_with(QrMethod::Igs);
    }

    pub fn bgs(&mut self) {
        self.factorize_with(QrMethod::Bgs);
    }

    pub fn rgs(&mut self) {
        self.factorize_with(QrMethod::Rgs);
    }

    pub fn cgsp(&mut self) {
        self.factorize_with(QrMethod::Cgsp);
    }

    pub fn householder(&mut self) {
        self.factorize_with(QrMethod::Householder);
    }

    pub fn givens(&mut self) {
        self.factorize_with(QrMethod::Givens);
    }

    /// The input matrix.
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Orthonormal factor (m × min(m, n)); empty before factorization.
    pub fn q(&self) -> &DMatrix<f64> {
        &self.q
    }

    /// Upper-triangular factor (min(m, n) × n); empty before factorization.
    pub fn r(&self) -> &DMatrix<f64> {
        &self.r
    }

    /// Column order of the last factorization: `A·P = Q·R` with column `i` of
    /// `A·P` being column `permutation()[i]` of `A`. Identity unless a
    /// pivoted method was used.
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    pub fn method(&self) -> Option<QrMethod> {
        self.method
    }

    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    pub fn is_factorized(&self) -> bool {
        self.method.is_some()
    }

    /// Number of non-degenerate pivots (non-zero diagonal entries of R).
    pub fn rank(&self) -> usize {
        let k = self.r.nrows().min(self.r.ncols());
        (0..k).filter(|&i| self.r[(i, i)] != 0.0).count()
    }

    /// Least-squares solution of `A·x ≈ b` for every column of `b`.
    pub fn solve(&self, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.ensure_factorized()?;
        solve::least_squares(&self.q, &self.r, &self.perm, b, self.config.rank_tolerance)
    }

    /// `solve` for a single right-hand side vector.
    pub fn solve_vector(&self, b: &DVector<f64>) -> Result<DVector<f64>> {
        let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
        let x = self.solve(&rhs)?;
        Ok(x.column(0).into_owned())
    }

    /// Regularised pseudo-inverse (n × m).
    ///
    /// This is `P·(R + δI)⁻¹·Qᵀ`, not the exact Moore-Penrose inverse. The
    /// diagonal shift `δ = config.regularization` keeps a singular R invertible
    /// and perturbs the result by about `δ / σ_min` relatively (`δ / σ_min²`
    /// in absolute terms), `σ_min` being the smallest singular value of R.
    pub fn pseudo_inverse(&self) -> Result<DMatrix<f64>> {
        self.ensure_factorized()?;
        solve::pseudo_inverse(&self.q, &self.r, &self.perm, self.config.regularization)
    }

    /// Hand back the owned `(A, Q, R)`.
    pub fn into_parts(self) -> (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
        (self.a, self.q, self.r)
    }

    fn ensure_factorized(&self) -> Result<()> {
        if self.is_factorized() {
            Ok(())
        } else {
            Err(QrError::NotFactorized)
        }
    }
}

/// Handles are equal when their A, Q and R agree element-wise.
impl PartialEq for Qr {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.q == other.q && self.r == other.r
    }
}
