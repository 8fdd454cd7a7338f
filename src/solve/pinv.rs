//! Regularised pseudo-inverse from Q and R.
//!
//! - square / tall (`R` is `n × n`): `A⁺ ≈ P (R + δI)⁻¹ Qᵀ`
//! - wide (`R` is `k × n`, `k < n`): `A⁺ ≈ P Rᵀ (R Rᵀ + δI)⁻¹ Qᵀ`, the
//!   minimum-norm form
//!
//! The shift `δ` keeps the inversion well defined when R has zero or tiny
//! diagonal entries. It also means the result is only an approximation of the
//! Moore-Penrose inverse; callers needing exactness must check conditioning
//! themselves.

use log::warn;
use nalgebra::DMatrix;

use super::least_squares::unpermute_rows;
use crate::error::{QrError, Result};

pub fn pseudo_inverse(
    q: &DMatrix<f64>,
    r: &DMatrix<f64>,
    perm: &[usize],
    delta: f64,
) -> Result<DMatrix<f64>> {
    let (k, n) = r.shape();

    let r_pinv = if k == n {
        let shifted = r + DMatrix::identity(k, k) * delta;
        invert(shifted)?
    } else {
        let gram = r * r.transpose() + DMatrix::identity(k, k) * delta;
        r.transpose() * invert(gram)?
    };

    let z = r_pinv * q.transpose();
    Ok(unpermute_rows(&z, perm))
}

fn invert(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let dim = m.nrows();
    match m.try_inverse() {
        Some(inv) if inv.iter().all(|v| v.is_finite()) => Ok(inv),
        _ => {
            warn!("regularised {dim}x{dim} factor could not be inverted");
            Err(QrError::SingularFactor)
        }
    }
}
