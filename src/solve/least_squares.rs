//! Least-squares solve against a computed factorization.
//!
//! With `A·P = Q·R` the problem `min ‖A x − b‖₂` becomes
//!
//! ```text
//! R z = Qᵀ b,   x = P z
//! ```
//!
//! solved by back-substitution. Degenerate pivots leave their unknown at zero.

use nalgebra::DMatrix;

use crate::error::{QrError, Result};
use crate::math::back_substitute;

/// Solve for every column of `b`. Returns an `n × b.ncols()` matrix.
pub fn least_squares(
    q: &DMatrix<f64>,
    r: &DMatrix<f64>,
    perm: &[usize],
    b: &DMatrix<f64>,
    tol: f64,
) -> Result<DMatrix<f64>> {
    let m = q.nrows();
    if b.nrows() != m {
        return Err(QrError::DimensionMismatch {
            expected: m,
            got: b.nrows(),
        });
    }

    let c = q.tr_mul(b);
    let z = back_substitute(r, &c, tol);
    Ok(unpermute_rows(&z, perm))
}

/// `P·z`: row `i` of `z` becomes row `perm[i]` of the result.
pub(crate) fn unpermute_rows(z: &DMatrix<f64>, perm: &[usize]) -> DMatrix<f64> {
    let mut x = DMatrix::zeros(z.nrows(), z.ncols());
    for (i, &p) in perm.iter().enumerate() {
        x.set_row(p, &z.row(i));
    }
    x
}
