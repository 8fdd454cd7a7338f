//! Seeded synthetic matrices for tests, benchmarks and method comparisons.
//!
//! Everything here is deterministic given the seed so a failing comparison can
//! be reproduced exactly.

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

/// `rows × cols` matrix with independent standard normal entries.
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Column-major fill keeps the stream order independent of nalgebra internals.
    let entries = (0..rows * cols).map(|_| rng.sample::<f64, _>(StandardNormal));
    DMatrix::from_iterator(rows, cols, entries)
}

/// Square matrix with a guaranteed small condition number.
///
/// Entries are uniform in `[-1, 1]` and the diagonal is shifted by `2n`. The
/// perturbation has spectral norm at most `n`, so every singular value lies in
/// `[n, 3n]` and the 2-norm condition number is at most 3.
pub fn well_conditioned(n: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shift = 2.0 * n as f64;
    let mut a = DMatrix::from_iterator(n, n, (0..n * n).map(|_| rng.gen_range(-1.0..=1.0)));
    for i in 0..n {
        a[(i, i)] += shift;
    }
    a
}
