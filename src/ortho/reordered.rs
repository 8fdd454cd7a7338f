//! Column-reordering Gram-Schmidt variants.
//!
//! Both factor `A·P = Q·R` where `P` is the column permutation recorded in
//! `Factors::perm` (`perm[i]` is the original index of column `i` of `A·P`).
//!
//! - RGS fixes the order once, by decreasing initial column norm.
//! - CGSP picks, at each step, the remaining column with the largest residual
//!   norm (rank revealing).

use nalgebra::{DMatrix, DVector};

use super::gram_schmidt::mgs;
use super::{Factors, permute_columns};
use crate::math::normalize_into;

/// Relative drop of a downdated squared norm below which it is recomputed.
const NORM_RECOMPUTE: f64 = 1e-6;

/// Reordered Gram-Schmidt: Modified Gram-Schmidt on columns sorted by
/// decreasing norm. Ties keep their original order.
pub fn rgs(a: &DMatrix<f64>, tol: f64) -> Factors {
    let norms: Vec<f64> = a.column_iter().map(|c| c.norm()).collect();
    let mut perm: Vec<usize> = (0..a.ncols()).collect();
    perm.sort_by(|&x, &y| norms[y].partial_cmp(&norms[x]).unwrap_or(std::cmp::Ordering::Equal));

    let f = mgs(&permute_columns(a, &perm), tol);
    Factors::permuted(f.q, f.r, perm)
}

/// Classical Gram-Schmidt with column pivoting.
pub fn cgsp(a: &DMatrix<f64>, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);

    let mut ap = a.clone();
    let mut perm: Vec<usize> = (0..n).collect();
    // Squared residual norms, and the value they were last computed exactly at.
    let mut pnorms: Vec<f64> = a.column_iter().map(|c| c.norm_squared()).collect();
    let mut xnorms = pnorms.clone();

    let mut q = DMatrix::zeros(m, k);
    let mut r = DMatrix::zeros(k, n);
    let mut u = DVector::zeros(m);

    for i in 0..n {
        if i < k {
            let mut pvt = i;
            for l in (i + 1)..n {
                if pnorms[l] > pnorms[pvt] {
                    pvt = l;
                }
            }
            if pvt != i {
                ap.swap_columns(i, pvt);
                perm.swap(i, pvt);
                pnorms.swap(i, pvt);
                xnorms.swap(i, pvt);
            }
        }

        let v = ap.column(i);
        u.copy_from(&v);
        for j in 0..k.min(i) {
            let e = q.column(j);
            let proj = v.dot(&e);
            r[(j, i)] = proj;
            u.axpy(-proj, &e, 1.0);
        }

        if i >= k {
            continue;
        }
        r[(i, i)] = normalize_into(&mut q, i, &u, tol);
        if r[(i, i)] == 0.0 {
            continue;
        }

        // Downdate the residual norms of the remaining candidates.
        for l in (i + 1)..n {
            let c = q.column(i).dot(&ap.column(l));
            let downdated = pnorms[l] - c * c;
            if downdated <= NORM_RECOMPUTE * xnorms[l] {
                let exact = residual_norm_squared(&q, i + 1, &ap, l);
                pnorms[l] = exact;
                xnorms[l] = exact;
            } else {
                pnorms[l] = downdated;
            }
        }
    }

    Factors::permuted(q, r, perm)
}

/// `‖a_l − Q[:, ..count]·Q[:, ..count]ᵀ·a_l‖²`
fn residual_norm_squared(q: &DMatrix<f64>, count: usize, a: &DMatrix<f64>, l: usize) -> f64 {
    let mut res = a.column(l).clone_owned();
    for j in 0..count {
        let e = q.column(j);
        let c = e.dot(&res);
        res.axpy(-c, &e, 1.0);
    }
    res.norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgs_orders_by_decreasing_norm() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 3.0, 0.0, 2.0, 0.0]);
        let f = rgs(&a, 1e-10);
        assert_eq!(f.perm, vec![2, 1, 0]);
        assert!((&f.q * &f.r - permute_columns(&a, &f.perm)).amax() < 1e-14);
    }

    #[test]
    fn rgs_keeps_ties_in_original_order() {
        let a = DMatrix::<f64>::identity(3, 3);
        assert_eq!(rgs(&a, 1e-10).perm, vec![0, 1, 2]);
    }

    #[test]
    fn cgsp_reveals_rank_with_non_increasing_diagonal() {
        // Rank 2: third column = first + second.
        let a = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 0.0, 1.0, 2.0, 1.0, 3.0, 0.0, 3.0, 3.0, 1.0, 1.0, 2.0],
        );
        let f = cgsp(&a, 1e-10);

        let diag: Vec<f64> = (0..3).map(|i| f.r[(i, i)]).collect();
        assert!(diag[0] >= diag[1] && diag[1] >= diag[2]);
        assert_eq!(diag[2], 0.0);
        assert!(f.q.column(2).iter().all(|&x| x == 0.0));

        // The largest column (index 2, norm sqrt(23)) is picked first.
        assert_eq!(f.perm[0], 2);
        assert!((&f.q * &f.r - permute_columns(&a, &f.perm)).amax() < 1e-12);
    }

    #[test]
    fn cgsp_permutation_is_a_bijection() {
        let a = DMatrix::from_fn(3, 6, |i, j| ((i * 7 + j * 3) % 5) as f64 - 2.0);
        let mut perm = cgsp(&a, 1e-10).perm;
        perm.sort_unstable();
        assert_eq!(perm, (0..6).collect::<Vec<_>>());
    }
}
