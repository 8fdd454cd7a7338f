//! Results derived from a factorization: least-squares solves and the
//! regularised pseudo-inverse.

pub mod least_squares;
pub mod pinv;

pub use least_squares::least_squares;
pub use pinv::pseudo_inverse;
