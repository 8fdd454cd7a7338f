//! Numerical kernels: pivot degeneracy handling, Givens rotations and
//! triangular back-substitution.

pub mod pivot;
pub mod triangular;

pub use pivot::*;
pub use triangular::*;
