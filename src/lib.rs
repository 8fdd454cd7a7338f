//! `qr-engine` library crate.
//!
//! Dense QR decomposition of real matrices with eight interchangeable
//! orthogonalization variants, plus the results derived from a factorization:
//!
//! - least-squares / linear solves (`Qr::solve`)
//! - a regularised pseudo-inverse (`Qr::pseudo_inverse`)
//! - accuracy diagnostics across variants (`report`)

pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod ortho;
pub mod qr;
pub mod report;
pub mod solve;

pub use domain::{QrConfig, QrMethod};
pub use error::{QrError, Result};
pub use qr::Qr;
