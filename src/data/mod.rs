//! Synthetic input matrices.

pub mod sample;

pub use sample::*;
