//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the orthogonalization variant selector (`QrMethod`)
//! - per-handle settings and their defaults (`QrConfig`)

pub mod types;

pub use types::*;
