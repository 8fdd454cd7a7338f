//! Shared configuration types.
//!
//! Both types are small, `Copy` and serializable. A caller can:
//!
//! - pick an orthogonalization variant per handle
//! - tune the degeneracy threshold and pseudo-inverse regularization
//! - load both from the environment (`.env`) without touching code

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QrError, Result};

/// Residual norm at or below which a column is treated as linearly dependent.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Diagonal shift applied to R before inverting it for the pseudo-inverse.
pub const DEFAULT_REGULARIZATION: f64 = 1e-8;

/// Column block width used by Block Gram-Schmidt.
pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Orthogonalization algorithm used to compute Q and R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrMethod {
    /// Classical Gram-Schmidt.
    #[default]
    Cgs,
    /// Modified Gram-Schmidt.
    Mgs,
    /// Iterative Gram-Schmidt (two projection passes).
    Igs,
    /// Block Gram-Schmidt.
    Bgs,
    /// Reordered Gram-Schmidt (columns sorted by decreasing norm).
    Rgs,
    /// Classical Gram-Schmidt with column pivoting.
    Cgsp,
    /// Householder reflections.
    Householder,
    /// Givens rotations.
    Givens,
}

impl QrMethod {
    pub const ALL: [QrMethod; 8] = [
        QrMethod::Cgs,
        QrMethod::Mgs,
        QrMethod::Igs,
        QrMethod::Bgs,
        QrMethod::Rgs,
        QrMethod::Cgsp,
        QrMethod::Householder,
        QrMethod::Givens,
    ];

    /// Human-readable label for reports.
    pub fn display_name(self) -> &'static str {
        match self {
            QrMethod::Cgs => "Classical Gram-Schmidt",
            QrMethod::Mgs => "Modified Gram-Schmidt",
            QrMethod::Igs => "Iterative Gram-Schmidt",
            QrMethod::Bgs => "Block Gram-Schmidt",
            QrMethod::Rgs => "Reordered Gram-Schmidt",
            QrMethod::Cgsp => "Pivoted Gram-Schmidt",
            QrMethod::Householder => "Householder",
            QrMethod::Givens => "Givens",
        }
    }

    /// Short identifier, also accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            QrMethod::Cgs => "cgs",
            QrMethod::Mgs => "mgs",
            QrMethod::Igs => "igs",
            QrMethod::Bgs => "bgs",
            QrMethod::Rgs => "rgs",
            QrMethod::Cgsp => "cgsp",
            QrMethod::Householder => "householder",
            QrMethod::Givens => "givens",
        }
    }

    /// Whether this variant reorders columns, i.e. factors `A·P` rather than `A`.
    pub fn is_pivoted(self) -> bool {
        matches!(self, QrMethod::Rgs | QrMethod::Cgsp)
    }
}

impl fmt::Display for QrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrMethod {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        QrMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| {
                QrError::config(format!(
                    "Unknown QR method '{s}' (expected one of: cgs, mgs, igs, bgs, rgs, cgsp, \
                     householder, givens)."
                ))
            })
    }
}

/// Per-handle factorization settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QrConfig {
    /// Variant used by `Qr::factorize`.
    pub method: QrMethod,
    /// Absolute norm threshold for declaring a column degenerate.
    pub rank_tolerance: f64,
    /// Diagonal shift used by the pseudo-inverse.
    ///
    /// The resulting inverse is biased by roughly this amount relative to the
    /// exact Moore-Penrose inverse.
    pub regularization: f64,
    /// Number of columns per block for Block Gram-Schmidt.
    pub block_size: usize,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            method: QrMethod::default(),
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
            regularization: DEFAULT_REGULARIZATION,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl QrConfig {
    pub fn with_method(method: QrMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Check that tolerances are finite and positive and the block size is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.rank_tolerance.is_finite() && self.rank_tolerance > 0.0) {
            return Err(QrError::config(format!(
                "rank tolerance must be finite and > 0, got {}",
                self.rank_tolerance
            )));
        }
        if !(self.regularization.is_finite() && self.regularization > 0.0) {
            return Err(QrError::config(format!(
                "regularization must be finite and > 0, got {}",
                self.regularization
            )));
        }
        if self.block_size == 0 {
            return Err(QrError::config("block size must be >= 1"));
        }
        Ok(())
    }

    /// Build a configuration from the process environment (and `.env`, if present).
    ///
    /// Recognised variables, all optional:
    /// - `QR_METHOD` (`cgs`, `mgs`, ...)
    /// - `QR_RANK_TOL`
    /// - `QR_PINV_REG`
    /// - `QR_BLOCK_SIZE`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("QR_METHOD") {
            config.method = v.parse()?;
        }
        if let Some(v) = lookup("QR_RANK_TOL") {
            config.rank_tolerance = parse_value("QR_RANK_TOL", &v)?;
        }
        if let Some(v) = lookup("QR_PINV_REG") {
            config.regularization = parse_value("QR_PINV_REG", &v)?;
        }
        if let Some(v) = lookup("QR_BLOCK_SIZE") {
            config.block_size = parse_value("QR_BLOCK_SIZE", &v)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| QrError::config(format!("Invalid {key}='{raw}': {e}")))
}
