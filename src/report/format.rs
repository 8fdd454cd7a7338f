//! Text and JSON rendering of diagnostics.
//!
//! Formatting lives here so the numerical code never has to care about output.

use crate::error::{QrError, Result};

use super::Diagnostics;

/// Render a comparison table, one row per method.
pub fn format_diagnostics(rows: &[Diagnostics]) -> String {
    let mut out = String::new();
    if let Some(first) = rows.first() {
        out.push_str(&format!("=== QR diagnostics ({}x{}) ===\n", first.rows, first.cols));
    }
    out.push_str(&format!(
        "{:<24} {:>5} {:>12} {:>12} {:>12}\n",
        "method", "rank", "orth_err", "recon_err", "lower_max"
    ));
    for d in rows {
        out.push_str(&format!(
            "{:<24} {:>5} {:>12.3e} {:>12.3e} {:>12.3e}\n",
            d.method.display_name(),
            d.rank,
            d.orthogonality_error,
            d.reconstruction_error,
            d.lower_triangle_max
        ));
    }
    out
}

/// Serialize diagnostics as pretty-printed JSON.
pub fn to_json(rows: &[Diagnostics]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(|e| QrError::Serialization(e.to_string()))
}
