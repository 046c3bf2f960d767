use serde::{Deserialize, Serialize};

use crate::error::{MasstError, Result};

/// Scoring thresholds passed through to the search client. Ranges are the ones
/// the dashboards accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Da
    pub precursor_mz_tol: f64,
    /// Da
    pub mz_tol: f64,
    pub min_cos: f64,
    pub min_matched_signals: u32,
    pub analog: bool,
    pub analog_mass_below: f64,
    pub analog_mass_above: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            precursor_mz_tol: 0.05,
            mz_tol: 0.05,
            min_cos: 0.7,
            min_matched_signals: 3,
            analog: false,
            analog_mass_below: 130.0,
            analog_mass_above: 200.0,
        }
    }
}

fn check_range(name: &str, v: f64, lo: f64, hi: f64) -> Result<()> {
    if !v.is_finite() || v < lo || v > hi {
        return Err(MasstError::invalid(format!(
            "{name} must be within {lo}..={hi}, got {v}"
        )));
    }
    Ok(())
}

impl SearchParams {
    pub fn validate(&self) -> Result<()> {
        check_range("precursor_mz_tol", self.precursor_mz_tol, 0.01, 0.2)?;
        check_range("mz_tol", self.mz_tol, 0.01, 0.2)?;
        check_range("min_cos", self.min_cos, 0.5, 1.0)?;
        check_range(
            "min_matched_signals",
            self.min_matched_signals as f64,
            1.0,
            100.0,
        )?;
        check_range("analog_mass_below", self.analog_mass_below, 0.0, 300.0)?;
        check_range("analog_mass_above", self.analog_mass_above, 0.0, 300.0)?;
        Ok(())
    }
}
