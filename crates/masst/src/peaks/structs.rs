use serde::{Deserialize, Serialize};

use crate::peaks::parse::format_float;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Peak { mz, intensity }
    }
}

/// A parsed peak that remembers the tokens it was read from, so that it can be
/// written back exactly as the user typed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPeak<'a> {
    pub peak: Peak,
    pub mz_text: &'a str,
    pub intensity_text: &'a str,
}

pub trait AsPeak {
    fn as_peak(&self) -> Peak;

    fn to_line(&self) -> String {
        let p = self.as_peak();
        format!("{} {}", format_float(p.mz), format_float(p.intensity))
    }
}

impl AsPeak for Peak {
    #[inline]
    fn as_peak(&self) -> Peak {
        *self
    }
}

impl AsPeak for RawPeak<'_> {
    #[inline]
    fn as_peak(&self) -> Peak {
        self.peak
    }

    fn to_line(&self) -> String {
        format!("{} {}", self.mz_text, self.intensity_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub precursor_mz: f64,
    pub charge: Option<u32>,
    /// Written as `SEQ=` when present. The search client only needs a placeholder.
    pub sequence: Option<String>,
    pub peaks: Vec<Peak>,
}

impl Spectrum {
    pub fn new(precursor_mz: f64, charge: Option<u32>, peaks: Vec<Peak>) -> Self {
        Spectrum {
            precursor_mz,
            charge,
            sequence: None,
            peaks,
        }
    }
}
