use std::io::Write;

use crate::error::{MasstError, Result};
use crate::peaks::parse::{format_float, parse_peak_text};
use crate::peaks::reduce::reduce_peaks;
use crate::peaks::structs::{AsPeak, Peak, Spectrum};

const DEFAULT_CHARGE: u32 = 1;
const MS_LEVEL: u8 = 2;
const PRECURSOR_MZ_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10000.0;

impl Spectrum {
    /// Builds a query spectrum from a pasted peak list. Without a cap the peaks are
    /// kept in the order given; with one they go through [`reduce_peaks`].
    pub fn from_peak_text(
        text: &str,
        precursor_mz: f64,
        charge: Option<u32>,
        cap: Option<i64>,
    ) -> Result<Spectrum> {
        check_precursor(precursor_mz)?;

        let raw = parse_peak_text(text);
        if raw.is_empty() {
            return Err(MasstError::invalid(
                "no valid m/z intensity pairs found in peak list",
            ));
        }

        let peaks: Vec<Peak> = match cap {
            Some(_) => reduce_peaks(&raw, cap)?
                .iter()
                .map(AsPeak::as_peak)
                .collect(),
            None => raw.iter().map(AsPeak::as_peak).collect(),
        };

        Ok(Spectrum::new(precursor_mz, charge, peaks))
    }

    pub fn reduced(mut self, cap: Option<i64>) -> Result<Spectrum> {
        self.peaks = reduce_peaks(&self.peaks, cap)?;
        Ok(self)
    }

    pub fn write_mgf<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "BEGIN IONS")?;
        if let Some(seq) = self.sequence.as_deref() {
            writeln!(w, "SEQ={seq}")?;
        }
        writeln!(w, "PEPMASS={}", format_float(self.precursor_mz))?;
        writeln!(w, "MSLEVEL={MS_LEVEL}")?;
        writeln!(w, "CHARGE={}", self.charge.unwrap_or(DEFAULT_CHARGE))?;
        for p in &self.peaks {
            writeln!(w, "{}", p.to_line())?;
        }
        writeln!(w, "END IONS")?;
        Ok(())
    }

    pub fn to_mgf(&self) -> String {
        let mut buf = Vec::with_capacity(64 + self.peaks.len() * 24);
        // writing into a Vec cannot fail
        let _ = self.write_mgf(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn check_precursor(precursor_mz: f64) -> Result<()> {
    if !PRECURSOR_MZ_RANGE.contains(&precursor_mz) {
        return Err(MasstError::invalid(format!(
            "precursor m/z must be within {}..={}, got {precursor_mz}",
            PRECURSOR_MZ_RANGE.start(),
            PRECURSOR_MZ_RANGE.end()
        )));
    }
    Ok(())
}
