use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::peaks::structs::{AsPeak, Peak, RawPeak};

static FIELD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("field separator regex"));

/// Parses one `m/z intensity` line. Fields may be separated by spaces, tabs or
/// commas. Returns `None` unless there are exactly two finite, non-negative numbers.
pub fn parse_peak_line(line: &str) -> Option<RawPeak<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = FIELD_SEPARATOR.split(line).filter(|f| !f.is_empty());
    let mz_text = fields.next()?;
    let intensity_text = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let mz: f64 = mz_text.parse().ok()?;
    let intensity: f64 = intensity_text.parse().ok()?;
    if !mz.is_finite() || !intensity.is_finite() || mz < 0.0 || intensity < 0.0 {
        return None;
    }

    Some(RawPeak {
        peak: Peak { mz, intensity },
        mz_text,
        intensity_text,
    })
}

pub fn parse_peak_text(text: &str) -> Vec<RawPeak<'_>> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_peak_line(line) {
            Some(p) => out.push(p),
            None if line.trim().is_empty() => {}
            None => debug!("skipping malformed peak line {}: {:?}", i + 1, line),
        }
    }
    out
}

pub fn format_peak_lines<P: AsPeak>(peaks: &[P]) -> String {
    peaks
        .iter()
        .map(AsPeak::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers.
pub fn format_float(v: f64) -> String {
    let mut s = format!("{v}");
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        s.push_str(".0");
    }
    s
}
