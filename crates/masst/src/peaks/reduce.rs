use hashbrown::HashMap;

use crate::error::{MasstError, Result};
use crate::peaks::parse::{format_peak_lines, parse_peak_text};
use crate::peaks::structs::AsPeak;

/// `None` means uncapped. Any cap below one is rejected rather than read as
/// "no cap".
pub fn validate_cap(cap: Option<i64>) -> Result<Option<usize>> {
    match cap {
        None => Ok(None),
        Some(n) if n <= 0 => Err(MasstError::invalid(format!(
            "max peaks must be a positive integer, got {n}"
        ))),
        Some(n) => usize::try_from(n)
            .map(Some)
            .map_err(|_| MasstError::invalid(format!("max peaks out of range: {n}"))),
    }
}

/// Bucket key for deduplication. Half-way values round to the even integer.
#[inline]
fn mz_bucket(mz: f64) -> i64 {
    mz.round_ties_even() as i64
}

/// Keeps the most intense peak per rounded m/z, then the `cap` most intense of
/// those, returned in ascending m/z order. Emitted m/z values are never rounded.
pub fn reduce_peaks<P: AsPeak + Clone>(peaks: &[P], cap: Option<i64>) -> Result<Vec<P>> {
    let cap = validate_cap(cap)?;

    let mut kept: Vec<P> = Vec::new();
    let mut slot_of: HashMap<i64, usize> = HashMap::with_capacity(peaks.len());

    for p in peaks {
        let peak = p.as_peak();
        match slot_of.get(&mz_bucket(peak.mz)) {
            Some(&slot) => {
                // strictly greater: the first peak seen wins a tie
                if peak.intensity > kept[slot].as_peak().intensity {
                    kept[slot] = p.clone();
                }
            }
            None => {
                slot_of.insert(mz_bucket(peak.mz), kept.len());
                kept.push(p.clone());
            }
        }
    }

    kept.sort_by(|a, b| b.as_peak().intensity.total_cmp(&a.as_peak().intensity));
    if let Some(n) = cap {
        kept.truncate(n);
    }
    kept.sort_by(|a, b| a.as_peak().mz.total_cmp(&b.as_peak().mz));

    Ok(kept)
}

pub fn reduce_peak_text(text: &str, cap: Option<i64>) -> Result<String> {
    validate_cap(cap)?;

    let peaks = parse_peak_text(text);
    if peaks.is_empty() && !text.trim().is_empty() {
        return Err(MasstError::invalid(
            "no valid m/z intensity pairs found in peak list",
        ));
    }

    let reduced = reduce_peaks(&peaks, cap)?;
    Ok(format_peak_lines(&reduced))
}
