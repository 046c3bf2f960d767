use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::error::{MasstError, Result};
use crate::results::matches::MatchRecord;
use crate::usi::resolvable_usi;

const LIBRARY_DATASET: &str = "MSV000084314";
const LIBRARY_MGF_DIR: &str = "updates/2020-11-18_mwang87_d115210a/other/MGF";

/// Links comparing a query spectrum against one matched database spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorPlotLinks {
    pub database_usi: String,
    /// Interactive mirror plot on the USI resolver.
    pub interactive: String,
    pub svg: String,
}

/// USI of the matched spectrum. Library search rows carry `Accession` and
/// `DB Scan`; fastMASST rows carry the `USI` directly.
pub fn database_usi(record: &MatchRecord) -> Result<String> {
    let accession = cell_text(record, "Accession");
    let scan = cell_text(record, "DB Scan");
    if let (Some(accession), Some(scan)) = (accession, scan) {
        return Ok(format!(
            "mzspec:{LIBRARY_DATASET}:{LIBRARY_MGF_DIR}/{accession}.mgf:scan:{scan}"
        ));
    }
    cell_text(record, "USI").ok_or_else(|| {
        MasstError::invalid("match has no Accession and DB Scan, and no USI")
    })
}

pub fn mirror_plot_links(
    resolver_url: &str,
    query_usi: &str,
    record: &MatchRecord,
) -> Result<MirrorPlotLinks> {
    let database_usi = database_usi(record)?;
    let query_usi = resolvable_usi(query_usi);
    let params = [("usi1", query_usi.as_str()), ("usi2", database_usi.as_str())];

    let base = resolver_url.trim_end_matches('/');
    let link = |path: &str| {
        Url::parse_with_params(&format!("{base}{path}"), &params)
            .map(String::from)
            .map_err(|e| MasstError::invalid(format!("bad resolver url {resolver_url:?}: {e}")))
    };

    Ok(MirrorPlotLinks {
        interactive: link("/dashinterface")?,
        svg: link("/svg/mirror/")?,
        database_usi,
    })
}

fn cell_text(record: &MatchRecord, column: &str) -> Option<String> {
    match record.get(column)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
