use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MasstError, Result};
use crate::peaks::{Peak, Spectrum};

const FETCH_TIMEOUT: Duration = Duration::from_secs(50);

const LIBRARY_USI_PREFIX: &str = "mzspec:GNPS:GNPS-LIBRARY:accession:";

static USI_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mzspec:[^:\s]+:\S+$").expect("usi regex"));
static LIBRARY_ID_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CCMSLIB\d+$").expect("library id regex"));

pub fn looks_like_usi(s: &str) -> bool {
    USI_SHAPE.is_match(s.trim())
}

/// A bare GNPS library accession such as `CCMSLIB00005435899`.
pub fn looks_like_library_id(s: &str) -> bool {
    LIBRARY_ID_SHAPE.is_match(s.trim())
}

/// Anything the search client accepts as `--usi_or_lib_id`.
pub fn is_query_id(s: &str) -> bool {
    looks_like_usi(s) || looks_like_library_id(s)
}

/// Full USI for a query id. Library accessions expand to their GNPS library USI,
/// everything else is returned trimmed.
pub fn resolvable_usi(s: &str) -> String {
    let s = s.trim();
    if looks_like_library_id(s) {
        format!("{LIBRARY_USI_PREFIX}{s}")
    } else {
        s.to_string()
    }
}

/// Spectrum JSON as served by the metabolomics USI resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsiSpectrum {
    #[serde(default)]
    pub peaks: Vec<[f64; 2]>,
    #[serde(default)]
    pub precursor_mz: Option<f64>,
    #[serde(default)]
    pub precursor_charge: Option<i64>,
}

impl UsiSpectrum {
    pub fn from_json(text: &str) -> Result<UsiSpectrum> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_spectrum(self) -> Result<Spectrum> {
        let precursor_mz = self
            .precursor_mz
            .ok_or_else(|| MasstError::Parse("USI spectrum has no precursor_mz".to_string()))?;
        // resolvers report 0 for unknown charge
        let charge = self
            .precursor_charge
            .and_then(|c| u32::try_from(c).ok())
            .filter(|&c| c > 0);
        let peaks = self
            .peaks
            .into_iter()
            .map(|[mz, intensity]| Peak::new(mz, intensity))
            .collect();
        Ok(Spectrum::new(precursor_mz, charge, peaks))
    }
}

/// Source of spectra for USI queries that need their peaks locally.
pub trait UsiFetcher {
    fn fetch(&self, usi: &str) -> Result<UsiSpectrum>;
}

pub struct HttpUsiFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpUsiFetcher {
    pub fn new(base_url: &str) -> Result<HttpUsiFetcher> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(HttpUsiFetcher {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl UsiFetcher for HttpUsiFetcher {
    fn fetch(&self, usi: &str) -> Result<UsiSpectrum> {
        let url = format!("{}/json/", self.base_url);
        debug!("fetching {usi} from {url}");
        let body = self
            .client
            .get(&url)
            .query(&[("usi1", usi)])
            .send()?
            .error_for_status()?
            .text()?;
        UsiSpectrum::from_json(&body)
    }
}

pub fn fetch_usi_spectrum(base_url: &str, usi: &str) -> Result<UsiSpectrum> {
    HttpUsiFetcher::new(base_url)?.fetch(usi)
}
