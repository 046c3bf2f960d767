use std::{collections::BTreeMap, fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MasstError, Result};
use crate::results::{MasstVariant, ResultLayout};
use crate::search::SearchParams;

pub const DEFAULT_USI_RESOLVER_URL: &str = "https://metabolomics-usi.gnps2.org";

/// How to launch the external search client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub python: PathBuf,
    /// Working directory for the client; relative script names resolve here.
    pub client_dir: PathBuf,
    pub usi_script: String,
    pub batch_script: String,
    pub parallel_queries: u32,
    /// Working directory of the compiled library search; the binary and library
    /// paths below resolve here.
    pub search_dir: PathBuf,
    pub search_binary: PathBuf,
    pub search_library: PathBuf,
    /// Where library searches keep their query MGF and result table.
    pub scratch_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            python: PathBuf::from("python"),
            client_dir: PathBuf::from("microbe_masst/code"),
            usi_script: "masst_client.py".to_string(),
            batch_script: "masst_batch_client.py".to_string(),
            parallel_queries: 1,
            search_dir: PathBuf::from("."),
            search_binary: PathBuf::from("bin/search"),
            search_library: PathBuf::from("bin/library"),
            scratch_dir: PathBuf::from("temp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasstConfig {
    pub client: ClientConfig,
    pub search: SearchParams,
    pub usi_resolver_url: String,
    /// Per-variant overrides keyed by variant name; anything missing uses the
    /// built-in layout.
    pub variants: BTreeMap<String, ResultLayout>,
}

impl Default for MasstConfig {
    fn default() -> Self {
        MasstConfig {
            client: ClientConfig::default(),
            search: SearchParams::default(),
            usi_resolver_url: DEFAULT_USI_RESOLVER_URL.to_string(),
            variants: BTreeMap::new(),
        }
    }
}

impl MasstConfig {
    pub fn from_json(text: &str) -> Result<MasstConfig> {
        let mut cfg: MasstConfig = serde_json::from_str(text)?;

        let mut variants = BTreeMap::new();
        for (name, layout) in std::mem::take(&mut cfg.variants) {
            let variant: MasstVariant = name.parse().map_err(MasstError::InvalidArgument)?;
            variants.insert(variant.name().to_string(), layout);
        }
        cfg.variants = variants;

        cfg.search.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<MasstConfig> {
        let text = fs::read_to_string(path)?;
        MasstConfig::from_json(&text)
    }

    pub fn layout(&self, variant: MasstVariant) -> ResultLayout {
        self.variants
            .get(variant.name())
            .cloned()
            .unwrap_or_else(|| variant.default_layout())
    }
}
