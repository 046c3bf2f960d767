use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::config::MasstConfig;
use crate::error::{MasstError, Result};
use crate::peaks::{Spectrum, validate_cap};
use crate::results::{
    ArtifactPreference, MasstVariant, MatchRecord, Resolution, ResultLayout, read_matches,
    sanitize_job_id,
};
use crate::search::{SearchCommand, SearchParams, SearchQuery};
use crate::usi::{HttpUsiFetcher, UsiFetcher, is_query_id, resolvable_usi};

pub const QUERY_MGF_NAME: &str = "input_spectra.mgf";
pub const OUTPUT_PREFIX_NAME: &str = "fastMASST";
pub const LIBRARY_RESULTS_NAME: &str = "search_results.tsv";
/// `SEQ=` placeholder the compiled library search expects on its query.
pub const LIBRARY_QUERY_SEQUENCE: &str = "*..*";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// 32 lowercase hex characters.
    pub fn generate() -> JobId {
        let bits: u128 = rand::rng().random();
        JobId(format!("{bits:032x}"))
    }

    pub fn parse(s: &str) -> Result<JobId> {
        Ok(JobId(sanitize_job_id(s)?.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The per-job directory the search client writes into.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    id: JobId,
    dir: PathBuf,
}

impl JobWorkspace {
    pub fn create(layout: &ResultLayout, id: JobId) -> Result<JobWorkspace> {
        let dir = layout.job_dir(id.as_str())?;
        fs::create_dir_all(&dir)?;
        Ok(JobWorkspace { id, dir })
    }

    /// Same as [`JobWorkspace::create`] but directly under `root`.
    pub fn create_in(root: &Path, id: JobId) -> Result<JobWorkspace> {
        let dir = root.join(id.as_str());
        fs::create_dir_all(&dir)?;
        Ok(JobWorkspace { id, dir })
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn query_mgf_path(&self) -> PathBuf {
        self.dir.join(QUERY_MGF_NAME)
    }

    pub fn output_prefix(&self) -> PathBuf {
        self.dir.join(OUTPUT_PREFIX_NAME)
    }

    pub fn write_query(&self, spectrum: &Spectrum) -> Result<PathBuf> {
        let path = self.query_mgf_path();
        fs::write(&path, spectrum.to_mgf())?;
        debug!("wrote {} peaks to {}", spectrum.peaks.len(), path.display());
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    Usi(String),
    Spectrum(Spectrum),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub input: QueryInput,
    /// Keep only this many peaks. For a USI this forces a local copy of the spectrum.
    pub max_peaks: Option<i64>,
    pub params: SearchParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub exit_code: Option<i32>,
    #[serde(flatten)]
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySearchRequest {
    pub input: QueryInput,
    pub max_peaks: Option<i64>,
    pub analog: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryMatches {
    pub job_id: JobId,
    pub exit_code: Option<i32>,
    pub matches: Vec<MatchRecord>,
}

fn check_query_id(input: &QueryInput) -> Result<()> {
    if let QueryInput::Usi(usi) = input {
        if !is_query_id(usi) {
            return Err(MasstError::invalid(format!(
                "not a USI or library id: {usi:?}"
            )));
        }
    }
    Ok(())
}

pub fn submit(
    config: &MasstConfig,
    variant: MasstVariant,
    request: &SearchRequest,
) -> Result<JobOutcome> {
    let fetcher = HttpUsiFetcher::new(&config.usi_resolver_url)?;
    submit_with(config, variant, request, &fetcher)
}

/// Prepares the query, runs the search client once and resolves whatever it
/// left on disk.
pub fn submit_with(
    config: &MasstConfig,
    variant: MasstVariant,
    request: &SearchRequest,
    fetcher: &dyn UsiFetcher,
) -> Result<JobOutcome> {
    request.params.validate()?;
    validate_cap(request.max_peaks)?;
    check_query_id(&request.input)?;

    let layout = config.layout(variant);
    let workspace = JobWorkspace::create(&layout, JobId::generate())?;
    info!(
        "{variant} job {} in {}",
        workspace.id(),
        workspace.dir().display()
    );

    let query = match &request.input {
        QueryInput::Usi(usi) => {
            let usi = usi.trim();
            match request.max_peaks {
                Some(_) => {
                    let spectrum = fetcher
                        .fetch(&resolvable_usi(usi))?
                        .into_spectrum()?
                        .reduced(request.max_peaks)?;
                    SearchQuery::Mgf(workspace.write_query(&spectrum)?)
                }
                None => SearchQuery::Usi(usi.to_string()),
            }
        }
        QueryInput::Spectrum(spectrum) => {
            let spectrum = match request.max_peaks {
                Some(_) => spectrum.clone().reduced(request.max_peaks)?,
                None => spectrum.clone(),
            };
            SearchQuery::Mgf(workspace.write_query(&spectrum)?)
        }
    };

    let command = SearchCommand::new(
        &config.client,
        &query,
        &workspace.output_prefix(),
        &request.params,
    )?;
    let status = command.run()?;

    let resolution = layout.resolve(
        workspace.id().as_str(),
        ArtifactPreference::from_analog(request.params.analog),
    )?;
    info!("job {} resolved to {}", workspace.id(), resolution.state);

    Ok(JobOutcome {
        job_id: workspace.id().clone(),
        exit_code: status.code(),
        resolution,
    })
}

pub fn search_library(
    config: &MasstConfig,
    request: &LibrarySearchRequest,
) -> Result<LibraryMatches> {
    let fetcher = HttpUsiFetcher::new(&config.usi_resolver_url)?;
    search_library_with(config, request, &fetcher)
}

/// Runs the compiled library search on one spectrum and returns its matches.
/// USI queries are always fetched, since the binary only reads MGF.
pub fn search_library_with(
    config: &MasstConfig,
    request: &LibrarySearchRequest,
    fetcher: &dyn UsiFetcher,
) -> Result<LibraryMatches> {
    validate_cap(request.max_peaks)?;
    check_query_id(&request.input)?;

    let mut spectrum = match &request.input {
        QueryInput::Usi(usi) => fetcher.fetch(&resolvable_usi(usi))?.into_spectrum()?,
        QueryInput::Spectrum(spectrum) => spectrum.clone(),
    };
    if request.max_peaks.is_some() {
        spectrum = spectrum.reduced(request.max_peaks)?;
    }
    spectrum.sequence = Some(LIBRARY_QUERY_SEQUENCE.to_string());

    let workspace = JobWorkspace::create_in(&config.client.scratch_dir, JobId::generate())?;
    let mgf = workspace.write_query(&spectrum)?;
    let table = workspace.dir().join(LIBRARY_RESULTS_NAME);
    info!("library search {} in {}", workspace.id(), workspace.dir().display());

    let status = SearchCommand::library(&config.client, &mgf, &table, request.analog)?.run()?;
    if !table.is_file() {
        return Err(MasstError::Parse(format!(
            "library search wrote no results table ({status})"
        )));
    }
    let matches = read_matches(&table)?;
    debug!("library search {} found {} matches", workspace.id(), matches.len());

    Ok(LibraryMatches {
        job_id: workspace.id().clone(),
        exit_code: status.code(),
        matches,
    })
}
