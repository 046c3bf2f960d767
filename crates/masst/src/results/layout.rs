use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MasstError, Result};

pub const MATCHES_ARTIFACT: &str = "fastMASST_matches.tsv";
pub const ERROR_PLACEHOLDER: &str = "html_results/error_result.html";
pub const NO_MATCHES_PLACEHOLDER: &str = "html_results/success_no_matches_metadata.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultState {
    SuccessWithResults,
    SuccessNoMatches,
    Error,
}

impl ResultState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultState::SuccessWithResults => "SUCCESS_WITH_RESULTS",
            ResultState::SuccessNoMatches => "SUCCESS_NO_MATCHES",
            ResultState::Error => "ERROR",
        }
    }
}

impl fmt::Display for ResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactPreference {
    #[default]
    Standard,
    Analog,
}

impl ArtifactPreference {
    pub fn from_analog(analog: bool) -> Self {
        if analog {
            ArtifactPreference::Analog
        } else {
            ArtifactPreference::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub state: ResultState,
    pub path: PathBuf,
}

/// Where one dashboard variant finds the files written by the search client,
/// and what it serves when the report is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLayout {
    pub results_root: PathBuf,
    pub primary_artifact: String,
    #[serde(default)]
    pub analog_artifact: Option<String>,
    #[serde(default = "default_matches_artifact")]
    pub matches_artifact: String,
    #[serde(default = "default_no_matches_placeholder")]
    pub no_matches_placeholder: PathBuf,
    #[serde(default = "default_error_placeholder")]
    pub error_placeholder: PathBuf,
}

fn default_matches_artifact() -> String {
    MATCHES_ARTIFACT.to_string()
}

fn default_no_matches_placeholder() -> PathBuf {
    PathBuf::from(NO_MATCHES_PLACEHOLDER)
}

fn default_error_placeholder() -> PathBuf {
    PathBuf::from(ERROR_PLACEHOLDER)
}

impl ResultLayout {
    pub fn new(results_root: impl Into<PathBuf>, primary_artifact: impl Into<String>) -> Self {
        ResultLayout {
            results_root: results_root.into(),
            primary_artifact: primary_artifact.into(),
            analog_artifact: None,
            matches_artifact: default_matches_artifact(),
            no_matches_placeholder: default_no_matches_placeholder(),
            error_placeholder: default_error_placeholder(),
        }
    }

    pub fn with_analog(mut self, analog_artifact: impl Into<String>) -> Self {
        self.analog_artifact = Some(analog_artifact.into());
        self
    }

    pub fn with_no_matches_placeholder(mut self, path: impl Into<PathBuf>) -> Self {
        self.no_matches_placeholder = path.into();
        self
    }

    /// Layouts without an analog report fall back to the primary one.
    pub fn report_artifact(&self, preference: ArtifactPreference) -> &str {
        match (preference, self.analog_artifact.as_deref()) {
            (ArtifactPreference::Analog, Some(analog)) => analog,
            _ => &self.primary_artifact,
        }
    }

    pub fn job_dir(&self, job_id: &str) -> Result<PathBuf> {
        let id = sanitize_job_id(job_id)?;
        Ok(self.results_root.join(id))
    }

    /// Maps a job to its result state using file existence only. This is a
    /// snapshot: a job still being written reads as whatever is on disk now.
    pub fn resolve(&self, job_id: &str, preference: ArtifactPreference) -> Result<Resolution> {
        let dir = self.job_dir(job_id)?;

        let report = dir.join(self.report_artifact(preference));
        if report.is_file() {
            debug!("job {job_id}: report found at {}", report.display());
            return Ok(Resolution {
                state: ResultState::SuccessWithResults,
                path: report,
            });
        }

        let matches = dir.join(&self.matches_artifact);
        if matches.is_file() {
            debug!("job {job_id}: matches table without report");
            return Ok(Resolution {
                state: ResultState::SuccessNoMatches,
                path: self.no_matches_placeholder.clone(),
            });
        }

        debug!("job {job_id}: no artifacts under {}", dir.display());
        Ok(Resolution {
            state: ResultState::Error,
            path: self.error_placeholder.clone(),
        })
    }
}

/// Reduces a job id to a single path component. Anything that would change
/// under that reduction is rejected instead of silently rewritten.
pub fn sanitize_job_id(job_id: &str) -> Result<&str> {
    if job_id.contains('\0') {
        return Err(MasstError::invalid("job id contains a NUL byte"));
    }

    let base = Path::new(job_id)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    if base.is_empty() || base == "." || base == ".." {
        return Err(MasstError::invalid(format!(
            "job id {job_id:?} has no usable basename"
        )));
    }
    if base != job_id || base.contains('\\') {
        return Err(MasstError::invalid(format!(
            "job id {job_id:?} is not a plain file name"
        )));
    }

    Ok(base)
}
