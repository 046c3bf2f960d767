use std::{
    ffi::OsString,
    fmt, path,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use log::{debug, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::search::params::SearchParams;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    Usi(String),
    Mgf(PathBuf),
}

/// One invocation of the external search client, kept as a program plus an
/// argument vector so nothing passes through a shell.
#[derive(Debug, Clone)]
pub struct SearchCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: PathBuf,
}

impl SearchCommand {
    pub fn new(
        client: &ClientConfig,
        query: &SearchQuery,
        out_prefix: &Path,
        params: &SearchParams,
    ) -> Result<SearchCommand> {
        params.validate()?;

        let current_dir = path::absolute(&client.client_dir)?;
        let out_prefix = path::absolute(out_prefix)?;

        let mut args: Vec<OsString> = Vec::with_capacity(24);
        match query {
            SearchQuery::Usi(usi) => {
                args.push(client.usi_script.clone().into());
                push_pair(&mut args, "--usi_or_lib_id", usi);
                push_pair(&mut args, "--out_file", out_prefix.as_os_str());
            }
            SearchQuery::Mgf(mgf) => {
                args.push(client.batch_script.clone().into());
                push_pair(&mut args, "--in_file", path::absolute(mgf)?.as_os_str());
                push_pair(&mut args, "--out_file", out_prefix.as_os_str());
                push_pair(
                    &mut args,
                    "--parallel_queries",
                    client.parallel_queries.to_string(),
                );
            }
        }

        push_pair(&mut args, "--precursor_mz_tol", params.precursor_mz_tol.to_string());
        push_pair(&mut args, "--mz_tol", params.mz_tol.to_string());
        push_pair(&mut args, "--min_cos", params.min_cos.to_string());
        push_pair(
            &mut args,
            "--min_matched_signals",
            params.min_matched_signals.to_string(),
        );

        match query {
            // the batch client always takes an explicit flag value
            SearchQuery::Mgf(_) => push_pair(
                &mut args,
                "--analog",
                if params.analog { "True" } else { "False" },
            ),
            SearchQuery::Usi(_) => {}
        }

        push_pair(&mut args, "--analog_mass_below", params.analog_mass_below.to_string());
        push_pair(&mut args, "--analog_mass_above", params.analog_mass_above.to_string());

        if params.analog && matches!(query, SearchQuery::Usi(_)) {
            push_pair(&mut args, "--analog", "true");
        }

        Ok(SearchCommand {
            program: client.python.clone(),
            args,
            current_dir,
        })
    }

    /// The compiled library search:
    /// `<search_binary> <mgf> [-a] -l <search_library> -o <table>`, run from the
    /// search directory.
    pub fn library(
        client: &ClientConfig,
        query_mgf: &Path,
        out_table: &Path,
        analog: bool,
    ) -> Result<SearchCommand> {
        let current_dir = path::absolute(&client.search_dir)?;

        let mut args: Vec<OsString> = Vec::with_capacity(6);
        args.push(path::absolute(query_mgf)?.into());
        if analog {
            args.push("-a".into());
        }
        push_pair(&mut args, "-l", current_dir.join(&client.search_library));
        push_pair(&mut args, "-o", path::absolute(out_table)?);

        Ok(SearchCommand {
            program: current_dir.join(&client.search_binary),
            args,
            current_dir,
        })
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir);
        cmd
    }

    /// Runs the command to completion. A failing exit is only logged; callers
    /// decide the outcome from the files left behind.
    pub fn run(&self) -> Result<ExitStatus> {
        debug!("running search client: {self}");
        let status = self.command().status()?;
        if !status.success() {
            warn!("search client exited with {status}");
        }
        Ok(status)
    }

    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(cd {}) {}", self.current_dir.display(), self.program.display())?;
        for a in &self.args {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

fn push_pair(args: &mut Vec<OsString>, flag: &str, value: impl Into<OsString>) {
    args.push(flag.into());
    args.push(value.into());
}
