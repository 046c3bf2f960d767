use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::search::{SearchCommand, SearchParams, SearchQuery};

fn client() -> ClientConfig {
    ClientConfig {
        python: PathBuf::from("/usr/bin/python3"),
        client_dir: PathBuf::from("/opt/masst/code"),
        ..Default::default()
    }
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[test]
fn usi_command_arguments() {
    let usi = "mzspec:GNPS:GNPS-LIBRARY:accession:CCMSLIB00000085687";
    let cmd = SearchCommand::new(
        &client(),
        &SearchQuery::Usi(usi.to_string()),
        Path::new("/data/jobs/abc/fastMASST"),
        &SearchParams::default(),
    )
    .expect("command");

    let args = cmd.arg_strings();
    assert_eq!(cmd.program, Path::new("/usr/bin/python3"));
    assert_eq!(cmd.current_dir, Path::new("/opt/masst/code"));
    assert_eq!(args[0], "masst_client.py");
    assert_eq!(value_after(&args, "--usi_or_lib_id"), Some(usi));
    assert_eq!(value_after(&args, "--out_file"), Some("/data/jobs/abc/fastMASST"));
    assert_eq!(value_after(&args, "--precursor_mz_tol"), Some("0.05"));
    assert_eq!(value_after(&args, "--min_cos"), Some("0.7"));
    assert_eq!(value_after(&args, "--min_matched_signals"), Some("3"));
    assert_eq!(value_after(&args, "--analog_mass_below"), Some("130"));
    assert_eq!(value_after(&args, "--analog"), None);
}

#[test]
fn usi_analog_appends_flag() {
    let params = SearchParams {
        analog: true,
        ..Default::default()
    };
    let cmd = SearchCommand::new(
        &client(),
        &SearchQuery::Usi("mzspec:GNPS:x:scan:1".to_string()),
        Path::new("/tmp/out"),
        &params,
    )
    .expect("command");
    let args = cmd.arg_strings();
    assert_eq!(&args[args.len() - 2..], ["--analog", "true"]);
}

#[test]
fn mgf_command_arguments() {
    let cmd = SearchCommand::new(
        &client(),
        &SearchQuery::Mgf(PathBuf::from("/data/jobs/abc/input_spectra.mgf")),
        Path::new("/data/jobs/abc/fastMASST"),
        &SearchParams::default(),
    )
    .expect("command");

    let args = cmd.arg_strings();
    assert_eq!(args[0], "masst_batch_client.py");
    assert_eq!(
        value_after(&args, "--in_file"),
        Some("/data/jobs/abc/input_spectra.mgf")
    );
    assert_eq!(value_after(&args, "--parallel_queries"), Some("1"));
    assert_eq!(value_after(&args, "--analog"), Some("False"));
}

#[test]
fn shell_metacharacters_stay_in_one_argument() {
    let usi = "mzspec:GNPS:x\";rm -rf /;\":scan:1";
    let cmd = SearchCommand::new(
        &client(),
        &SearchQuery::Usi(usi.to_string()),
        Path::new("/tmp/out"),
        &SearchParams::default(),
    )
    .expect("command");
    assert_eq!(value_after(&cmd.arg_strings(), "--usi_or_lib_id"), Some(usi));
}

#[test]
fn invalid_params_fail_before_building() {
    let params = SearchParams {
        min_cos: 2.0,
        ..Default::default()
    };
    let err = SearchCommand::new(
        &client(),
        &SearchQuery::Usi("mzspec:GNPS:x:scan:1".to_string()),
        Path::new("/tmp/out"),
        &params,
    )
    .expect_err("invalid");
    assert!(err.is_invalid_argument());
}

#[test]
fn library_command_arguments() {
    let client = ClientConfig {
        search_dir: PathBuf::from("/opt/masstplus"),
        ..Default::default()
    };
    let plain = SearchCommand::library(
        &client,
        Path::new("/tmp/q/query.mgf"),
        Path::new("/tmp/q/results.tsv"),
        false,
    )
    .expect("command");

    assert_eq!(plain.program, Path::new("/opt/masstplus/bin/search"));
    assert_eq!(plain.current_dir, Path::new("/opt/masstplus"));
    assert_eq!(
        plain.arg_strings(),
        [
            "/tmp/q/query.mgf",
            "-l",
            "/opt/masstplus/bin/library",
            "-o",
            "/tmp/q/results.tsv"
        ]
    );

    let analog = SearchCommand::library(
        &client,
        Path::new("/tmp/q/query.mgf"),
        Path::new("/tmp/q/results.tsv"),
        true,
    )
    .expect("command");
    assert_eq!(analog.arg_strings()[1], "-a");
    assert_eq!(analog.args.len(), 6);
}
