use std::{fs, path::Path};

use clap::Parser;
use masst::{MasstVariant, SearchParams};

use super::{
    Cli, Cmd, SearchTuning, add_mirror_links, apply_tuning, build_name_filter,
    collect_files_with_exts, out_name_for_peak_file, reduced_file_contents, resolve_user_path,
};

fn no_tuning() -> SearchTuning {
    SearchTuning {
        pm_tolerance: None,
        fragment_tolerance: None,
        min_cos: None,
        min_matched_peaks: None,
        analog: false,
        delta_mass_below: None,
        delta_mass_above: None,
    }
}

#[test]
fn tuning_overrides_defaults() {
    let defaults = SearchParams::default();
    assert_eq!(apply_tuning(&defaults, &no_tuning()), defaults);

    let tuned = apply_tuning(
        &defaults,
        &SearchTuning {
            min_cos: Some(0.9),
            analog: true,
            delta_mass_above: Some(50.0),
            ..no_tuning()
        },
    );
    assert_eq!(tuned.min_cos, 0.9);
    assert!(tuned.analog);
    assert_eq!(tuned.analog_mass_above, 50.0);
    assert_eq!(tuned.mz_tol, defaults.mz_tol);
}

#[test]
fn output_names() {
    assert_eq!(
        out_name_for_peak_file(Path::new("/a/b/spectrum1.tsv")),
        "spectrum1.reduced.txt"
    );
    assert_eq!(
        resolve_user_path(Path::new("/work"), Path::new("x/y.txt")),
        Path::new("/work/x/y.txt")
    );
    assert_eq!(
        resolve_user_path(Path::new("/work"), Path::new("/abs.txt")),
        Path::new("/abs.txt")
    );
}

#[test]
fn empty_reductions_write_empty_files() {
    assert_eq!(reduced_file_contents(""), "");
    assert_eq!(reduced_file_contents("100.4 80\n200.0 10"), "100.4 80\n200.0 10\n");
}

#[test]
fn name_filters() {
    let f = build_name_filter(Some("LOVA"), None, None)
        .expect("filter")
        .expect("some");
    assert!(f("lovastatin.tsv"));

    let f = build_name_filter(None, Some("LOVA"), None)
        .expect("filter")
        .expect("some");
    assert!(!f("lovastatin.tsv"));

    let f = build_name_filter(None, None, Some(r"^scan_\d+\.txt$"))
        .expect("filter")
        .expect("some");
    assert!(f("scan_12.txt"));
    assert!(!f("scan_x.txt"));

    assert!(build_name_filter(None, None, Some("(")).is_err());
    assert!(build_name_filter(None, None, None).expect("none").is_none());
}

#[test]
fn collect_peak_lists_recursively() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("nested")).expect("mkdir");
    for name in ["a.tsv", "b.TXT", "nested/c.csv", "skip.mgf", "a.reduced.txt"] {
        fs::write(root.join(name), "100 1\n").expect("write");
    }

    let files = collect_files_with_exts(root, &super::PEAK_LIST_EXTS, None).expect("collect");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(root).expect("prefix").display().to_string())
        .collect();
    assert_eq!(names, vec!["a.tsv", "b.TXT", "nested/c.csv"]);
}

#[test]
fn cli_parses_search_and_resolve() {
    let cli = Cli::try_parse_from([
        "masst",
        "search",
        "--variant",
        "plantMASST",
        "--usi",
        "mzspec:GNPS:GNPS-LIBRARY:accession:CCMSLIB00000085687",
        "--max-peaks",
        "20",
        "--analog",
    ])
    .expect("parse");
    match cli.cmd {
        Some(Cmd::Search(s)) => {
            assert_eq!(s.variant, MasstVariant::Plant);
            assert_eq!(s.max_peaks, Some(20));
            assert!(s.tuning.analog);
        }
        _ => panic!("expected search"),
    }

    let cli = Cli::try_parse_from(["masst", "resolve", "--variant", "food", "--task", "abc"])
        .expect("parse");
    assert!(matches!(cli.cmd, Some(Cmd::Resolve(ref r)) if r.variant == MasstVariant::Food));

    assert!(Cli::try_parse_from(["masst", "resolve", "--variant", "fish", "--task", "x"]).is_err());
    assert!(Cli::try_parse_from(["masst", "search", "--variant", "plant"]).is_err());
}

#[test]
fn cli_reduce_accepts_negative_cap_for_library_to_reject() {
    let cli = Cli::try_parse_from(["masst", "reduce", "peaks.txt", "--max-peaks", "-3"])
        .expect("parse");
    match cli.cmd {
        Some(Cmd::Reduce(r)) => assert_eq!(r.max_peaks, Some(-3)),
        _ => panic!("expected reduce"),
    }
}

#[test]
fn cli_parses_library_search() {
    let cli = Cli::try_parse_from([
        "masst",
        "library",
        "--usi",
        "CCMSLIB00005435899",
        "--analog",
        "--json",
    ])
    .expect("parse");
    match cli.cmd {
        Some(Cmd::Library(l)) => {
            assert_eq!(l.usi.as_deref(), Some("CCMSLIB00005435899"));
            assert!(l.analog && l.json);
            assert_eq!(l.max_peaks, None);
        }
        _ => panic!("expected library"),
    }

    assert!(Cli::try_parse_from(["masst", "library", "--peaks", "p.txt"]).is_err());
    assert!(Cli::try_parse_from(["masst", "library"]).is_err());
}

#[test]
fn matches_get_mirror_links_where_possible() {
    let mut records = masst::results::parse_matches(
        "Query File\tAccession\tDB Scan\tCosine\n\
         q.mgf\tCCMSLIB00000001\t7\t0.91\n\
         q.mgf\t\t\t0.75\n",
    )
    .expect("parse");

    add_mirror_links("https://usi.example.org", "CCMSLIB00000085687", &mut records)
        .expect("links");

    let first = &records[0]["Mirror Plot"];
    assert_eq!(
        first["database_usi"],
        "mzspec:MSV000084314:updates/2020-11-18_mwang87_d115210a/other/MGF/CCMSLIB00000001.mgf:scan:7"
    );
    assert!(
        first["svg"]
            .as_str()
            .expect("svg")
            .starts_with("https://usi.example.org/svg/mirror/?usi1=")
    );
    assert!(records[1]["Mirror Plot"].is_null());
}
