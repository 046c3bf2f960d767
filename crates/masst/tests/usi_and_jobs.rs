mod helpers;

use masst::{
    JobId, JobWorkspace, Peak, Spectrum, UsiSpectrum,
    usi::{is_query_id, looks_like_library_id, looks_like_usi, resolvable_usi},
};

use helpers::{plant_layout, temp_root};

#[test]
fn usi_json_to_spectrum() {
    let usi = UsiSpectrum::from_json(
        r#"{"peaks": [[80.94821, 7964.9106], [81.07002, 8971.145]],
            "n_peaks": 2, "precursor_mz": 556.363, "precursor_charge": 1}"#,
    )
    .expect("json");
    let spectrum = usi.into_spectrum().expect("spectrum");
    assert_eq!(spectrum.precursor_mz, 556.363);
    assert_eq!(spectrum.charge, Some(1));
    assert_eq!(spectrum.peaks[1], Peak::new(81.07002, 8971.145));
}

#[test]
fn usi_json_without_precursor_is_rejected() {
    let usi = UsiSpectrum::from_json(r#"{"peaks": []}"#).expect("json");
    assert!(usi.into_spectrum().is_err());
    assert!(UsiSpectrum::from_json("<html>").is_err());
}

#[test]
fn usi_shape() {
    assert!(looks_like_usi(
        "mzspec:GNPS:GNPS-LIBRARY:accession:CCMSLIB00000085687"
    ));
    assert!(looks_like_usi(
        "mzspec:MSV000084314:updates/a.mgf:scan:1943"
    ));
    assert!(!looks_like_usi("CCMSLIB00000085687"));
    assert!(!looks_like_usi("mzspec:GNPS"));
    assert!(!looks_like_usi(""));
}

#[test]
fn library_ids_are_query_ids() {
    assert!(looks_like_library_id("CCMSLIB00005435899"));
    assert!(looks_like_library_id(" CCMSLIB00005435899\n"));
    assert!(!looks_like_library_id("CCMSLIB"));
    assert!(!looks_like_library_id("ccmslib00005435899"));

    assert!(is_query_id("CCMSLIB00005435899"));
    assert!(is_query_id("mzspec:GNPS:x:scan:1"));
    assert!(!is_query_id("not a usi"));

    assert_eq!(
        resolvable_usi(" CCMSLIB00005435899 "),
        "mzspec:GNPS:GNPS-LIBRARY:accession:CCMSLIB00005435899"
    );
    assert_eq!(resolvable_usi("mzspec:GNPS:x:scan:1"), "mzspec:GNPS:x:scan:1");
}

#[test]
fn job_ids_are_unique_hex() {
    let a = JobId::generate();
    let b = JobId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 32);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(JobId::parse(a.as_str()).is_ok());
    assert!(JobId::parse("../x").is_err());
}

#[test]
fn workspace_layout_on_disk() {
    let root = temp_root();
    let layout = plant_layout(root.path());
    let id = JobId::parse("abc123").expect("id");
    let ws = JobWorkspace::create(&layout, id).expect("workspace");

    assert!(ws.dir().is_dir());
    assert_eq!(ws.dir(), root.path().join("abc123"));
    assert_eq!(ws.output_prefix(), root.path().join("abc123/fastMASST"));

    let scratch_id = JobId::parse("q1").expect("id");
    let scratch = JobWorkspace::create_in(&root.path().join("scratch"), scratch_id)
        .expect("scratch workspace");
    assert!(scratch.dir().is_dir());
    assert_eq!(scratch.dir(), root.path().join("scratch/q1"));

    let spectrum = Spectrum::new(200.0, None, vec![Peak::new(50.5, 1.0)]);
    let path = ws.write_query(&spectrum).expect("write");
    assert_eq!(path, root.path().join("abc123/input_spectra.mgf"));
    assert_eq!(
        std::fs::read_to_string(path).expect("read"),
        "BEGIN IONS\nPEPMASS=200.0\nMSLEVEL=2\nCHARGE=1\n50.5 1.0\nEND IONS\n"
    );
}
