use crate::search::SearchParams;

#[test]
fn defaults_are_valid() {
    let p = SearchParams::default();
    p.validate().expect("defaults validate");
    assert_eq!(p.precursor_mz_tol, 0.05);
    assert_eq!(p.min_matched_signals, 3);
    assert!(!p.analog);
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases: Vec<SearchParams> = vec![
        SearchParams { precursor_mz_tol: 0.5, ..Default::default() },
        SearchParams { mz_tol: 0.0, ..Default::default() },
        SearchParams { min_cos: 0.2, ..Default::default() },
        SearchParams { min_matched_signals: 0, ..Default::default() },
        SearchParams { analog_mass_above: 301.0, ..Default::default() },
        SearchParams { analog_mass_below: f64::NAN, ..Default::default() },
    ];
    for p in cases {
        let err = p.validate().expect_err("should be rejected");
        assert!(err.is_invalid_argument());
    }
}

#[test]
fn partial_json_fills_defaults() {
    let p: SearchParams = serde_json::from_str(r#"{"min_cos": 0.8, "analog": true}"#)
        .expect("params json");
    assert_eq!(p.min_cos, 0.8);
    assert!(p.analog);
    assert_eq!(p.mz_tol, 0.05);
}
