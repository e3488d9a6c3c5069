//! End-to-end queries through `Session` on measurement files written to the
//! system temp directory.

use std::path::PathBuf;

use firing_viewer::error::{ChannelKey, Operand};
use firing_viewer::{AnalysisError, ChannelRoles, Session};

const EPS: f64 = 1e-12;

/// Write a JSON measurement file and return its path. Each test uses its own
/// name so parallel runs do not collide.
fn fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "firing_viewer_it_{}_{name}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn reference_firing(name: &str) -> PathBuf {
    fixture(
        name,
        r#"{"channels": {
            "M850": {"name": "N2O flow", "units": "kg/s", "time": [0, 1, 2, 3], "data": [10, 10, 10, 10]},
            "M730": {"name": "IPA flow", "units": "kg/s", "time": [0, 1, 2, 3], "data": [5, 5, 5, 5]},
            "LC190": {"name": "Thrust", "units": "N", "time": [0, 1, 2, 3, 4, 5], "data": [0, 100, 200, 300, 200, 0]},
            "PT110": {"name": "Chamber pressure", "time": [0, 1, 2], "data": [0, 0, 0]}
        }}"#,
    )
}

fn open(path: &PathBuf) -> Session {
    let mut session = Session::default();
    session.open(path).expect("open fixture");
    session
}

#[test]
fn of_ratio_on_constant_channels() {
    let path = reference_firing("of_ratio");
    let session = open(&path);

    let r = session.of_ratio(0.0, 3.0).unwrap();
    assert_eq!(r.numerator.mean, 10.0);
    assert_eq!(r.denominator.mean, 5.0);
    assert_eq!(r.ratio, 2.0);
    assert_eq!(r.ratio_error, 0.0);
    assert_eq!(r.numerator.sample_count, 4);

    std::fs::remove_file(path).ok();
}

#[test]
fn series_lengths_match_for_every_channel() {
    let path = reference_firing("lengths");
    let session = open(&path);

    let channels = session.list_channels().unwrap();
    let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["M850", "M730", "LC190", "PT110"]);

    for ch in &channels {
        let view = session.get_series(&ch.id).unwrap();
        assert_eq!(view.time.len(), view.data.len());
        assert_eq!(view.time.len(), ch.len);
    }
    assert_eq!(channels[3].units, "Units");

    std::fs::remove_file(path).ok();
}

#[test]
fn window_past_the_data_is_empty() {
    let path = reference_firing("empty_window");
    let session = open(&path);

    match session.average_thrust(10.0, 20.0) {
        Err(AnalysisError::EmptyWindow { channel, window }) => {
            assert_eq!(channel.as_deref(), Some("LC190"));
            let w = window.expect("window context");
            assert_eq!((w.start(), w.end()), (10.0, 20.0));
        }
        other => panic!("expected EmptyWindow, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn average_thrust_over_window() {
    let path = reference_firing("thrust");
    let session = open(&path);

    // samples at t = 1..=4: 100, 200, 300, 200
    let s = session.average_thrust(1.0, 4.0).unwrap();
    assert_eq!(s.sample_count, 4);
    assert!((s.mean - 200.0).abs() < EPS);
    assert!((s.stddev - 5000.0f64.sqrt()).abs() < 1e-9);

    let whole = session.compute_single_stat("LC190").unwrap();
    assert_eq!(whole.sample_count, 6);

    std::fs::remove_file(path).ok();
}

#[test]
fn inverted_window_is_rejected() {
    let path = reference_firing("inverted");
    let session = open(&path);

    assert!(matches!(
        session.compute_ratio("M850", "M730", 3.0, 0.0),
        Err(AnalysisError::InvalidRange { .. })
    ));

    std::fs::remove_file(path).ok();
}

#[test]
fn zero_mean_denominator_names_its_channel() {
    let path = reference_firing("zero_mean");
    let session = open(&path);

    match session.compute_ratio("M850", "PT110", 0.0, 2.0) {
        Err(AnalysisError::DivideByZero { operand, channel }) => {
            assert_eq!(operand, Operand::Denominator);
            assert_eq!(channel.as_deref(), Some("PT110"));
        }
        other => panic!("expected DivideByZero, got {other:?}"),
    }

    match session.compute_ratio("PT110", "M850", 0.0, 2.0) {
        Err(AnalysisError::DivideByZero { operand, channel }) => {
            assert_eq!(operand, Operand::Numerator);
            assert_eq!(channel.as_deref(), Some("PT110"));
        }
        other => panic!("expected DivideByZero, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn swapped_ratio_is_reciprocal() {
    let path = fixture(
        "reciprocal",
        r#"{"channels": {
            "A": {"name": "a", "time": [0, 1, 2, 3], "data": [3.1, 2.9, 3.3, 2.7]},
            "B": {"name": "b", "time": [0, 1, 2, 3], "data": [1.2, 1.25, 1.15, 1.3]}
        }}"#,
    );
    let session = open(&path);

    let ab = session.compute_ratio("A", "B", 0.0, 3.0).unwrap();
    let ba = session.compute_ratio("B", "A", 0.0, 3.0).unwrap();
    assert!((ab.ratio - 1.0 / ba.ratio).abs() < 1e-9);
    assert!(ab.ratio_error > 0.0);

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_channels_group_is_format_error() {
    let path = fixture("no_group", r#"{"signals": {"M850": {}}}"#);
    let mut session = Session::default();

    assert!(matches!(
        session.open(&path),
        Err(AnalysisError::FileFormat { .. })
    ));
    assert!(!session.is_open());

    std::fs::remove_file(path).ok();
}

#[test]
fn unknown_name_is_not_found() {
    let path = fixture(
        "no_lc190",
        r#"{"channels": {"M850": {"name": "N2O flow", "time": [0], "data": [1]}}}"#,
    );
    let session = open(&path);
    let catalog = session.catalog().unwrap();

    match catalog.channel_by_name("LC190") {
        Err(AnalysisError::NotFound { key }) => assert_eq!(key, ChannelKey::Name("LC190".into())),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(
        session.average_thrust(0.0, 1.0),
        Err(AnalysisError::NotFound { key: ChannelKey::Id(_) })
    ));

    std::fs::remove_file(path).ok();
}

#[test]
fn roles_come_from_configuration() {
    let path = fixture(
        "custom_roles",
        r#"{"channels": {
            "OX1": {"name": "LOX flow", "time": [0, 1], "data": [6, 6]},
            "FU1": {"name": "RP-1 flow", "time": [0, 1], "data": [2, 2]},
            "LC1": {"name": "Thrust", "time": [0, 1], "data": [900, 1100]}
        }}"#,
    );
    let roles = ChannelRoles {
        oxidizer: "OX1".into(),
        fuel: "FU1".into(),
        thrust: "LC1".into(),
    };
    let mut session = Session::new(roles);
    session.open(&path).unwrap();

    assert_eq!(session.of_ratio(0.0, 1.0).unwrap().ratio, 3.0);
    assert_eq!(session.average_thrust(0.0, 1.0).unwrap().mean, 1000.0);

    std::fs::remove_file(path).ok();
}

#[test]
fn reopening_replaces_the_catalog() {
    let first = reference_firing("reopen_first");
    let second = fixture(
        "reopen_second",
        r#"{"channels": {"X": {"name": "only", "time": [0], "data": [1]}}}"#,
    );
    let mut session = open(&first);
    assert_eq!(session.list_channels().unwrap().len(), 4);

    session.open(&second).unwrap();
    assert_eq!(session.list_channels().unwrap().len(), 1);
    assert!(matches!(
        session.get_series("M850"),
        Err(AnalysisError::NotFound { .. })
    ));

    // A failed load leaves nothing open rather than the previous file.
    let missing = std::env::temp_dir().join("firing_viewer_it_missing.json");
    assert!(session.open(&missing).is_err());
    assert!(matches!(session.list_channels(), Err(AnalysisError::NoFileLoaded)));

    std::fs::remove_file(first).ok();
    std::fs::remove_file(second).ok();
}
