//! Unit tests for the params module

use super::*;
use std::io::Write;

const SAMPLE: &str = r#"{
    "replicas": { "cores_per_replica": { "0": 1, "4": 2, "8": 4 } },
    "cache": { "entries_per_core": 1000 },
    "memory": { "kib_per_svc": 10, "min_kib": 4096 },
    "cpu": { "requests_per_core": 50 }
}"#;

fn write_params(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_ignores_unrelated_sections() {
    let params = ScalerParams::from_json(SAMPLE).unwrap();
    let ladder = params.ladder().unwrap();
    let steps: Vec<(u32, u32)> = ladder.iter().collect();
    assert_eq!(steps, vec![(0, 1), (4, 2), (8, 4)]);
}

#[test]
fn test_thresholds_are_ordered_numerically_not_lexically() {
    let params =
        ScalerParams::from_json(r#"{"replicas": {"cores_per_replica": {"100": 5, "20": 3, "3": 2}}}"#)
            .unwrap();
    let thresholds: Vec<u32> = params.ladder().unwrap().iter().map(|(t, _)| t).collect();
    assert_eq!(thresholds, vec![3, 20, 100]);
}

#[test]
fn test_missing_replicas_section_is_malformed() {
    let err = ScalerParams::from_json(r#"{"cache": {"entries_per_core": 1}}"#).unwrap_err();
    assert!(matches!(err, ParamsError::Malformed(_)));
}

#[test]
fn test_invalid_json_is_malformed() {
    let err = ScalerParams::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ParamsError::Malformed(_)));
}

#[test]
fn test_non_integer_replicas_is_malformed() {
    let err = ScalerParams::from_json(r#"{"replicas": {"cores_per_replica": {"0": "two"}}}"#)
        .unwrap_err();
    assert!(matches!(err, ParamsError::Malformed(_)));
}

#[test]
fn test_empty_ladder_is_accepted() {
    let params = ScalerParams::from_json(r#"{"replicas": {}}"#).unwrap();
    assert!(params.ladder().unwrap().is_empty());
}

#[test]
fn test_rejects_bad_threshold_keys() {
    for key in ["-1", "four", "+4", "", "1.5", "99999999999", " 4", "4 "] {
        let json = format!(r#"{{"replicas": {{"cores_per_replica": {{"{key}": 1}}}}}}"#);
        let err = ScalerParams::from_json(&json).unwrap().ladder().unwrap_err();
        assert!(
            matches!(err, ParamsError::InvalidThreshold(ref k) if k == key),
            "key {key:?} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn test_rejects_thresholds_that_collide_after_parsing() {
    let params =
        ScalerParams::from_json(r#"{"replicas": {"cores_per_replica": {"4": 1, "04": 2}}}"#)
            .unwrap();
    assert!(matches!(params.ladder().unwrap_err(), ParamsError::DuplicateThreshold(4)));
}

#[test]
fn test_rejects_non_positive_replicas() {
    let params =
        ScalerParams::from_json(r#"{"replicas": {"cores_per_replica": {"0": 1, "8": 0}}}"#)
            .unwrap();
    assert!(matches!(
        params.ladder().unwrap_err(),
        ParamsError::InvalidReplicas { threshold: 8, replicas: 0 }
    ));
}

#[test]
fn test_load_ladder_from_file() {
    let file = write_params(SAMPLE);
    let ladder = load_ladder(file.path()).unwrap();
    assert_eq!(ladder.len(), 3);
}

#[test]
fn test_load_ladder_rereads_file() {
    let file = write_params(SAMPLE);
    assert_eq!(load_ladder(file.path()).unwrap().len(), 3);

    std::fs::write(file.path(), r#"{"replicas": {"cores_per_replica": {"0": 2}}}"#).unwrap();
    let steps: Vec<(u32, u32)> = load_ladder(file.path()).unwrap().iter().collect();
    assert_eq!(steps, vec![(0, 2)]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_ladder(&path).unwrap_err();
    assert!(matches!(err, ParamsError::NotFound(ref p) if *p == path));
}

#[test]
fn test_directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_ladder(dir.path()).unwrap_err();
    assert!(matches!(err, ParamsError::Unreadable { .. }));
}
