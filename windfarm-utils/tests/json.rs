use serde_json::json;
use std::{collections::BTreeMap, fs};
use windfarm_utils::*;

#[test]
fn test_jsonify_sorts_keys() {
    let value = json!({"b": 1, "a": {"d": [{"z": 0, "y": 1}], "c": 2}});
    assert_eq!(
        jsonify(&value).unwrap(),
        r#"{"a":{"c":2,"d":[{"y":1,"z":0}]},"b":1}"#
    );
}

#[test]
fn test_load_json_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    match load_json(&path) {
        Err(LoadError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_load_json_invalid_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"substations\": [").unwrap();
    assert!(matches!(
        load_json(&path),
        Err(LoadError::InvalidJson { .. })
    ));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("verdict.json");
    let value = json!({"score": 250.0, "errors": []});
    save_json(&value, &path).unwrap();
    assert_eq!(load_json(&path).unwrap(), value);
}

#[test]
fn test_save_json_unserializable_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("verdict.json");
    let mut by_pair = BTreeMap::new();
    by_pair.insert(vec![1u32, 2], 3u32);
    match save_json(&by_pair, &path) {
        Err(LoadError::Serialize { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected a serialization error, got {:?}", other),
    }
    assert!(!path.exists());
}
