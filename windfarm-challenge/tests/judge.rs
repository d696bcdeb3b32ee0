mod common;

use common::assert_close;
use serde_json::{json, Value};
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use windfarm_challenge::{
    check, judge, render_text, verdict, JudgeConfig, JudgeError,
};
use windfarm_utils::{save_json, LoadError};

fn write_pair(instance: &Value, solution: &Value) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let instance_path = dir.path().join("instance.json");
    let solution_path = dir.path().join("solution.json");
    save_json(instance, &instance_path).unwrap();
    save_json(solution, &solution_path).unwrap();
    (dir, instance_path, solution_path)
}

#[test]
fn test_judge_scores_files() {
    let (_dir, instance, solution) =
        write_pair(&common::tiny_instance(), &common::tiny_solution());
    let config = JudgeConfig::default();
    let result = judge(&instance, &solution, &config);
    assert_close(result.as_ref().unwrap().total, 250.0);
    assert_eq!(render_text(&result, &config), "250");

    let verdict = verdict(&result, &config);
    assert!(verdict.is_valid());
    assert_close(verdict.score, 250.0);
    assert_close(verdict.breakdown().unwrap().operational, 190.0);
}

#[test]
fn test_keys_with_spaces_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance.json");
    let solution = dir.path().join("solution.json");
    save_json(&common::tiny_instance(), &instance).unwrap();
    fs::write(
        &solution,
        r#"{
            "substations ": [{" id": 1, "substation_type": 1, "land_cable_type ": 1}],
            " turbines": [{"id": 1, "substation_id": 1}, {"id": 2, "substation_id ": 1}],
            "substation_substation_cables": []
        }"#,
    )
    .unwrap();

    let config = JudgeConfig::default();
    assert_close(judge(&instance, &solution, &config).unwrap().total, 250.0);

    let strict = JudgeConfig {
        clean_keys: false,
        ..JudgeConfig::default()
    };
    match judge(&instance, &solution, &strict) {
        Err(JudgeError::Invalid(problems)) => {
            assert!(problems.contains("Key 'substations ' is not expected in the solution"))
        }
        other => panic!("expected an invalid solution, got {:?}", other),
    }
}

#[test]
fn test_missing_solution_file() {
    let (dir, instance, _) = write_pair(&common::tiny_instance(), &common::tiny_solution());
    let missing = dir.path().join("nowhere.json");
    let config = JudgeConfig::default();
    let result = judge(&instance, &missing, &config);
    match &result {
        Err(JudgeError::Load(LoadError::NotFound(path))) => assert_eq!(path, &missing),
        other => panic!("expected a missing file, got {:?}", other),
    }
    assert!(render_text(&result, &config).starts_with("-1\nError: File not found: "));
}

#[test]
fn test_rejected_solution_report() {
    let mut raw = common::tiny_solution();
    raw["turbines"] = json!([{"id": 1, "substation_id": 1}]);
    let (_dir, instance, solution) = write_pair(&common::tiny_instance(), &raw);

    let config = JudgeConfig {
        failure_score: -5.0,
        ..JudgeConfig::default()
    };
    let result = judge(&instance, &solution, &config);
    assert_eq!(
        render_text(&result, &config),
        "-5\nError: solution is not valid, traceback list for information:\n\
         The turbine with id 2 does not appear in the list of turbines, but it should"
    );

    let verdict = verdict(&result, &config);
    assert!(!verdict.is_valid());
    assert_eq!(verdict.score, -5.0);
    assert!(verdict.breakdown().is_none());
    assert_eq!(verdict.errors.len(), 1);
}

#[test]
fn test_invalid_instance_stops_before_solution() {
    let mut raw = common::tiny_instance();
    raw["wind_turbines"] = json!([{"id": 1, "x": 0, "y": 0}, {"id": 3, "x": 0, "y": 0}]);
    let (_dir, instance, solution) = write_pair(&raw, &common::tiny_solution());
    match check(&instance, &solution, &JudgeConfig::default()) {
        Err(JudgeError::Instance(problems)) => {
            assert!(problems.contains("In wind_turbines, ids must be 1..2 without gaps, id 2 is missing"))
        }
        other => panic!("expected an invalid instance, got {:?}", other),
    }
}

#[test]
fn test_format_errors_stop_before_references() {
    let raw = json!({
        "substations": [{"id": 1, "substation_type": 7}],
        "turbines": [{"id": 1, "substation_id": 1}],
        "substation_substation_cables": []
    });
    let (_dir, instance, solution) = write_pair(&common::tiny_instance(), &raw);
    match check(&instance, &solution, &JudgeConfig::default()) {
        Err(JudgeError::Invalid(problems)) => {
            assert_eq!(problems.len(), 1);
            assert!(problems.contains("key 'land_cable_type' is missing"));
        }
        other => panic!("expected an invalid solution, got {:?}", other),
    }
}
