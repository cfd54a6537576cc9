//! End-to-end conversion of binary FBX files.

mod common;

use std::sync::Arc;

use common::*;
use fbx_gltf_conv::{convert, ConvertOptions, Error, LogLevel, COPYRIGHT, GENERATOR};
use parking_lot::Mutex;
use tempfile::TempDir;

fn rig() -> Vec<Record> {
    vec![
        document("Walk"),
        objects([model(10, "Hips"), model(11, "Spine"), model(12, "Head"), model(20, "Camera")]),
        connections(&[(10, 0), (11, 10), (12, 11), (20, 0)]),
    ]
}

fn logged(verbose: bool) -> (ConvertOptions, Arc<Mutex<Vec<(LogLevel, String)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let options = ConvertOptions::new()
        .with_verbose(verbose)
        .with_logger(move |level: LogLevel, msg: &str| sink.lock().push((level, msg.to_string())));
    (options, log)
}

#[test]
fn test_convert_hierarchy() {
    let dir = TempDir::new().unwrap();
    for version in [7400, 7500] {
        let path = write_fbx(dir.path(), &format!("walk-{}.fbx", version), version, &rig());
        let json = convert(&path, &ConvertOptions::default()).unwrap();

        assert_eq!(json["asset"]["version"], "2.0");
        assert_eq!(json["asset"]["generator"], GENERATOR);
        assert_eq!(json["asset"]["copyright"], COPYRIGHT);

        let names: Vec<_> = json["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Hips", "Spine", "Head", "Camera"]);
        assert_eq!(json["nodes"][0]["children"], serde_json::json!([1]));
        assert_eq!(json["nodes"][1]["children"], serde_json::json!([2]));

        assert_eq!(json["scene"], 0);
        assert_eq!(json["scenes"][0]["name"], "Walk");
        assert_eq!(json["scenes"][0]["nodes"], serde_json::json!([0, 3]));
    }
}

#[test]
fn test_verbose_reports_file_version() {
    let dir = TempDir::new().unwrap();
    let path = write_fbx(dir.path(), "walk.fbx", 7400, &rig());

    let (options, log) = logged(true);
    convert(&path, &options).unwrap();
    assert!(log
        .lock()
        .iter()
        .any(|(level, msg)| *level == LogLevel::Verbose && msg == "FBX file version: 7.4"));
}

#[test]
fn test_quiet_without_verbose() {
    let dir = TempDir::new().unwrap();
    let path = write_fbx(dir.path(), "walk.fbx", 7400, &rig());

    let (options, log) = logged(false);
    convert(&path, &options).unwrap();
    assert!(log.lock().iter().all(|(level, _)| *level != LogLevel::Verbose));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = convert(dir.path().join("nope.fbx"), &ConvertOptions::default()).unwrap_err();
    match err {
        Error::Import(msg) => assert!(msg.starts_with("Failed to initialize FBX importer"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_not_an_fbx_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.fbx");
    std::fs::write(&path, b"this is plain text and certainly not a scene").unwrap();

    let err = convert(&path, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Import(_)));
}

#[test]
fn test_truncated_file() {
    let dir = TempDir::new().unwrap();
    let mut data = fbx_bytes(7400, &rig());
    data.truncate(data.len() - 40);
    let path = dir.path().join("cut.fbx");
    std::fs::write(&path, data).unwrap();

    let err = convert(&path, &ConvertOptions::default()).unwrap_err();
    match err {
        Error::Import(msg) => assert!(msg.starts_with("Failed to import scene"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_deep_nesting_is_an_import_error() {
    let dir = TempDir::new().unwrap();
    let mut chain = Record::new("Node");
    for _ in 0..400 {
        chain = Record::new("Node").child(chain);
    }
    let path = write_fbx(dir.path(), "deep.fbx", 7400, &[chain]);

    let err = convert(&path, &ConvertOptions::default()).unwrap_err();
    match err {
        Error::Import(msg) => {
            assert!(msg.starts_with("Failed to import scene"), "{}", msg);
            assert!(msg.contains("too deep"), "{}", msg);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_bad_fbm_dir_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_fbx(dir.path(), "walk.fbx", 7400, &rig());

    let (options, log) = logged(false);
    let options = options.with_fbm_dir(dir.path().join("walk.fbm"));
    convert(&path, &options).unwrap();
    assert!(log
        .lock()
        .iter()
        .any(|(level, msg)| *level == LogLevel::Warning && msg.contains("Failed to set .fbm dir")));
}

#[test]
fn test_empty_scene_serializes() {
    let dir = TempDir::new().unwrap();
    let path = write_fbx(dir.path(), "empty.fbx", 7400, &[]);

    let json = convert(&path, &ConvertOptions::default()).unwrap();
    assert_eq!(json["asset"]["version"], "2.0");
    assert!(json.get("buffers").map_or(true, |b| b.as_array().is_some_and(Vec::is_empty)));
}
