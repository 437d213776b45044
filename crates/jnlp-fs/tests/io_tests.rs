use jnlp_fs::{ConfigStore, Error, RunDir, io};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.jar");

    io::write_atomic(&path, b"PK\x03\x04").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.jar");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    io::write_atomic(&temp.path().join("a.jar"), b"content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found {:?}", leftovers);
}

#[test]
fn test_write_atomic_missing_parent_is_error() {
    let temp = TempDir::new().unwrap();
    let result = io::write_atomic(&temp.path().join("missing/a.jar"), b"x");
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_remove_file_if_exists() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("native.so");
    fs::write(&path, "x").unwrap();

    assert!(io::remove_file_if_exists(&path).unwrap());
    assert!(!io::remove_file_if_exists(&path).unwrap());
}

#[test]
fn test_remove_dir_if_exists_tolerates_missing() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("run");
    fs::create_dir(&dir).unwrap();

    assert!(io::remove_dir_if_exists(&dir).unwrap());
    assert!(!io::remove_dir_if_exists(&dir).unwrap());
}

#[test]
fn test_remove_dir_if_exists_reports_non_empty() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("run");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("stray"), "x").unwrap();

    assert!(io::remove_dir_if_exists(&dir).is_err());
    assert!(dir.exists());
}

#[test]
fn test_run_dir_artifact_write() {
    let temp = TempDir::new().unwrap();
    let run = RunDir::with_token(temp.path(), "1234");
    run.create().unwrap();

    let path = run.artifact("app.jar").unwrap();
    io::write_atomic(&path, b"jar").unwrap();
    assert!(temp.path().join("1234").join("app.jar").is_file());
}

#[test]
fn test_write_atomic_failure_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("app.jar");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("inner"), "x").unwrap();

    assert!(io::write_atomic(&target, b"jar").is_err());

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found {:?}", leftovers);
}

#[test]
fn test_run_dir_create_refuses_existing_directory() {
    let temp = TempDir::new().unwrap();
    let stale = temp.path().join("1");
    fs::create_dir(&stale).unwrap();
    fs::write(stale.join("libstale.so"), "old").unwrap();

    let run = RunDir::with_token(temp.path(), "1");
    let result = run.create();

    assert!(matches!(result, Err(Error::RunDirExists { path }) if path == stale));
    assert_eq!(fs::read_to_string(stale.join("libstale.so")).unwrap(), "old");
}

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    java: String,
    #[serde(default)]
    debug: bool,
}

#[test]
fn test_config_store_loads_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("launcher.toml");
    fs::write(&path, "java = \"/opt/jre/bin/java\"\ndebug = true\n").unwrap();

    let sample: Sample = ConfigStore::new().load(&path).unwrap();
    assert_eq!(
        sample,
        Sample {
            java: "/opt/jre/bin/java".into(),
            debug: true
        }
    );
}

#[test]
fn test_config_store_loads_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("launcher.json");
    fs::write(&path, r#"{"java": "java"}"#).unwrap();

    let sample: Sample = ConfigStore::new().load(&path).unwrap();
    assert_eq!(sample.java, "java");
    assert!(!sample.debug);
}

#[test]
fn test_config_store_rejects_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("launcher.ini");
    fs::write(&path, "java=java").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_config_store_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("launcher.toml");
    fs::write(&path, "java = [").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}
