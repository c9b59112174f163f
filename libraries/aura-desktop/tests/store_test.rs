//! Integration tests for the JSON settings store

use aura_core::{CoreError, KeyValueStore};
use aura_desktop::JsonFileStore;

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("settings.json")).unwrap();
    assert_eq!(store.get("audioVolume").unwrap(), None);
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set("audioVolume", "0.35").unwrap();
    store.set("audioVolume", "0.4").unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("audioVolume").unwrap().as_deref(), Some("0.4"));
}

#[test]
fn creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("aura").join("settings.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set("audioVolume", "1").unwrap();
    assert!(path.exists());
}

#[test]
fn file_is_a_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set("audioVolume", "0.8").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["audioVolume"], "0.8");
}

#[test]
fn corrupt_file_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
}

#[test]
fn empty_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "").unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get("audioVolume").unwrap(), None);
}
