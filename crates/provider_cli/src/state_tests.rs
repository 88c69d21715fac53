use super::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_load_missing_state_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let state = StateFile::load(&dir.path().join("missing.json")).expect("missing is fine");

    assert_eq!(state, StateFile::default());
}

#[test]
fn test_save_then_load_keeps_id_and_attributes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("group.json");
    let state = StateFile {
        id: Some("42".to_string()),
        attributes: json!({"name": "infra", "lfs_enabled": true})
            .as_object()
            .cloned()
            .unwrap(),
    };

    state.save(&path).expect("save should succeed");
    let loaded = StateFile::load(&path).expect("load should succeed");

    assert_eq!(loaded, state);
}

#[test]
fn test_load_rejects_malformed_state() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"id\": 42").unwrap();

    let result = StateFile::load(&path);

    assert!(matches!(result, Err(Error::ParseJson { .. })));
}

#[test]
fn test_resource_data_conversion_round_trip() {
    let state = StateFile {
        id: Some("7".to_string()),
        attributes: json!({"name": "infra"}).as_object().cloned().unwrap(),
    };

    let data = state.clone().into_resource_data(Map::new());
    assert_eq!(data.id(), Some("7"));

    assert_eq!(StateFile::from(data), state);
}

#[test]
fn test_load_resource_config_requires_object() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let result = load_resource_config(&path);

    assert!(matches!(result, Err(Error::ParseJson { .. })));
}

#[test]
fn test_load_resource_config_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let result = load_resource_config(&dir.path().join("absent.json"));

    assert!(matches!(result, Err(Error::ReadFile { .. })));
}
