use numdrill::config::{
    load_config, reset_config, save_config, ConfigError, ConfigStore, FileConfigStore,
};
use numdrill::position::PositionConfig;
use numdrill::sum::SumConfig;
use tempfile::tempdir;

#[test]
fn settings_survive_a_new_store_instance() {
    let dir = tempdir().unwrap();
    let custom = SumConfig {
        number_count: 8,
        min_number: 10,
        max_number: 40,
        display_duration_ms: 900,
        pause_duration_ms: 250,
    };
    save_config(&FileConfigStore::with_dir(dir.path()), &custom).unwrap();

    let reopened = FileConfigStore::with_dir(dir.path());
    let loaded: SumConfig = load_config(&reopened);
    assert_eq!(loaded, custom);

    // the other game's slot is untouched
    let other: PositionConfig = load_config(&reopened);
    assert_eq!(other, PositionConfig::default());
}

#[test]
fn files_use_camel_case_keys() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_dir(dir.path());
    save_config(&store, &PositionConfig::default()).unwrap();

    let raw = std::fs::read_to_string(store.slot_path("position_number")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["minNumber"], 0);
    assert_eq!(json["maxNumber"], 100);
    assert_eq!(json["roundCount"], 10);
}

#[test]
fn hand_edited_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_dir(dir.path());
    store
        .write_slot("sum_memory", br#"{ "numberCount": 7 }"#)
        .unwrap();

    let loaded: SumConfig = load_config(&store);
    assert_eq!(loaded.number_count, 7);
    assert_eq!(loaded.display_duration_ms, SumConfig::default().display_duration_ms);
}

#[test]
fn corrupt_or_invalid_files_fall_back() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_dir(dir.path());

    store.write_slot("sum_memory", b"{ not json").unwrap();
    assert_eq!(load_config::<SumConfig, _>(&store), SumConfig::default());

    store
        .write_slot("position_number", br#"{ "minNumber": 90, "maxNumber": 10 }"#)
        .unwrap();
    assert_eq!(load_config::<PositionConfig, _>(&store), PositionConfig::default());
}

#[test]
fn invalid_config_is_not_written() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_dir(dir.path());
    let bad = SumConfig {
        number_count: 0,
        ..SumConfig::default()
    };
    assert!(matches!(
        save_config(&store, &bad),
        Err(ConfigError::CountTooSmall(_))
    ));
    assert!(!store.slot_path("sum_memory").exists());
}

#[test]
fn reset_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_dir(dir.path());
    save_config(&store, &SumConfig::default()).unwrap();
    reset_config::<SumConfig, _>(&store).unwrap();
    reset_config::<SumConfig, _>(&store).unwrap();
    assert!(!store.slot_path("sum_memory").exists());
}
