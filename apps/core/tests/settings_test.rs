use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use typeahead_core::popup::SettingsPopup;
use typeahead_core::settings::{FileSettingsStore, SettingsLoad, SettingsStore};

fn unique_temp_path(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir()
        .join("typeahead-tests")
        .join(format!("{label}-{}-{unique}.json", std::process::id()))
}

#[test]
fn missing_settings_default_to_disabled() {
    let store = FileSettingsStore::new(unique_temp_path("missing"));
    assert!(!store.get().unwrap());
}

#[test]
fn writes_use_the_persisted_key_name() {
    let path = unique_temp_path("roundtrip");
    let mut store = FileSettingsStore::new(&path);
    store.set(true).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"mnemonicsEnabled\": true"));
    assert!(FileSettingsStore::new(&path).get().unwrap());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn unset_key_reads_as_disabled() {
    let path = unique_temp_path("unset");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{}").unwrap();

    assert!(!FileSettingsStore::new(&path).get().unwrap());
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn malformed_settings_are_an_error_and_load_falls_back() {
    let path = unique_temp_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    assert!(FileSettingsStore::new(&path).get().is_err());
    let mut load = SettingsLoad::spawn(FileSettingsStore::new(&path));
    assert!(!load.wait());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn popup_toggle_and_label_persist_the_flag() {
    let path = unique_temp_path("popup");
    let mut popup = SettingsPopup::open(FileSettingsStore::new(&path));
    assert!(!popup.view().toggle_enabled);
    assert!(!popup.view().feature_help_visible);

    assert!(popup.toggle().unwrap());
    assert!(popup.view().feature_help_visible);
    assert!(FileSettingsStore::new(&path).get().unwrap());

    assert!(!popup.click_label().unwrap());
    assert!(!FileSettingsStore::new(&path).get().unwrap());

    let reopened = SettingsPopup::open(popup.into_store());
    assert!(!reopened.view().toggle_enabled);

    std::fs::remove_file(&path).unwrap();
}
