//! File-level preference loading.

use std::{env, fs, path::PathBuf, process};

use config::{Error, load_from_path, load_or_default};

/// Write `text` to a unique temp file and return its path.
fn temp_prefs(name: &str, text: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("keyflow-config-{}-{}.ron", process::id(), name));
    fs::write(&path, text).expect("write temp prefs");
    path
}

#[test]
fn loads_preferences_from_disk() {
    let path = temp_prefs("ok", "(hold_down_duration: Some(250), vibrate_duration: Some(40))");
    let prefs = load_from_path(&path).expect("load");
    assert_eq!(prefs.hold_down_duration_or_default(), 250);
    assert_eq!(prefs.vibrate_duration_or_default(), 40);
    fs::remove_file(&path).ok();
}

#[test]
fn parse_errors_carry_the_path() {
    let path = temp_prefs("bad", "(repeat_rate: \"fast\")");
    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(err.path(), Some(path.as_path()));
    fs::remove_file(&path).ok();
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let mut path = env::temp_dir();
    path.push("keyflow-config-does-not-exist.ron");
    let err = load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}
