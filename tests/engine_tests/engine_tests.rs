//! Tests for Engine
//!
//! These tests verify:
//! - Table operations through the engine facade
//! - Load on init (present, missing, corrupt files)
//! - Dirty tracking: saves only happen after mutations
//! - Write failures are absorbed and not retried until the next mutation
//! - Background saver start/stop
//! - Round-trip through flush and a fresh engine

use std::fs;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use stylestore::config::Config;
use stylestore::engine::Engine;
use stylestore::{StyleError, Style};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path());
    (temp_dir, engine)
}

fn read_file(engine: &Engine) -> Value {
    serde_json::from_slice(&fs::read(engine.path()).unwrap()).unwrap()
}

// =============================================================================
// Facade Tests
// =============================================================================

#[test]
fn test_engine_set_get() {
    let (_temp, engine) = setup_temp_engine();

    engine.set(Style::new("Foo")).unwrap();

    let style = engine.get("foo").unwrap().unwrap();
    assert_eq!(style.style_name, "Foo");
}

#[test]
fn test_engine_list_sorted() {
    let (_temp, engine) = setup_temp_engine();

    engine.set(Style::new("z")).unwrap();
    engine.set(Style::new("a")).unwrap();

    let names: Vec<String> = engine.list().into_iter().map(|s| s.style_name).collect();
    assert_eq!(names, vec!["a", "z"]);
    assert_eq!(engine.len(), 2);
}

#[test]
fn test_engine_set_value() {
    let (_temp, engine) = setup_temp_engine();

    let key = engine
        .set_value(json!({ "styleName": "Body", "mode": 0 }))
        .unwrap();

    assert_eq!(key, "body");
    assert!(matches!(
        engine.set_value(Value::Null),
        Err(StyleError::ArgumentMissing(_))
    ));
    assert!(matches!(
        engine.set_value(json!({ "mode": 1 })),
        Err(StyleError::InvalidRecord(_))
    ));
}

#[test]
fn test_engine_import_null_element_leaves_store_unchanged() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("keep")).unwrap();

    let err = engine.import(json!([null]), true).unwrap_err();

    assert!(err.is_client_error());
    let names: Vec<String> = engine.list().into_iter().map(|s| s.style_name).collect();
    assert_eq!(names, vec!["keep"]);
}

#[test]
fn test_engine_import_legacy_map() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("gone")).unwrap();

    engine
        .import(json!({ "x": { "styleName": "X" }, "y": { "styleName": "Y" } }), true)
        .unwrap();

    let keys: Vec<String> = engine.export_map().into_keys().collect();
    assert_eq!(keys, vec!["x", "y"]);
}

#[test]
fn test_engine_rename_and_delete() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("a")).unwrap();

    assert_eq!(engine.rename("a", "a").unwrap(), None);
    assert_eq!(engine.rename("a", "B").unwrap().as_deref(), Some("b"));
    assert!(matches!(
        engine.rename("missing", "x"),
        Err(StyleError::NotFound(_))
    ));

    assert!(engine.delete("b").unwrap());
    assert!(!engine.delete("b").unwrap());
    assert!(engine.is_empty());
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_init_loads_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("styles.json"),
        r#"[{"styleName": "B", "mode": 2}, {"styleName": "a"}]"#,
    )
    .unwrap();

    let engine = Engine::open_path(temp_dir.path());

    assert_eq!(engine.len(), 2);
    assert_eq!(engine.get("b").unwrap().unwrap().field("mode"), Some(&json!(2)));
    assert_eq!(engine.revision(), engine.saved_revision());
}

#[test]
fn test_init_collapses_case_variant_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("styles.json"),
        r#"[{"styleName": "Dup", "v": 1}, {"styleName": "dup", "v": 2}, {"styleName": "other"}]"#,
    )
    .unwrap();

    let engine = Engine::open_path(temp_dir.path());

    assert_eq!(engine.len(), 2);
    assert_eq!(engine.get("DUP").unwrap().unwrap().field("v"), Some(&json!(2)));
}

#[test]
fn test_init_missing_file_starts_empty() {
    let (temp, engine) = setup_temp_engine();

    assert!(engine.is_empty());
    assert!(!temp.path().join("styles.json").exists());
}

#[test]
fn test_init_corrupt_file_starts_empty_and_keeps_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("styles.json");
    fs::write(&path, "not json").unwrap();

    let engine = Engine::open_path(temp_dir.path());
    assert!(engine.is_empty());

    // Nothing changed, so the corrupt file is left alone
    engine.flush();
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn test_init_file_with_nameless_style_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("styles.json"),
        r#"[{"styleName": "ok"}, {"mode": 1}]"#,
    )
    .unwrap();

    let engine = Engine::open_path(temp_dir.path());

    assert!(engine.is_empty());
}

#[test]
fn test_init_replaces_in_memory_state() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("unsaved")).unwrap();

    engine.init(0);

    assert!(engine.is_empty());
}

// =============================================================================
// Save / Flush Tests
// =============================================================================

#[test]
fn test_flush_without_changes_writes_nothing() {
    let (temp, engine) = setup_temp_engine();

    engine.flush();

    assert!(!temp.path().join("styles.json").exists());
}

#[test]
fn test_flush_writes_pretty_json_array() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("b").with_field("mode", 1)).unwrap();
    engine.set(Style::new("a")).unwrap();

    engine.flush();

    let text = fs::read_to_string(engine.path()).unwrap();
    assert!(text.contains("\n  {\n    "));
    assert_eq!(
        read_file(&engine),
        json!([{ "styleName": "a" }, { "styleName": "b", "mode": 1 }])
    );
    assert_eq!(engine.saved_revision(), engine.revision());
}

#[test]
fn test_save_skips_when_clean() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("a")).unwrap();
    engine.save();

    // Remove the file behind the engine's back; a clean save must not recreate it
    fs::remove_file(engine.path()).unwrap();
    engine.save();
    assert!(!engine.path().exists());

    engine.set(Style::new("b")).unwrap();
    engine.save();
    assert!(engine.path().exists());
}

#[test]
fn test_flush_to_invalid_path_does_not_panic() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist");
    let engine = Engine::open_path(&missing);

    engine.set(Style::new("a")).unwrap();
    engine.flush();

    assert!(!missing.join("styles.json").exists());
    assert_eq!(engine.get("a").unwrap().unwrap().style_name, "a");
}

#[test]
fn test_failed_save_leaves_previous_file_intact() {
    let (temp, engine) = setup_temp_engine();
    engine.set(Style::new("kept").with_field("mode", 1)).unwrap();
    engine.flush();
    let before = fs::read_to_string(engine.path()).unwrap();

    // A directory squatting on the temp path makes the next write fail
    fs::create_dir(temp.path().join("styles.json.tmp")).unwrap();
    engine.set(Style::new("lost")).unwrap();
    engine.flush();

    assert_eq!(fs::read_to_string(engine.path()).unwrap(), before);
    let reopened = Engine::open_path(temp.path());
    assert_eq!(reopened.list(), vec![Style::new("kept").with_field("mode", 1)]);
}

#[test]
fn test_successful_save_leaves_no_temp_file() {
    let (temp, engine) = setup_temp_engine();
    engine.set(Style::new("a")).unwrap();
    engine.flush();

    assert!(engine.path().exists());
    assert!(!temp.path().join("styles.json.tmp").exists());
}

#[test]
fn test_failed_write_not_retried_until_next_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("later");
    let engine = Engine::open_path(&dir);

    engine.set(Style::new("a")).unwrap();
    engine.flush();
    assert_eq!(engine.saved_revision(), engine.revision());

    // Directory appears, but nothing changed since the failed write
    fs::create_dir(&dir).unwrap();
    engine.flush();
    assert!(!dir.join("styles.json").exists());

    engine.set(Style::new("b")).unwrap();
    engine.flush();
    assert_eq!(read_file(&engine).as_array().unwrap().len(), 2);
}

#[test]
fn test_clear_is_persisted() {
    let (_temp, engine) = setup_temp_engine();
    engine.set(Style::new("a")).unwrap();
    engine.flush();

    engine.clear();
    engine.flush();

    assert_eq!(read_file(&engine), json!([]));
}

// =============================================================================
// Background Saver Tests
// =============================================================================

#[test]
fn test_zero_interval_disables_saver() {
    let (_temp, engine) = setup_temp_engine();
    assert!(!engine.is_saving_scheduled());
}

#[test]
fn test_background_saver_writes_changes() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .save_seconds(1)
        .build();
    let engine = Engine::open(config);
    assert!(engine.is_saving_scheduled());

    engine.set(Style::new("tick")).unwrap();
    thread::sleep(Duration::from_millis(2500));

    assert_eq!(read_file(&engine), json!([{ "styleName": "tick" }]));
    engine.flush();
}

#[test]
fn test_flush_stops_saver_and_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .save_seconds(60)
        .build();
    let engine = Engine::open(config);
    engine.set(Style::new("a")).unwrap();

    engine.flush();
    assert!(!engine.is_saving_scheduled());
    assert!(engine.path().exists());

    engine.flush();
    assert!(!engine.is_saving_scheduled());
}

#[test]
fn test_reinit_restarts_saver() {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::new(Config::builder().data_dir(temp_dir.path()).build());

    engine.init(60);
    engine.init(60);
    assert!(engine.is_saving_scheduled());

    engine.init(0);
    assert!(!engine.is_saving_scheduled());
}

#[test]
fn test_concurrent_mutations_during_saves_are_persisted() {
    let (_temp, engine) = setup_temp_engine();
    let engine = std::sync::Arc::new(engine);

    let writer = {
        let engine = std::sync::Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..200 {
                engine.set(Style::new(format!("style{:03}", i))).unwrap();
            }
        })
    };
    for _ in 0..20 {
        engine.save();
    }
    writer.join().unwrap();

    engine.flush();
    assert_eq!(read_file(&engine).as_array().unwrap().len(), 200);
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_flush_then_reopen_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let before = {
        let engine = Engine::open_path(temp_dir.path());
        engine
            .set(Style::new("Heading").with_field("styles", json!({ "fontSize": "14" })))
            .unwrap();
        engine.set(Style::new("body")).unwrap();
        engine.rename("body", "Body Text").unwrap();
        let list = engine.list();
        engine.close();
        list
    };

    let engine = Engine::open_path(temp_dir.path());

    assert_eq!(engine.list(), before);
}

#[test]
fn test_open_uses_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).save_seconds(0).build();

    let engine = Engine::open(config);

    assert_eq!(engine.config().save_seconds, 0);
    assert_eq!(engine.path(), temp_dir.path().join("styles.json"));
}
