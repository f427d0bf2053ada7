use std::fs;

use assert_json_diff::assert_json_eq;
use serde_json::json;
use varstat_graphs::{Ledger, LEDGER_FILE};

#[test]
fn persisted_ledger_is_sorted_and_tagged() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(LEDGER_FILE);
    let mut ledger = Ledger::new("1.0.0");
    ledger.mark_generated("gender");
    ledger.mark_generated("age");
    ledger.mark_uploaded("age", "staging");
    ledger.mark_uploaded("age", "production");
    ledger.entry_for("bmi");
    ledger.persist(&path).expect("persist");

    let bytes = fs::read(&path).expect("read");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_json_eq!(
        value,
        json!({
            "version": "1.0.0",
            "fields": {
                "age": { "generated": true, "uploaded": ["production", "staging"] },
                "bmi": { "generated": false, "uploaded": [] },
                "gender": { "generated": true, "uploaded": [] }
            }
        })
    );

    ledger.persist(&path).expect("persist again");
    assert_eq!(fs::read(&path).expect("reread"), bytes);
}

#[test]
fn load_round_trips_matching_version() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(LEDGER_FILE);
    let mut ledger = Ledger::new("1.0.0");
    ledger.mark_generated("age");
    ledger.mark_uploaded("age", "staging");
    ledger.persist(&path).expect("persist");

    let loaded = Ledger::load(&path, "1.0.0", false);
    assert_eq!(loaded, ledger);
    assert!(loaded.is_uploaded("age", "staging"));
}

#[test]
fn untrusted_ledgers_start_over() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(LEDGER_FILE);

    let missing = Ledger::load(&path, "1.0.0", false);
    assert!(missing.is_empty());
    assert_eq!(missing.version(), "1.0.0");

    let mut ledger = Ledger::new("0.9.0");
    ledger.mark_generated("age");
    ledger.persist(&path).expect("persist");
    let upgraded = Ledger::load(&path, "1.0.0", false);
    assert!(upgraded.is_empty());
    assert_eq!(upgraded.version(), "1.0.0");

    let same = Ledger::load(&path, "0.9.0", true);
    assert!(same.is_empty());

    fs::write(&path, b"{ not json").expect("corrupt");
    assert!(Ledger::load(&path, "1.0.0", false).is_empty());

    fs::write(&path, b"[1, 2, 3]").expect("wrong shape");
    assert!(Ledger::load(&path, "1.0.0", false).is_empty());
}

#[test]
fn persist_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(LEDGER_FILE);
    Ledger::new("1.0.0").persist(&path).expect("persist");
    let names: Vec<String> = fs::read_dir(dir.path())
        .expect("list")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![LEDGER_FILE.to_string()]);
}
