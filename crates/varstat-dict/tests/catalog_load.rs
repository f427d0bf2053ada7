use std::fs;
use std::path::Path;

use varstat_core::{FieldCatalog, FieldType, VarstatError};
use varstat_dict::{dataset_version, load_catalog, load_domains, DEFAULT_VERSION};

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write fixture");
}

fn dictionary() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tmp dir");
    let root = dir.path();
    write(
        root,
        "domains/visits.json",
        r#"[{"value": "1", "display_name": "Baseline"},
            {"value": "2", "display_name": "Year One"}]"#,
    );
    write(
        root,
        "domains/Genders.json",
        r#"[{"value": "m", "display_name": "Male"},
            {"value": "f", "display_name": "Female"},
            {"value": "u", "display_name": "Unknown", "missing": true}]"#,
    );
    write(root, "domains/broken.json", "{ not json");
    write(
        root,
        "variables/visit.json",
        r#"{"id": "visit", "display_name": "Visit", "type": "choices", "domain": "visits"}"#,
    );
    write(
        root,
        "variables/demographics/age.json",
        r#"{"id": "age", "display_name": "Age", "type": "numeric", "units": "years"}"#,
    );
    write(
        root,
        "variables/demographics/gender.json",
        r#"{"id": "gender", "display_name": "Gender", "type": "choices", "domain": "GENDERS"}"#,
    );
    write(
        root,
        "variables/notes.json",
        r#"{"id": "notes", "display_name": "Notes", "type": "text"}"#,
    );
    dir
}

#[test]
fn domains_are_keyed_by_lowercase_stem() {
    let dir = dictionary();
    let domains = load_domains(dir.path()).expect("domains");
    let keys: Vec<&str> = domains.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["genders", "visits"]);
    assert!(domains["genders"][2].missing);
}

#[test]
fn variables_load_with_folders_and_options() {
    let dir = dictionary();
    let catalog = load_catalog(dir.path()).expect("catalog");
    let ids: Vec<&str> = catalog.fields().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["age", "gender", "notes", "visit"]);

    let age = catalog.find_by_id("age").expect("age");
    assert_eq!(age.field_type, FieldType::Numeric);
    assert_eq!(age.units, "years");
    assert_eq!(age.folder, "demographics/");
    assert!(age.is_valid());

    let gender = catalog.find_by_id("gender").expect("gender");
    assert_eq!(gender.options.len(), 3);
    assert_eq!(gender.option("f").map(|o| o.display_name.as_str()), Some("Female"));

    let notes = catalog.find_by_id("notes").expect("notes");
    assert_eq!(notes.field_type, FieldType::Other);
    assert!(notes.is_valid());
    assert_eq!(catalog.find_by_id("visit").expect("visit").folder, "");
}

#[test]
fn invalid_definitions_are_kept_with_errors() {
    let dir = dictionary();
    let root = dir.path();
    write(
        root,
        "variables/height.json",
        r#"{"id": "stature", "display_name": "Height", "type": "numeric"}"#,
    );
    write(
        root,
        "variables/ethnicity.json",
        r#"{"id": "ethnicity", "display_name": "Ethnicity", "type": "choices", "domain": "nope"}"#,
    );
    write(
        root,
        "variables/race.json",
        r#"{"id": "race", "display_name": "Race", "type": "choices"}"#,
    );
    write(
        root,
        "variables/score.json",
        r#"{"id": "score", "display_name": "Score", "type": "calculated"}"#,
    );
    write(root, "variables/garbled.json", "[1, 2");

    let catalog = load_catalog(root).expect("catalog");
    let errors = |id: &str| {
        catalog
            .find_by_id(id)
            .unwrap_or_else(|| panic!("{id} loaded"))
            .errors
            .join("; ")
    };
    assert!(errors("stature").contains("does not match file name"));
    assert!(errors("ethnicity").contains("domain `nope` not found"));
    assert!(errors("race").contains("no domain"));
    assert!(errors("score").contains("unknown type"));
    assert!(errors("garbled").contains("could not parse"));
    assert!(catalog.find_by_id("age").expect("age").is_valid());
}

#[test]
fn missing_variables_folder_is_a_dictionary_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = load_catalog(dir.path()).expect_err("no variables");
    assert_eq!(err.info().code, "dict.variables_missing");
    assert!(matches!(err, VarstatError::Dictionary(_)));
}

#[test]
fn version_file_is_trimmed_with_default() {
    let dir = tempfile::tempdir().expect("tmp dir");
    assert_eq!(dataset_version(dir.path()).expect("default"), DEFAULT_VERSION);
    write(dir.path(), "VERSION", "0.4.2\n");
    assert_eq!(dataset_version(dir.path()).expect("read"), "0.4.2");
}
