use std::path::Path;

use varstat_core::errors::{ErrorInfo, VarstatError, PATH_KEY};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_path(Path::new("graphs/1.0.0/age.json"))
        .with_field("age")
}

#[test]
fn config_error_is_fatal() {
    let err = VarstatError::Config(sample_info("config.visit_missing", "visit field not found"));
    assert_eq!(err.info().code, "config.visit_missing");
    assert!(err.is_fatal());
}

#[test]
fn persist_error_surface() {
    let err = VarstatError::Persist(sample_info("ledger.write", "rename failed"));
    assert_eq!(err.info().code, "ledger.write");
    assert!(err.info().context.contains_key(PATH_KEY));
    assert!(!err.is_fatal());
}

#[test]
fn delivery_error_surface() {
    let err = VarstatError::Delivery(
        sample_info("deliver.rejected", "destination refused artifact").with_hint("check token"),
    );
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "delivery error: [age] destination refused artifact (deliver.rejected) \
         {path=graphs/1.0.0/age.json}; hint: check token"
    );
}

#[test]
fn field_and_destination_tags_survive_wrapping() {
    let err = VarstatError::Persist(ErrorInfo::new("deliver.read", "artifact vanished"))
        .with_field("bmi")
        .with_destination("staging");
    assert_eq!(err.info().field(), Some("bmi"));
    assert_eq!(err.info().destination(), Some("staging"));
    assert!(matches!(err, VarstatError::Persist(_)));
    assert_eq!(
        err.to_string(),
        "persist error: [bmi -> staging] artifact vanished (deliver.read)"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = VarstatError::Dictionary(ErrorInfo::new("dict.read", "missing file"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Dictionary");
    assert_eq!(json["detail"]["code"], "dict.read");
    assert!(json["detail"].get("hint").is_none());
}
