use varstat_core::{Field, FieldOption, FieldType, Subject, SubjectTable, Value};

#[test]
fn field_round_trip_json() {
    let field = Field::new("gender", "Gender", FieldType::Choices).with_options(vec![
        FieldOption::new("1", "Male"),
        FieldOption::new("2", "Female"),
        FieldOption::missing("9", "Unknown"),
    ]);

    let json = serde_json::to_string_pretty(&field).expect("serialize");
    let decoded: Field = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, field);
    assert!(json.contains("\"type\": \"choices\""));
    assert!(!json.contains("errors"));
}

#[test]
fn unknown_field_types_decode_as_other() {
    let json = r#"{"id":"visit_date","display_name":"Visit Date","type":"date"}"#;
    let field: Field = serde_json::from_str(json).expect("deserialize");
    assert_eq!(field.field_type, FieldType::Other);
    assert!(!field.field_type.is_chartable());
    assert!(field.units.is_empty());
}

#[test]
fn accessor_distinguishes_absent_values_from_missing_accessors() {
    let mut table = SubjectTable::new(["age", "visit"]);
    table.push(Subject::new().with("age", Value::Number(41.5)));
    table.push(Subject::new().with("visit", Value::Code("1".into())));

    assert!(table.accessor("bmi").is_none());
    let age = table.accessor("age").expect("age accessor");
    let values: Vec<_> = table.subjects().iter().map(|s| age.number(s)).collect();
    assert_eq!(values, vec![Some(41.5), None]);

    let visit = table.accessor("visit").expect("visit accessor");
    assert!(visit.has_code(&table.subjects()[1], "1"));
    assert!(!visit.has_code(&table.subjects()[0], "1"));
}

#[test]
fn integer_values_match_numeric_codes() {
    assert!(Value::Integer(2).matches_code("2"));
    assert!(!Value::Integer(2).matches_code("two"));
    assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    assert_eq!(Value::Code("3".into()).as_f64(), None);
}
