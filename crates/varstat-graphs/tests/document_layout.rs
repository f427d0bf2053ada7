use assert_json_diff::assert_json_include;
use serde_json::json;
use varstat_core::{Field, FieldOption, FieldType, Subject, SubjectTable, Value};
use varstat_graphs::serde::to_pretty_json_bytes;
use varstat_graphs::{Axis, FieldDocument, Slot, TableEntry};

fn subject(visit: Option<&str>, gender: &str, age: Option<f64>) -> Subject {
    let mut subject = Subject::new().with("gender", Value::Code(gender.to_string()));
    subject.set("visit", visit.map(|v| Value::Code(v.to_string())));
    subject.set("age", age.map(Value::Number));
    subject
}

#[test]
fn document_follows_comparison_order() {
    let visit = Field::new("visit", "Visit", FieldType::Choices).with_options(vec![
        FieldOption::new("A", "Visit A"),
        FieldOption::new("B", "Visit B"),
    ]);
    let age = Field::new("age", "Age", FieldType::Numeric).with_units("years");
    let gender = Field::new("gender", "Gender", FieldType::Choices).with_options(vec![
        FieldOption::new("m", "Male"),
        FieldOption::new("f", "Female"),
    ]);

    let mut table = SubjectTable::new(["visit", "age", "gender"]);
    table.push(subject(Some("A"), "m", Some(10.0)));
    table.push(subject(Some("A"), "f", Some(20.0)));
    table.push(subject(Some("B"), "m", Some(30.0)));
    table.push(subject(Some("B"), "f", None));
    table.push(subject(None, "m", Some(50.0)));

    let visit_axis = Axis::new(&visit, &table).expect("visit column");
    let slots = vec![
        Slot {
            slug: "histogram".to_string(),
            comparison: visit_axis,
            histogram: true,
        },
        Slot {
            slug: "gender".to_string(),
            comparison: Axis::new(&gender, &table).expect("gender column"),
            histogram: false,
        },
    ];
    let target = Axis::new(&age, &table).expect("age column");
    let document = FieldDocument::build(target, visit_axis, &slots, table.subjects());

    let chart_keys: Vec<&str> = document.charts.keys().map(String::as_str).collect();
    assert_eq!(chart_keys, vec!["histogram", "gender"]);
    assert!(matches!(document.tables["histogram"], TableEntry::Single(_)));
    match &document.tables["gender"] {
        TableEntry::Stratified(tables) => assert_eq!(tables.len(), 2),
        other => panic!("expected per-visit tables, got {other:?}"),
    }

    let value = serde_json::to_value(&document).expect("serialize");
    assert_json_include!(
        actual: value,
        expected: json!({
            "charts": {
                "histogram": {
                    "title": "Age",
                    "subtitle": "By Visit",
                    "units": "Subjects",
                    "stacking": null,
                    "x_axis_title": "years",
                    "series": [{ "name": "Visit A" }, { "name": "Visit B" }]
                },
                "gender": {
                    "title": "Age by Gender",
                    "categories": ["Visit A", "Visit B"],
                    "units": "years",
                    "series": [
                        { "name": "Male", "data": [10.0, 30.0] },
                        { "name": "Female", "data": [20.0, 0.0] }
                    ]
                }
            },
            "tables": {
                "gender": [
                    { "title": "Age by Gender", "subtitle": "Visit A" },
                    { "title": "Age by Gender", "subtitle": "Visit B" }
                ]
            }
        })
    );

    let bytes = to_pretty_json_bytes(&document).expect("bytes");
    let text = String::from_utf8(bytes).expect("utf8");
    let histogram = text.find("\"histogram\"").expect("histogram key");
    let by_gender = text.find("\"gender\"").expect("gender key");
    assert!(histogram < by_gender);
    assert!(text.ends_with("}\n"));
}

#[test]
fn strata_without_target_values_get_no_table() {
    let visit = Field::new("visit", "Visit", FieldType::Choices).with_options(vec![
        FieldOption::new("A", "Visit A"),
        FieldOption::new("B", "Visit B"),
    ]);
    let age = Field::new("age", "Age", FieldType::Integer);
    let gender = Field::new("gender", "Gender", FieldType::Choices)
        .with_options(vec![FieldOption::new("m", "Male")]);

    let mut table = SubjectTable::new(["visit", "age", "gender"]);
    table.push(subject(Some("A"), "m", Some(40.0)));
    table.push(subject(Some("B"), "m", None));

    let visit_axis = Axis::new(&visit, &table).expect("visit column");
    let slots = vec![Slot {
        slug: "gender".to_string(),
        comparison: Axis::new(&gender, &table).expect("gender column"),
        histogram: false,
    }];
    let target = Axis::new(&age, &table).expect("age column");
    let document = FieldDocument::build(target, visit_axis, &slots, table.subjects());

    match &document.tables["gender"] {
        TableEntry::Stratified(tables) => {
            assert_eq!(tables.len(), 1);
            assert_eq!(tables[0].subtitle.as_deref(), Some("Visit A"));
        }
        other => panic!("expected per-visit tables, got {other:?}"),
    }
}
