use criterion::{black_box, criterion_group, criterion_main, Criterion};
use varstat_core::{Field, FieldOption, FieldType, Subject, SubjectTable, Value};
use varstat_graphs::{Axis, FieldDocument, Slot};

fn cohort(len: usize) -> SubjectTable {
    let mut table = SubjectTable::new(["visit", "age", "bmi", "gender"]);
    for idx in 0..len {
        let mix = (idx as u64).wrapping_mul(0x9e3779b97f4a7c15);
        table.push(
            Subject::new()
                .with("visit", Value::Integer((mix % 3) as i64 + 1))
                .with("age", Value::Integer(18 + (mix % 70) as i64))
                .with("bmi", Value::Number(15.0 + (mix % 2500) as f64 / 100.0))
                .with("gender", Value::Code(if mix % 2 == 0 { "m" } else { "f" }.to_string())),
        );
    }
    table
}

fn bench_document(c: &mut Criterion) {
    let visit = Field::new("visit", "Visit", FieldType::Choices).with_options(vec![
        FieldOption::new("1", "Baseline"),
        FieldOption::new("2", "Year One"),
        FieldOption::new("3", "Year Two"),
    ]);
    let age = Field::new("age", "Age", FieldType::Integer).with_units("years");
    let bmi = Field::new("bmi", "BMI", FieldType::Numeric).with_units("kg/m2");
    let gender = Field::new("gender", "Gender", FieldType::Choices).with_options(vec![
        FieldOption::new("m", "Male"),
        FieldOption::new("f", "Female"),
    ]);
    let table = cohort(20_000);
    let axis = |field| Axis::new(field, &table).expect("column");
    let slots = vec![
        Slot {
            slug: "histogram".to_string(),
            comparison: axis(&visit),
            histogram: true,
        },
        Slot {
            slug: "bmi".to_string(),
            comparison: axis(&bmi),
            histogram: false,
        },
        Slot {
            slug: "gender".to_string(),
            comparison: axis(&gender),
            histogram: false,
        },
    ];

    c.bench_function("age_document_20k", |b| {
        b.iter(|| {
            black_box(FieldDocument::build(
                axis(&age),
                axis(&visit),
                &slots,
                table.subjects(),
            ))
        });
    });
}

criterion_group!(benches, bench_document);
criterion_main!(benches);
