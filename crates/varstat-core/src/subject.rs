//! Per-subject field values and the accessors used to read them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A present field value. Absence is modelled as `Option::None` by the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole-number measurement.
    Integer(i64),
    /// Continuous measurement.
    Number(f64),
    /// Raw option code of a choices field.
    Code(String),
}

impl Value {
    /// Numeric view of the value; codes have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Number(value) => Some(*value),
            Value::Code(_) => None,
        }
    }

    /// Returns true when the value equals the given raw option code.
    pub fn matches_code(&self, code: &str) -> bool {
        match self {
            Value::Code(value) => value == code,
            Value::Integer(value) => code.trim().parse::<i64>().ok() == Some(*value),
            Value::Number(_) => false,
        }
    }
}

/// One subject: the values it carries, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    values: BTreeMap<String, Value>,
}

impl Subject {
    /// Creates a subject with no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a present value for a field.
    pub fn with(mut self, field_id: impl Into<String>, value: Value) -> Self {
        self.set(field_id, Some(value));
        self
    }

    /// Sets or clears the value for a field.
    pub fn set(&mut self, field_id: impl Into<String>, value: Option<Value>) {
        let field_id = field_id.into();
        match value {
            Some(value) => {
                self.values.insert(field_id, value);
            }
            None => {
                self.values.remove(&field_id);
            }
        }
    }

    fn get(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }
}

/// A collection of subjects sharing one record shape.
///
/// The shape is the set of field ids the records expose. A field outside the
/// shape has no accessor at all, which is different from a subject whose value
/// for an exposed field is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectTable {
    fields: BTreeSet<String>,
    subjects: Vec<Subject>,
}

impl SubjectTable {
    /// Creates a table whose records expose the given field ids.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            subjects: Vec::new(),
        }
    }

    /// Extends the record shape with another field id.
    pub fn expose(&mut self, field_id: impl Into<String>) {
        self.fields.insert(field_id.into());
    }

    /// Appends a subject.
    pub fn push(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// All subjects in load order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Returns true when no subjects were loaded.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Returns the accessor for a field, or `None` when the record shape does not expose it.
    pub fn accessor<'a>(&self, field_id: &'a str) -> Option<Accessor<'a>> {
        self.fields
            .contains(field_id)
            .then_some(Accessor { field_id })
    }
}

/// Reads one field's value out of subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor<'a> {
    field_id: &'a str,
}

impl<'a> Accessor<'a> {
    /// Field id this accessor reads.
    pub fn field_id(&self) -> &'a str {
        self.field_id
    }

    /// Value carried by the subject, or `None` when absent.
    pub fn get<'s>(&self, subject: &'s Subject) -> Option<&'s Value> {
        subject.get(self.field_id)
    }

    /// Numeric view of the subject's value.
    pub fn number(&self, subject: &Subject) -> Option<f64> {
        self.get(subject).and_then(Value::as_f64)
    }

    /// Returns true when the subject carries the given raw code.
    pub fn has_code(&self, subject: &Subject, code: &str) -> bool {
        self.get(subject)
            .map(|value| value.matches_code(code))
            .unwrap_or(false)
    }
}
