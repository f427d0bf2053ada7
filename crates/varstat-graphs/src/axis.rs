use varstat_core::{Accessor, Field, FieldOption, Subject, SubjectTable, Value};

/// A field paired with the accessor that reads it out of subjects.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
    /// Field definition.
    pub field: &'a Field,
    accessor: Accessor<'a>,
}

impl<'a> Axis<'a> {
    /// Binds a field to the subject table; `None` when the records do not expose it.
    pub fn new(field: &'a Field, table: &SubjectTable) -> Option<Self> {
        let accessor = table.accessor(&field.id)?;
        Some(Self { field, accessor })
    }

    /// Value carried by the subject.
    pub fn value<'s>(&self, subject: &'s Subject) -> Option<&'s Value> {
        self.accessor.get(subject)
    }

    /// Returns true when the subject carries a value for this field.
    pub fn is_present(&self, subject: &Subject) -> bool {
        self.value(subject).is_some()
    }

    /// Numeric value carried by the subject.
    pub fn number(&self, subject: &Subject) -> Option<f64> {
        self.accessor.number(subject)
    }

    /// Returns true when the subject carries the option's raw code.
    pub fn has_option(&self, subject: &Subject, option: &FieldOption) -> bool {
        self.accessor.has_code(subject, &option.value)
    }

    /// Domain options shown for the given subjects.
    ///
    /// Options flagged as missing are dropped unless at least one subject
    /// actually carries their code.
    pub fn filtered_options<'s, I>(&self, subjects: I) -> Vec<&'a FieldOption>
    where
        I: IntoIterator<Item = &'s Subject> + Clone,
    {
        self.field
            .options
            .iter()
            .filter(|option| {
                !option.missing
                    || subjects
                        .clone()
                        .into_iter()
                        .any(|subject| self.has_option(subject, option))
            })
            .collect()
    }

    /// Subjects sorted ascending by this field's numeric value; stable for ties.
    pub fn sort_by_number(&self, subjects: &mut [&Subject]) {
        subjects.sort_by(|a, b| {
            let a = self.number(a).unwrap_or(f64::NEG_INFINITY);
            let b = self.number(b).unwrap_or(f64::NEG_INFINITY);
            a.total_cmp(&b)
        });
    }
}
