//! Typed field metadata consumed by every downstream component.

use serde::{Deserialize, Serialize};

/// Measurement type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Continuous measurement.
    Numeric,
    /// Whole-number measurement, charted exactly like [`FieldType::Numeric`].
    Integer,
    /// Coded categorical value drawn from an ordered option list.
    Choices,
    /// Any type the charts do not handle (text, dates, identifiers).
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Returns true for numeric and integer fields.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Numeric | FieldType::Integer)
    }

    /// Returns true for coded categorical fields.
    pub fn is_choices(self) -> bool {
        self == FieldType::Choices
    }

    /// Returns true when charts and tables can be produced for the type.
    pub fn is_chartable(self) -> bool {
        self.is_numeric() || self.is_choices()
    }
}

/// One coded value of a choices field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Raw code as it appears in subject records.
    pub value: String,
    /// Label shown in charts and tables.
    pub display_name: String,
    /// Marks "unknown/refused/not applicable" sentinel codes.
    #[serde(default)]
    pub missing: bool,
}

impl FieldOption {
    /// Creates a regular (non-missing) option.
    pub fn new(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: display_name.into(),
            missing: false,
        }
    }

    /// Creates an option flagged as a missing/unknown sentinel.
    pub fn missing(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            missing: true,
            ..Self::new(value, display_name)
        }
    }
}

/// A named, typed measurement tracked per subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique lowercase identifier.
    pub id: String,
    /// Human readable name.
    pub display_name: String,
    /// Measurement type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Measurement units; may be empty.
    #[serde(default)]
    pub units: String,
    /// Ordered domain options; only meaningful for choices fields.
    #[serde(default)]
    pub options: Vec<FieldOption>,
    /// Folder the definition was loaded from, relative to the dictionary root.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub folder: String,
    /// Validation errors found while loading the definition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Field {
    /// Creates a field with no units, options or errors.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            field_type,
            units: String::new(),
            options: Vec::new(),
            folder: String::new(),
            errors: Vec::new(),
        }
    }

    /// Sets the measurement units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Sets the ordered domain options.
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Records a validation error against the definition.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Returns true when the definition loaded without validation errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Looks up an option by its raw code.
    pub fn option(&self, code: &str) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.value == code)
    }
}
