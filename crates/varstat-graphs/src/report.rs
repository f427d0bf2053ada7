use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a field produced no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The definition carries validation errors.
    InvalidDefinition,
    /// The field is not in the run's allow-list.
    NotSelected,
    /// The field type has no charts.
    UnsupportedType,
    /// The subject records do not expose the field.
    NoSubjectColumn,
}

/// What happened to one field during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum FieldOutcome {
    /// Not eligible; the ledger was left untouched.
    Skipped {
        /// Eligibility check that failed.
        reason: SkipReason,
    },
    /// Already generated, or already held by the destination.
    AlreadyDone,
    /// Document written.
    Generated {
        /// Location of the written document.
        path: PathBuf,
        /// SHA-256 of the written bytes.
        sha256: String,
    },
    /// Document written and confirmed by the destination.
    Delivered {
        /// Destination that confirmed receipt.
        destination: String,
        /// SHA-256 of the delivered bytes.
        sha256: String,
    },
    /// Document written but the destination did not confirm receipt.
    DeliveryFailed {
        /// Destination that was attempted.
        destination: String,
        /// Failure description.
        error: String,
    },
    /// Document could not be written.
    Failed {
        /// Failure description.
        error: String,
    },
}

impl FieldOutcome {
    /// Returns true when the field's document was written during the run.
    pub fn wrote_document(&self) -> bool {
        matches!(
            self,
            FieldOutcome::Generated { .. }
                | FieldOutcome::Delivered { .. }
                | FieldOutcome::DeliveryFailed { .. }
        )
    }

    /// Returns true for outcomes that should be retried by a later run.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FieldOutcome::DeliveryFailed { .. } | FieldOutcome::Failed { .. }
        )
    }
}

/// Outcome of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    /// Field identifier.
    pub field: String,
    /// What happened.
    pub outcome: FieldOutcome,
}

/// Outcomes of every field visited by a run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Version the ledger was tagged with.
    pub version: String,
    /// Per-field outcomes.
    pub fields: Vec<FieldReport>,
}

impl RunReport {
    /// Outcome recorded for a field.
    pub fn outcome(&self, field_id: &str) -> Option<&FieldOutcome> {
        self.fields
            .iter()
            .find(|report| report.field == field_id)
            .map(|report| &report.outcome)
    }

    /// Number of documents written.
    pub fn generated(&self) -> usize {
        self.count(FieldOutcome::wrote_document)
    }

    /// Number of documents confirmed by the destination.
    pub fn delivered(&self) -> usize {
        self.count(|outcome| matches!(outcome, FieldOutcome::Delivered { .. }))
    }

    /// Number of fields short-circuited by the ledger.
    pub fn already_done(&self) -> usize {
        self.count(|outcome| matches!(outcome, FieldOutcome::AlreadyDone))
    }

    /// Number of ineligible fields.
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FieldOutcome::Skipped { .. }))
    }

    /// Fields whose write or delivery failed.
    pub fn failures(&self) -> impl Iterator<Item = &FieldReport> {
        self.fields
            .iter()
            .filter(|report| report.outcome.is_failure())
    }

    fn count(&self, predicate: impl Fn(&FieldOutcome) -> bool) -> usize {
        self.fields
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}
