#![deny(missing_docs)]
#![doc = "Core types and collaborator traits for varstat: field metadata, subject records, delivery."]

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod field;
pub mod subject;

pub use errors::{ErrorInfo, VarstatError};
pub use field::{Field, FieldOption, FieldType};
pub use subject::{Accessor, Subject, SubjectTable, Value};

/// Read access to loaded field definitions.
pub trait FieldCatalog {
    /// Returns the field with the given identifier, if any.
    fn find_by_id(&self, id: &str) -> Option<&Field>;

    /// Returns every field in dictionary order.
    fn fields(&self) -> &[Field];
}

/// In-memory field catalog preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    fields: Vec<Field>,
    index: BTreeMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog; later duplicates of an id shadow earlier ones on lookup.
    pub fn new(fields: Vec<Field>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.id.clone(), idx))
            .collect();
        Self { fields, index }
    }
}

impl FieldCatalog for Catalog {
    fn find_by_id(&self, id: &str) -> Option<&Field> {
        self.index.get(id).map(|&idx| &self.fields[idx])
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Where a delivery run sends artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Destination name recorded in the progress ledger (e.g. `staging`).
    pub name: String,
    /// Destination location, a URL or a filesystem path.
    pub url: String,
    /// Dataset slug the artifacts belong to.
    pub slug: String,
    /// Dataset version the artifacts were generated for.
    pub version: String,
}

/// Hands a written artifact to a delivery destination.
pub trait Uploader {
    /// Delivers the artifact; `Ok` means the destination confirmed receipt.
    fn deliver(&self, artifact: &Path, destination: &Destination) -> Result<(), VarstatError>;
}
