//! Persisted record of generation and delivery progress.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use varstat_core::errors::VarstatError;

use crate::serde::{from_json_slice, to_pretty_json_bytes, write_atomic};

/// File name of the ledger inside the graphs directory.
pub const LEDGER_FILE: &str = ".progress.json";

/// Progress of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Set once the field's document has been written.
    #[serde(default)]
    pub generated: bool,
    /// Destinations that confirmed receipt of the document.
    #[serde(default)]
    pub uploaded: BTreeSet<String>,
}

/// Per-field progress tagged with the version that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    version: String,
    #[serde(default)]
    fields: BTreeMap<String, LedgerEntry>,
}

impl Ledger {
    /// Creates an empty ledger for the given version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Loads the ledger at `path`, starting over when it cannot be trusted.
    ///
    /// A missing or unparseable file, a file written by another version, or
    /// `force_clean` all yield an empty ledger. Loading never fails.
    pub fn load(path: &Path, version: &str, force_clean: bool) -> Self {
        if force_clean {
            info!(path = %path.display(), "clean run requested, starting a fresh ledger");
            return Self::new(version);
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no ledger yet");
                return Self::new(version);
            }
            Err(err) => {
                info!(path = %path.display(), error = %err, "ledger unreadable, starting fresh");
                return Self::new(version);
            }
        };
        match from_json_slice::<Ledger>(&bytes) {
            Ok(ledger) if ledger.version == version => ledger,
            Ok(ledger) => {
                info!(
                    stored = %ledger.version,
                    current = %version,
                    "ledger written by another version, starting fresh"
                );
                Self::new(version)
            }
            Err(err) => {
                info!(path = %path.display(), error = %err, "ledger unparseable, starting fresh");
                Self::new(version)
            }
        }
    }

    /// Version the ledger is tagged with.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entry for a field, created on first use.
    pub fn entry_for(&mut self, field_id: &str) -> &mut LedgerEntry {
        self.fields.entry(field_id.to_string()).or_default()
    }

    /// Entry for a field, if one was ever created.
    pub fn get(&self, field_id: &str) -> Option<&LedgerEntry> {
        self.fields.get(field_id)
    }

    /// Records that the field's document was written.
    pub fn mark_generated(&mut self, field_id: &str) {
        self.entry_for(field_id).generated = true;
    }

    /// Records that a destination confirmed receipt of the field's document.
    pub fn mark_uploaded(&mut self, field_id: &str, destination: &str) {
        self.entry_for(field_id)
            .uploaded
            .insert(destination.to_string());
    }

    /// Returns true when the field's document was written.
    pub fn is_generated(&self, field_id: &str) -> bool {
        self.get(field_id).map(|e| e.generated).unwrap_or(false)
    }

    /// Returns true when the destination already holds the field's document.
    pub fn is_uploaded(&self, field_id: &str, destination: &str) -> bool {
        self.get(field_id)
            .map(|e| e.uploaded.contains(destination))
            .unwrap_or(false)
    }

    /// Number of fields with an entry.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field has an entry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Atomically replaces the file at `path` with this ledger.
    pub fn persist(&self, path: &Path) -> Result<(), VarstatError> {
        let bytes = to_pretty_json_bytes(self)?;
        write_atomic(path, &bytes)?;
        debug!(path = %path.display(), fields = self.fields.len(), "ledger persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_created_lazily() {
        let mut ledger = Ledger::new("1.0.0");
        assert!(ledger.get("age").is_none());
        assert!(!ledger.is_generated("age"));
        ledger.entry_for("age");
        assert_eq!(ledger.get("age"), Some(&LedgerEntry::default()));
    }

    #[test]
    fn uploads_are_tracked_per_destination() {
        let mut ledger = Ledger::new("1.0.0");
        ledger.mark_generated("age");
        ledger.mark_uploaded("age", "staging");
        assert!(ledger.is_generated("age"));
        assert!(ledger.is_uploaded("age", "staging"));
        assert!(!ledger.is_uploaded("age", "production"));
    }
}
