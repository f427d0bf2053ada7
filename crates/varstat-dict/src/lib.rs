//! Dictionary and CSV subject loaders for varstat.
//!
//! A dataset root holds a `VERSION` file, variable definitions under
//! `variables/`, option lists under `domains/` and one folder of subject
//! exports per version under `csvs/`.

use std::fs;
use std::path::Path;

use varstat_core::errors::{ErrorInfo, VarstatError};

pub mod catalog;
pub mod subjects;

pub use catalog::{load_catalog, load_domains};
pub use subjects::{load_subjects, parse_value, SubjectOpts};

/// Version used when the dataset root has no `VERSION` file.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Reads the dataset version from `<root>/VERSION`.
pub fn dataset_version(root: &Path) -> Result<String, VarstatError> {
    let path = root.join("VERSION");
    if !path.is_file() {
        return Ok(DEFAULT_VERSION.to_string());
    }
    let text = fs::read_to_string(&path).map_err(|err| {
        VarstatError::Dictionary(ErrorInfo::new("dict.version", err.to_string()).with_path(&path))
    })?;
    let version = text.trim();
    if version.is_empty() {
        Ok(DEFAULT_VERSION.to_string())
    } else {
        Ok(version.to_string())
    }
}
