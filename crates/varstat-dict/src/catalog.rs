use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use varstat_core::errors::{ErrorInfo, VarstatError};
use varstat_core::{Catalog, Field, FieldOption, FieldType};
use walkdir::WalkDir;

/// Field types accepted in variable definitions that never get charts.
const PLAIN_TYPES: &[&str] = &["string", "text", "date", "time", "file", "identifier"];

#[derive(Debug, Deserialize)]
struct VariableFile {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    units: String,
    #[serde(default)]
    domain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DomainOptionFile {
    value: String,
    display_name: String,
    #[serde(default)]
    missing: bool,
}

fn dictionary_error(code: &str, path: &Path, err: impl ToString) -> VarstatError {
    VarstatError::Dictionary(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// JSON files below `dir`, sorted by path.
fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, VarstatError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| dictionary_error("dict.walk", dir, err))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads every domain under `<root>/domains`, keyed by lowercase file stem.
///
/// A domain file that does not parse is skipped; fields referring to it
/// are then reported as invalid.
pub fn load_domains(root: &Path) -> Result<BTreeMap<String, Vec<FieldOption>>, VarstatError> {
    let dir = root.join("domains");
    let mut domains = BTreeMap::new();
    if !dir.is_dir() {
        debug!(path = %dir.display(), "no domains folder");
        return Ok(domains);
    }
    for path in json_files(&dir)? {
        let bytes = fs::read(&path).map_err(|err| dictionary_error("dict.read", &path, err))?;
        match serde_json::from_slice::<Vec<DomainOptionFile>>(&bytes) {
            Ok(options) => {
                let options = options
                    .into_iter()
                    .map(|option| FieldOption {
                        value: option.value,
                        display_name: option.display_name,
                        missing: option.missing,
                    })
                    .collect();
                domains.insert(file_stem(&path).to_lowercase(), options);
            }
            Err(err) => warn!(path = %path.display(), error = %err, "skipping malformed domain"),
        }
    }
    Ok(domains)
}

/// Loads and validates every variable under `<root>/variables`.
///
/// Definitions with problems are kept in the catalog with their validation
/// errors attached, so callers can report and skip them.
pub fn load_catalog(root: &Path) -> Result<Catalog, VarstatError> {
    let dir = root.join("variables");
    if !dir.is_dir() {
        return Err(dictionary_error(
            "dict.variables_missing",
            &dir,
            "no variables folder in the dictionary",
        ));
    }
    let domains = load_domains(root)?;
    let mut fields = Vec::new();
    for path in json_files(&dir)? {
        let bytes = fs::read(&path).map_err(|err| dictionary_error("dict.read", &path, err))?;
        let folder = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&dir).ok())
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .filter(|rel| !rel.is_empty())
            .map(|rel| format!("{rel}/"))
            .unwrap_or_default();
        let mut field = match serde_json::from_slice::<VariableFile>(&bytes) {
            Ok(variable) => validate(variable, &file_stem(&path), &domains),
            Err(err) => {
                let stem = file_stem(&path);
                Field::new(stem.clone(), stem, FieldType::Other)
                    .with_error(format!("could not parse definition: {err}"))
            }
        };
        field.folder = folder;
        if !field.is_valid() {
            debug!(field = %field.id, errors = ?field.errors, "invalid definition");
        }
        fields.push(field);
    }
    debug!(fields = fields.len(), domains = domains.len(), "dictionary loaded");
    Ok(Catalog::new(fields))
}

fn validate(
    variable: VariableFile,
    stem: &str,
    domains: &BTreeMap<String, Vec<FieldOption>>,
) -> Field {
    let kind = variable.kind.to_lowercase();
    let field_type = match kind.as_str() {
        "numeric" => FieldType::Numeric,
        "integer" => FieldType::Integer,
        "choices" => FieldType::Choices,
        _ => FieldType::Other,
    };
    let display_name = if variable.display_name.is_empty() {
        variable.id.clone()
    } else {
        variable.display_name
    };
    let mut field = Field::new(variable.id, display_name, field_type).with_units(variable.units);

    if field.id != stem {
        field.errors.push(format!(
            "id `{}` does not match file name `{stem}`",
            field.id
        ));
    }
    if field.id != field.id.to_lowercase() {
        field.errors.push(format!("id `{}` must be lowercase", field.id));
    }
    if field_type == FieldType::Other && !PLAIN_TYPES.contains(&kind.as_str()) {
        field.errors.push(format!("unknown type `{}`", variable.kind));
    }
    if field_type == FieldType::Choices {
        match variable.domain.as_deref().map(str::to_lowercase) {
            Some(name) => match domains.get(&name) {
                Some(options) => field.options = options.clone(),
                None => field.errors.push(format!("domain `{name}` not found")),
            },
            None => field.errors.push("choices variable has no domain".to_string()),
        }
    }
    field
}
