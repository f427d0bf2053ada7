use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use varstat_core::errors::{ErrorInfo, VarstatError};
use varstat_core::{Field, FieldCatalog, FieldType, Subject, SubjectTable, Value};
use walkdir::WalkDir;

fn subjects_error(code: &str, path: &Path, err: impl ToString) -> VarstatError {
    VarstatError::Subjects(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// Options controlling which rows are read.
#[derive(Debug, Clone, Default)]
pub struct SubjectOpts {
    /// Maximum number of data rows read from each file.
    pub rows: Option<usize>,
}

/// Types a raw CSV cell according to its field; blank cells are absent.
pub fn parse_value(field: &Field, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match field.field_type {
        FieldType::Integer => raw
            .parse::<i64>()
            .map(Value::Integer)
            .or_else(|_| raw.parse::<f64>().map(Value::Number))
            .ok(),
        FieldType::Numeric => raw.parse::<f64>().ok().map(Value::Number),
        FieldType::Choices | FieldType::Other => Some(Value::Code(raw.to_string())),
    }
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, VarstatError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| subjects_error("subjects.walk", dir, err))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Reads every `<root>/csvs/<version>/**/*.csv` file into a subject table.
///
/// Each row is one subject. Lower-cased column headers that name a catalog
/// field become accessors; every other column is ignored.
pub fn load_subjects<C>(
    root: &Path,
    version: &str,
    catalog: &C,
    opts: &SubjectOpts,
) -> Result<SubjectTable, VarstatError>
where
    C: FieldCatalog + ?Sized,
{
    let dir = root.join("csvs").join(version);
    let mut table = SubjectTable::new(Vec::<String>::new());
    if !dir.is_dir() {
        warn!(path = %dir.display(), "no subject files for this version");
        return Ok(table);
    }
    for path in csv_files(&dir)? {
        let before = table.len();
        read_csv(&path, catalog, opts, &mut table)?;
        debug!(path = %path.display(), rows = table.len() - before, "subjects loaded");
    }
    Ok(table)
}

fn read_csv<C>(
    path: &Path,
    catalog: &C,
    opts: &SubjectOpts,
    table: &mut SubjectTable,
) -> Result<(), VarstatError>
where
    C: FieldCatalog + ?Sized,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|err| subjects_error("subjects.open", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| subjects_error("subjects.headers", path, err))?
        .clone();
    let columns: Vec<Option<&Field>> = headers
        .iter()
        .map(|header| catalog.find_by_id(&header.trim().to_lowercase()))
        .collect();
    for field in columns.iter().flatten() {
        table.expose(field.id.clone());
    }

    for (line, record) in reader.records().enumerate() {
        if opts.rows.is_some_and(|rows| line >= rows) {
            break;
        }
        let record = record.map_err(|err| {
            VarstatError::Subjects(
                ErrorInfo::new("subjects.row", err.to_string())
                    .with_path(path)
                    .with_context("line", (line + 2).to_string()),
            )
        })?;
        let mut subject = Subject::new();
        for (field, raw) in columns.iter().zip(record.iter()) {
            if let Some(field) = field {
                subject.set(field.id.clone(), parse_value(field, raw));
            }
        }
        table.push(subject);
    }
    Ok(())
}
