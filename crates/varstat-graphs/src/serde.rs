use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use varstat_core::errors::{ErrorInfo, VarstatError};

fn serde_error(code: &str, err: impl ToString) -> VarstatError {
    VarstatError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn persist_error(code: &str, path: &Path, err: impl ToString) -> VarstatError {
    VarstatError::Persist(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// Serializes a value into pretty-printed JSON followed by a newline.
///
/// Map ordering is whatever the value's own types impose, so output is
/// deterministic as long as the value uses ordered maps.
pub fn to_pretty_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, VarstatError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|err| serde_error("json_serialize", err))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VarstatError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VarstatError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Replaces `path` with `bytes` without ever exposing a partially written file.
///
/// The bytes go to a temporary file in the destination directory which is then
/// renamed over the target, so readers see either the old or the new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), VarstatError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| persist_error("atomic_mkdir", dir, err))?;
    let mut temp =
        NamedTempFile::new_in(dir).map_err(|err| persist_error("atomic_tempfile", dir, err))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| persist_error("atomic_write", path, err))?;
    temp.persist(path)
        .map_err(|err| persist_error("atomic_rename", path, err.error))?;
    Ok(())
}
