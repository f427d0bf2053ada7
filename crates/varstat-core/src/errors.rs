//! Structured error types shared across varstat crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context key naming the field an error concerns.
pub const FIELD_KEY: &str = "field";
/// Context key naming the delivery destination an error concerns.
pub const DESTINATION_KEY: &str = "destination";
/// Context key naming the file an error concerns.
pub const PATH_KEY: &str = "path";

/// Structured payload attached to every [`VarstatError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, field ids, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Records the field id the error concerns.
    pub fn with_field(self, field_id: impl Into<String>) -> Self {
        self.with_context(FIELD_KEY, field_id)
    }

    /// Records the delivery destination the error concerns.
    pub fn with_destination(self, destination: impl Into<String>) -> Self {
        self.with_context(DESTINATION_KEY, destination)
    }

    /// Records the file the error concerns.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context(PATH_KEY, path.display().to_string())
    }

    /// Field id recorded with [`ErrorInfo::with_field`].
    pub fn field(&self) -> Option<&str> {
        self.context.get(FIELD_KEY).map(String::as_str)
    }

    /// Destination recorded with [`ErrorInfo::with_destination`].
    pub fn destination(&self) -> Option<&str> {
        self.context.get(DESTINATION_KEY).map(String::as_str)
    }
}

/// Canonical error type for varstat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum VarstatError {
    /// Project configuration could not be resolved; aborts a run before any field is visited.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Field or domain definitions could not be loaded.
    #[error("dictionary error: {0}")]
    Dictionary(ErrorInfo),
    /// Subject records could not be loaded.
    #[error("subjects error: {0}")]
    Subjects(ErrorInfo),
    /// Artifact or ledger files could not be written.
    #[error("persist error: {0}")]
    Persist(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// A destination did not confirm receipt of an artifact.
    #[error("delivery error: {0}")]
    Delivery(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.field(), self.destination()) {
            (Some(field), Some(destination)) => write!(f, "[{field} -> {destination}] ")?,
            (Some(field), None) => write!(f, "[{field}] ")?,
            (None, Some(destination)) => write!(f, "[-> {destination}] ")?,
            (None, None) => {}
        }
        write!(f, "{} ({})", self.message, self.code)?;
        let rest: Vec<String> = self
            .context
            .iter()
            .filter(|(key, _)| key.as_str() != FIELD_KEY && key.as_str() != DESTINATION_KEY)
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !rest.is_empty() {
            write!(f, " {{{}}}", rest.join(", "))?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

impl VarstatError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            VarstatError::Config(info)
            | VarstatError::Dictionary(info)
            | VarstatError::Subjects(info)
            | VarstatError::Persist(info)
            | VarstatError::Serde(info)
            | VarstatError::Delivery(info) => info,
        }
    }

    /// Tags the payload with the field it concerns.
    pub fn with_field(self, field_id: impl Into<String>) -> Self {
        self.map_info(|info| info.with_field(field_id))
    }

    /// Tags the payload with the destination it concerns.
    pub fn with_destination(self, destination: impl Into<String>) -> Self {
        self.map_info(|info| info.with_destination(destination))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            VarstatError::Config(info) => VarstatError::Config(f(info)),
            VarstatError::Dictionary(info) => VarstatError::Dictionary(f(info)),
            VarstatError::Subjects(info) => VarstatError::Subjects(f(info)),
            VarstatError::Persist(info) => VarstatError::Persist(f(info)),
            VarstatError::Serde(info) => VarstatError::Serde(f(info)),
            VarstatError::Delivery(info) => VarstatError::Delivery(f(info)),
        }
    }

    /// Returns true for errors that must abort a whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VarstatError::Config(_))
    }
}
