use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use varstat_core::errors::{ErrorInfo, VarstatError};
use varstat_core::{Field, FieldCatalog};

use crate::serde::from_yaml_slice;

/// Title of the implicit plain-distribution comparison.
pub const HISTOGRAM_TITLE: &str = "Histogram";

fn config_error(code: &str, message: impl Into<String>) -> VarstatError {
    VarstatError::Config(ErrorInfo::new(code, message))
}

/// One configured comparison field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Identifier of the comparison field.
    pub chart: String,
    /// Title the artifact slug is derived from.
    pub title: String,
}

/// Named delivery destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webserver {
    /// Name recorded in the progress ledger.
    pub name: String,
    /// Destination URL or filesystem path.
    pub url: String,
}

/// Project-level configuration read from `.varstat.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Stratification field id.
    #[serde(default)]
    pub visit: String,
    /// Comparison fields in output order.
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    /// Dataset slug used when delivering.
    #[serde(default)]
    pub slug: String,
    /// Delivery destinations.
    #[serde(default)]
    pub webservers: Vec<Webserver>,
}

impl ProjectConfig {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, VarstatError> {
        let bytes = fs::read(path).map_err(|err| {
            VarstatError::Config(
                ErrorInfo::new("config.read", err.to_string())
                    .with_path(path),
            )
        })?;
        from_yaml_slice(&bytes).map_err(|err| {
            VarstatError::Config(
                err.info()
                    .clone()
                    .with_path(path),
            )
        })
    }

    /// Configured comparisons with the plain distribution prepended.
    pub fn comparisons(&self) -> Vec<ChartSpec> {
        let mut comparisons = Vec::with_capacity(self.charts.len() + 1);
        comparisons.push(ChartSpec {
            chart: self.visit.clone(),
            title: HISTOGRAM_TITLE.to_string(),
        });
        comparisons.extend(self.charts.iter().cloned());
        comparisons
    }

    /// Resolves the stratification and comparison fields against the catalog.
    pub fn resolve<'c, C>(&self, catalog: &'c C) -> Result<Comparisons<'c>, VarstatError>
    where
        C: FieldCatalog + ?Sized,
    {
        if self.visit.trim().is_empty() {
            return Err(config_error(
                "config.visit_blank",
                "the visit field in the project configuration can't be blank",
            ));
        }
        let stratification = catalog.find_by_id(&self.visit).ok_or_else(|| {
            VarstatError::Config(
                ErrorInfo::new("config.visit_missing", "could not find the visit field")
                    .with_context("visit", self.visit.clone()),
            )
        })?;
        let missing: Vec<&str> = self
            .charts
            .iter()
            .filter(|spec| catalog.find_by_id(&spec.chart).is_none())
            .map(|spec| spec.chart.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(VarstatError::Config(
                ErrorInfo::new(
                    "config.chart_missing",
                    "could not find the configured chart fields",
                )
                .with_context("charts", missing.join(", ")),
            ));
        }
        let entries = self
            .comparisons()
            .into_iter()
            .filter_map(|spec| {
                let field = catalog.find_by_id(&spec.chart)?;
                Some(Comparison {
                    slug: slug(&spec.title),
                    histogram: spec.chart == self.visit,
                    field,
                })
            })
            .collect();
        Ok(Comparisons {
            stratification,
            entries,
        })
    }

    /// Selects the single webserver whose name starts with `environment`.
    pub fn webserver(&self, environment: &str) -> Result<&Webserver, VarstatError> {
        if self.webservers.is_empty() {
            return Err(config_error(
                "config.webservers_empty",
                "no webservers are configured",
            ));
        }
        let prefix = environment.to_lowercase();
        let matches: Vec<&Webserver> = self
            .webservers
            .iter()
            .filter(|server| server.name.to_lowercase().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [server] => Ok(server),
            [] => Err(VarstatError::Config(
                ErrorInfo::new("config.webserver_unmatched", "no webserver matches")
                    .with_context("environment", environment)
                    .with_hint(format!("configured: {}", self.webserver_names().join(", "))),
            )),
            many => Err(VarstatError::Config(
                ErrorInfo::new("config.webserver_ambiguous", "several webservers match")
                    .with_context("environment", environment)
                    .with_hint(format!(
                        "did you mean one of: {}",
                        many.iter()
                            .map(|server| server.name.to_lowercase())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
            )),
        }
    }

    fn webserver_names(&self) -> Vec<String> {
        self.webservers
            .iter()
            .map(|server| server.name.to_lowercase())
            .collect()
    }
}

/// A comparison resolved to its field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'c> {
    /// Key of this comparison in the artifact's `charts` and `tables` maps.
    pub slug: String,
    /// Comparison field.
    pub field: &'c Field,
    /// True for the plain distribution (comparison against the stratification field).
    pub histogram: bool,
}

/// Every comparison a field's artifact is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparisons<'c> {
    /// Field splitting subjects into groups (typically a visit indicator).
    pub stratification: &'c Field,
    /// Comparisons in output order, plain distribution first.
    pub entries: Vec<Comparison<'c>>,
}

/// Artifact key derived from a comparison title.
pub fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}
