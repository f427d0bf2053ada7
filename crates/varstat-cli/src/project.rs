use std::path::{Path, PathBuf};

use tracing::info;
use varstat_core::{Catalog, SubjectTable, VarstatError};
use varstat_dict::{dataset_version, load_catalog, load_subjects, SubjectOpts};
use varstat_graphs::{Pipeline, ProjectConfig};

/// Project configuration file at the dataset root.
pub const CONFIG_FILE: &str = ".varstat.yml";

/// Everything a run needs, loaded from one dataset root.
pub struct Project {
    pub root: PathBuf,
    pub version: String,
    pub config: ProjectConfig,
    pub catalog: Catalog,
    pub subjects: SubjectTable,
}

impl Project {
    pub fn load(root: &Path, rows: Option<usize>) -> Result<Self, VarstatError> {
        let config = ProjectConfig::load(&root.join(CONFIG_FILE))?;
        let version = dataset_version(root)?;
        let catalog = load_catalog(root)?;
        let subjects = load_subjects(root, &version, &catalog, &SubjectOpts { rows })?;
        info!(
            root = %root.display(),
            version = %version,
            subjects = subjects.len(),
            "dataset loaded"
        );
        Ok(Self {
            root: root.to_path_buf(),
            version,
            config,
            catalog,
            subjects,
        })
    }

    /// Output folder for this dataset version's documents.
    pub fn graphs_dir(&self) -> PathBuf {
        self.root.join("graphs").join(&self.version)
    }

    pub fn pipeline(&self) -> Result<Pipeline<'_, Catalog>, VarstatError> {
        Pipeline::new(
            &self.catalog,
            &self.subjects,
            &self.config,
            self.graphs_dir(),
        )
    }
}
