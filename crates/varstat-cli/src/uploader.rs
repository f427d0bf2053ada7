use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use varstat_core::{Destination, ErrorInfo, Uploader, VarstatError};
use varstat_graphs::hash::sha256_hex;
use varstat_graphs::serde::write_atomic;

fn delivery_error(code: &str, path: &Path, message: impl Into<String>) -> VarstatError {
    VarstatError::Delivery(ErrorInfo::new(code, message).with_path(path))
}

/// Delivers documents into a directory tree, one folder per slug and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUploader {
    root: PathBuf,
}

impl DirectoryUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Accepts `file://` URLs and plain paths; other schemes have no uploader.
    pub fn from_url(url: &str) -> Result<Self, VarstatError> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(Self::new(path));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(VarstatError::Config(
                ErrorInfo::new("deliver.unsupported_scheme", "no uploader for this destination")
                    .with_context("url", url)
                    .with_hint(format!(
                        "`{scheme}` destinations are not supported; use a file:// URL or a path"
                    )),
            ));
        }
        Ok(Self::new(url))
    }

    /// Folder a destination's documents land in.
    pub fn target_dir(&self, destination: &Destination) -> PathBuf {
        self.root
            .join(&destination.slug)
            .join(&destination.version)
            .join("graphs")
    }
}

impl Uploader for DirectoryUploader {
    fn deliver(&self, artifact: &Path, destination: &Destination) -> Result<(), VarstatError> {
        let bytes = fs::read(artifact)
            .map_err(|err| delivery_error("deliver.read", artifact, err.to_string()))?;
        let file_name = artifact
            .file_name()
            .ok_or_else(|| delivery_error("deliver.read", artifact, "artifact has no file name"))?;
        let dir = self.target_dir(destination);
        fs::create_dir_all(&dir)
            .map_err(|err| delivery_error("deliver.mkdir", &dir, err.to_string()))?;
        let target = dir.join(file_name);
        write_atomic(&target, &bytes)?;

        let expected = sha256_hex(&bytes);
        let written = fs::read(&target)
            .map_err(|err| delivery_error("deliver.verify", &target, err.to_string()))?;
        let received = sha256_hex(&written);
        if received != expected {
            return Err(VarstatError::Delivery(
                ErrorInfo::new("deliver.checksum", "destination copy does not match")
                    .with_path(&target)
                    .with_context("expected", expected)
                    .with_context("received", received),
            ));
        }
        debug!(path = %target.display(), sha256 = %received, "document delivered");
        Ok(())
    }
}
