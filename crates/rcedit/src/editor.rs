//! Applies a [`ResourceProperties`] set to every binary matching a glob.

use std::path::{Path, PathBuf};

use toolkit::exec;
use tracing::{debug, info, warn};

use crate::{RceditError, ResourceProperties};

/// Default editor binary, looked up on `PATH`.
pub const DEFAULT_EDITOR: &str = "rcedit";

/// Runs the resource editor binary.
#[derive(Debug, Clone)]
pub struct ResourceEditor {
    binary: PathBuf,
}

impl Default for ResourceEditor {
    fn default() -> Self {
        Self::new(DEFAULT_EDITOR)
    }
}

impl ResourceEditor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Writes `properties` into one file in place.
    pub async fn apply(
        &self,
        file: &Path,
        properties: &ResourceProperties,
    ) -> Result<(), RceditError> {
        let mut args = vec![file.display().to_string()];
        args.extend(properties.to_args());

        exec(&self.binary.display().to_string(), &args)
            .await
            .map_err(|source| RceditError::Editor {
                file: file.to_path_buf(),
                source,
            })?;
        debug!(file = %file.display(), "processed with rcedit");
        Ok(())
    }

    /// Resolves `pattern` and edits every match sequentially. The first
    /// failure aborts the run. Returns the edited files.
    pub async fn apply_all(
        &self,
        pattern: &str,
        properties: &ResourceProperties,
    ) -> Result<Vec<PathBuf>, RceditError> {
        let files = resolve_glob(pattern)?;
        if files.is_empty() {
            warn!(pattern, "no files matched");
        }

        for file in &files {
            self.apply(file, properties).await?;
        }
        info!(count = files.len(), "edited resources");
        Ok(files)
    }
}

/// Expands a glob pattern into absolute paths, in glob order.
pub fn resolve_glob(pattern: &str) -> Result<Vec<PathBuf>, RceditError> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        let absolute = std::path::absolute(&path).map_err(|source| RceditError::Resolve {
            path: path.clone(),
            source,
        })?;
        files.push(absolute);
    }
    debug!(
        "Absolute path to file(s): \"{}\"",
        files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(files)
}
