//! Recursive in-place archive extraction.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::exec::{exec, ExecError};

/// Archiver looked up on `PATH` when none is configured.
pub const DEFAULT_ARCHIVER: &str = "7z";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExecError),
}

/// Extracts every `.zip` file under `root` into the directory that contains
/// it, using the default archiver. Returns the archives that were extracted.
pub async fn unzip_all(root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    Extractor::default().extract_all(root).await
}

/// Runs a 7-Zip compatible archiver as `<binary> x <archive> -o<dir>`.
#[derive(Debug, Clone)]
pub struct Extractor {
    binary: PathBuf,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVER)
    }
}

impl Extractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Extracts every `.zip` file under `root` next to itself.
    ///
    /// Each directory is listed before its archives are extracted, so
    /// directories created by an extraction are not visited.
    pub async fn extract_all(&self, root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
        let binary = self.binary.display().to_string();
        let mut extracted = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let (archives, subdirs) = scan(&dir).await?;
            for archive in archives {
                let output = format!("-o{}", dir.display());
                let archive_arg = archive.display().to_string();
                exec(&binary, &["x", archive_arg.as_str(), output.as_str()]).await?;
                info!(archive = %archive.display(), "extracted");
                extracted.push(archive);
            }
            pending.extend(subdirs);
        }

        Ok(extracted)
    }
}

/// Lists the `.zip` files and subdirectories directly inside `dir`, sorted.
async fn scan(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ArchiveError> {
    let read_dir_err = |source: std::io::Error| ArchiveError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut archives = Vec::new();
    let mut subdirs = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let path = entry.path();
        // `file_type` does not follow symlinks, matching an lstat.
        let file_type = entry.file_type().await.map_err(read_dir_err)?;
        if path.extension().is_some_and(|ext| ext == "zip") && !file_type.is_dir() {
            archives.push(path);
        } else if file_type.is_dir() {
            subdirs.push(path);
        }
    }
    archives.sort();
    subdirs.sort();
    Ok((archives, subdirs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scan_separates_archives_from_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.zip"), b"").unwrap();
        std::fs::write(dir.path().join("a.zip"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let (archives, subdirs) = scan(dir.path()).await.unwrap();

        assert_eq!(archives, [dir.path().join("a.zip"), dir.path().join("b.zip")]);
        assert_eq!(subdirs, [dir.path().join("nested")]);
    }

    #[tokio::test]
    async fn tree_without_archives_extracts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        std::fs::write(dir.path().join("a/b/readme.md"), b"").unwrap();

        let extracted = unzip_all(dir.path()).await.unwrap();
        assert!(extracted.is_empty());
    }

    #[tokio::test]
    async fn missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = unzip_all(&dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, ArchiveError::ReadDir { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn every_archive_is_extracted_into_its_own_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("artifacts");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("a.zip"), b"").unwrap();
        std::fs::write(root.join("sub/b.zip"), b"").unwrap();
        std::fs::write(root.join("sub/readme.md"), b"").unwrap();

        // Stand-in archiver that appends one line per argument.
        let script = dir.path().join("fake-7z.sh");
        let log = dir.path().join("args.txt");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nprintf '%s\\n' \"$@\" >> '{}'\n", log.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let extracted = Extractor::new(&script).extract_all(&root).await.unwrap();

        assert_eq!(extracted, [root.join("a.zip"), root.join("sub/b.zip")]);
        let recorded = std::fs::read_to_string(&log).unwrap();
        let expected = format!(
            "x\n{}\n-o{}\nx\n{}\n-o{}\n",
            root.join("a.zip").display(),
            root.display(),
            root.join("sub/b.zip").display(),
            root.join("sub").display(),
        );
        assert_eq!(recorded, expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn archiver_failure_stops_extraction() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("artifacts");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("broken.zip"), b"").unwrap();

        let script = dir.path().join("failing-7z.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'Can not open the file as archive' >&2\nexit 2\n")
            .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = Extractor::new(&script).extract_all(&root).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Extract(ExecError::NonZero { .. })), "{err}");
    }
}
