//! System git backend for the checkout the action runs in.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain::{GitError, LocalRepository, TagName};
use tracing::info;

use crate::exec::{exec_in, ExecError};

/// [`LocalRepository`] implemented by shelling out to `git`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    work_tree: PathBuf,
}

impl SystemGit {
    /// Uses the repository containing `work_tree`.
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
        }
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    async fn git(&self, operation: &str, args: &[&str]) -> Result<String, GitError> {
        exec_in(&self.work_tree, "git", args)
            .await
            .map_err(|e| git_error(operation, e))
    }
}

fn git_error(operation: &str, err: ExecError) -> GitError {
    match err {
        ExecError::NonZero { output, .. } if !output.is_empty() => GitError::new(operation, output),
        other => GitError::new(operation, other.to_string()),
    }
}

#[async_trait]
impl LocalRepository for SystemGit {
    async fn latest_version(&self) -> Result<TagName, GitError> {
        let out = self
            .git("describe", &["describe", "--tags", "--abbrev=0"])
            .await?;
        TagName::new(out.trim()).ok_or_else(|| GitError::new("describe", "no tag found"))
    }

    async fn tag(&self, tag: &TagName) -> Result<(), GitError> {
        self.git("tag", &["tag", tag.as_str()]).await?;
        info!(%tag, "created tag");
        Ok(())
    }

    async fn push_tags(&self) -> Result<(), GitError> {
        self.git("push", &["push", "--tags"]).await?;
        Ok(())
    }

    async fn read_file_at(&self, revision: &TagName, path: &str) -> Result<String, GitError> {
        let object = format!("{revision}:{path}");
        self.git("show", &["show", object.as_str()]).await
    }
}
