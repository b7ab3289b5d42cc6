//! The repository an action runs for.

use domain::{OwnerName, RepositoryName};

/// `owner/repo` as provided by `GITHUB_REPOSITORY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    pub owner: OwnerName,
    pub repo: RepositoryName,
}

impl RepositoryContext {
    /// Parses `"owner/repo"`; `None` when either part is missing.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.trim().split_once('/')?;
        if repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: OwnerName::new(owner)?,
            repo: RepositoryName::new(repo)?,
        })
    }

    /// The fully qualified `owner/repo` name.
    pub fn fqn(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
