//! Shared value types for the release domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! structure and participate in domain computations (version-name derivation,
//! changelog aggregation).

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::{CommitSha, IssueKey, OwnerName, ProjectId, RepositoryName, TagName, VersionId};

// ---------------------------------------------------------------------------
// Lockfile
// ---------------------------------------------------------------------------

/// Versioned manifest recording the release version and the exact commit of
/// each constituent repository.
///
/// Produced upstream; this system only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Tag-shaped release version (e.g. `"v2.0.0"`).
    pub version: TagName,

    /// Commit pinned for every repository that makes up the release. Keyed
    /// by name, so repositories are visited alphabetically, not in file order.
    #[serde(default)]
    pub repositories: BTreeMap<RepositoryName, CommitSha>,
}

impl Lockfile {
    /// Parses a lockfile from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::InvalidDocument {
            document: "lockfile",
            message: e.to_string(),
        })
    }

    /// The Jira release version name: the version with one leading `v` removed.
    pub fn release_version_name(&self) -> &str {
        let version = self.version.as_str();
        version.strip_prefix('v').unwrap_or(version)
    }
}

// ---------------------------------------------------------------------------
// Repositories manifest
// ---------------------------------------------------------------------------

/// The repositories whose changelogs participate in issue computation.
///
/// Stored as a JSON array of repository names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoriesManifest(Vec<RepositoryName>);

impl RepositoriesManifest {
    /// Creates a manifest from a list of repository names.
    pub fn new(repositories: Vec<RepositoryName>) -> Self {
        Self(repositories)
    }

    /// Parses a manifest from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::InvalidDocument {
            document: "repositories manifest",
            message: e.to_string(),
        })
    }

    /// Iterates the repository names in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryName> {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Jira release versions
// ---------------------------------------------------------------------------

/// A Jira project version, used as the fix version of released issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseVersion {
    pub id: VersionId,
    pub name: String,
    pub release_date: Option<NaiveDate>,
}

/// Payload for creating a project version that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub name: String,
    pub project: ProjectId,
    pub release_date: NaiveDate,
}

impl NewVersion {
    /// A version named `name`, released today (UTC).
    pub fn released_today(name: impl Into<String>, project: ProjectId) -> Self {
        Self {
            name: name.into(),
            project,
            release_date: Utc::now().date_naive(),
        }
    }
}

// ---------------------------------------------------------------------------
// Repository host requests
// ---------------------------------------------------------------------------

/// Request to create a lightweight tag pointing directly at a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub owner: OwnerName,
    pub repo: RepositoryName,
    pub tag: TagName,
    pub sha: CommitSha,
}

// ---------------------------------------------------------------------------
// Changelog
// ---------------------------------------------------------------------------

/// One commit of a repository's changelog between two releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub repository: RepositoryName,
    pub message: String,
    /// Issues linked from the commit message.
    pub issues: Vec<IssueKey>,
}

impl ChangelogEntry {
    /// Builds an entry, extracting the linked issues from the commit message.
    pub fn from_commit(repository: RepositoryName, message: impl Into<String>) -> Self {
        let message = message.into();
        let issues = crate::changelog::extract_issue_keys(&message);
        Self {
            repository,
            message,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lockfile_parses_and_strips_leading_v() {
        let lockfile =
            Lockfile::from_json(r#"{"version":"v1.2.3","repositories":{"repoA":"abc123"}}"#)
                .unwrap();

        assert_eq!(lockfile.release_version_name(), "1.2.3");
        let repo = RepositoryName::new("repoA").unwrap();
        assert_eq!(lockfile.repositories[&repo].as_str(), "abc123");
    }

    #[test]
    fn version_without_prefix_is_kept() {
        let lockfile = Lockfile::from_json(r#"{"version":"2.0.0"}"#).unwrap();
        assert_eq!(lockfile.release_version_name(), "2.0.0");
        assert!(lockfile.repositories.is_empty());
    }

    #[test]
    fn malformed_lockfile_names_the_document() {
        let err = Lockfile::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("Invalid lockfile"));
    }

    #[test]
    fn manifest_is_a_json_array_of_names() {
        let manifest = RepositoriesManifest::from_json(r#"["repoA","repoB"]"#).unwrap();
        let names: Vec<_> = manifest.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, ["repoA", "repoB"]);
    }
}
