//! Port traits implemented by infrastructure crates.
//!
//! The orchestration layer depends only on these traits; the `jira`,
//! `github`, and `toolkit` crates supply the concrete adapters. All traits are
//! dyn-compatible so they can be shared across spawned tasks as
//! `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::errors::{GitError, HostError, TrackerError};
use crate::{
    CommitSha, IssueKey, NewVersion, OwnerName, ProjectId, ReleaseVersion, RepositoryName,
    TagName, TagRequest, TransitionId, VersionId,
};

/// A Jira-shaped issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns the current status label of an issue, exactly as the tracker
    /// reports it.
    async fn get_issue_status(&self, issue: &IssueKey) -> Result<String, TrackerError>;

    /// Applies a workflow transition to an issue.
    async fn do_transition(
        &self,
        issue: &IssueKey,
        transition: TransitionId,
    ) -> Result<(), TrackerError>;

    /// Lists the versions defined in a project.
    async fn get_project_versions(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<ReleaseVersion>, TrackerError>;

    /// Creates a project version.
    async fn create_version(&self, version: &NewVersion) -> Result<ReleaseVersion, TrackerError>;

    /// Replaces the fix versions of an issue with the single given version.
    async fn set_fix_version(
        &self,
        issue: &IssueKey,
        version: &VersionId,
    ) -> Result<(), TrackerError>;
}

/// A GitHub-shaped repository host.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Creates a lightweight tag pointing directly at a commit.
    async fn create_lightweight_tag(&self, request: &TagRequest) -> Result<(), HostError>;

    /// Returns the messages of the commits reachable from `head` but not from
    /// `base`, oldest first.
    async fn compare_commits(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        base: &CommitSha,
        head: &CommitSha,
    ) -> Result<Vec<String>, HostError>;
}

/// The Git checkout the action runs in.
#[async_trait]
pub trait LocalRepository: Send + Sync {
    /// The most recent tag reachable from `HEAD`.
    async fn latest_version(&self) -> Result<TagName, GitError>;

    /// Creates a lightweight tag at `HEAD`.
    async fn tag(&self, tag: &TagName) -> Result<(), GitError>;

    /// Pushes all local tags to the default remote.
    async fn push_tags(&self) -> Result<(), GitError>;

    /// Reads a file as it was at `revision`.
    async fn read_file_at(&self, revision: &TagName, path: &str) -> Result<String, GitError>;
}
