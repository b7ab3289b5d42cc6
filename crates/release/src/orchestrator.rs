//! Sequences a release run.
//!
//! ```text
//! ComputeIssues -> TagCurrentRepo -> TagSubRepos -> TransitionIssues -> UpdateFixVersions -> Done
//! ```
//!
//! Only issue computation and tagging can fail the run. The Jira phases are
//! advisory: their failures are logged and reported, never propagated.

use std::fmt;
use std::sync::Arc;

use domain::{
    issue_work_set, GitError, HostError, IssueKey, IssueTracker, LocalRepository, Lockfile,
    OwnerName, ProjectId, RepositoriesManifest, RepositoryHost, RepositoryName, TagName,
    TagRequest,
};
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use crate::changelog::{collect_changelog, ChangelogError, ChangelogSources};
use crate::fix_version::{assign_fix_versions, resolve_release_version, FixVersionReport};
use crate::walker::{TransitionSummary, TransitionWalker, WalkMode};

/// Default number of issues transitioned at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// ---------------------------------------------------------------------------
// Phases and errors
// ---------------------------------------------------------------------------

/// The phases of a release run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePhase {
    ComputeIssues,
    TagCurrentRepo,
    TagSubRepos,
    TransitionIssues,
    UpdateFixVersions,
    Done,
}

impl ReleasePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ReleasePhase::ComputeIssues => "compute_issues",
            ReleasePhase::TagCurrentRepo => "tag_current_repo",
            ReleasePhase::TagSubRepos => "tag_sub_repos",
            ReleasePhase::TransitionIssues => "transition_issues",
            ReleasePhase::UpdateFixVersions => "update_fix_versions",
            ReleasePhase::Done => "done",
        }
    }
}

impl fmt::Display for ReleasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository that could not be tagged.
#[derive(Debug)]
pub struct TagFailure {
    pub repository: RepositoryName,
    pub error: HostError,
}

/// Errors that fail a release run.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("failed to compute release issues: {0}")]
    ComputeIssues(#[from] ChangelogError),

    #[error("failed to tag {repository} with {tag}: {source}")]
    TagCurrentRepo {
        repository: String,
        tag: TagName,
        #[source]
        source: GitError,
    },

    #[error("failed to tag {} of {total} repositories: {}", .failures.len(), format_failures(.failures))]
    Tagging {
        total: usize,
        failures: Vec<TagFailure>,
    },
}

fn format_failures(failures: &[TagFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.repository, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Jira bookkeeping
// ---------------------------------------------------------------------------

/// Settings for the Jira phases.
#[derive(Debug, Clone)]
pub struct JiraSettings {
    /// Project that owns the release versions.
    pub project: ProjectId,
    pub walk_mode: WalkMode,
    pub max_concurrency: usize,
}

/// Outcome of the Jira phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraReport {
    /// `None` when the phase was skipped.
    pub transitions: Option<TransitionSummary>,
    pub fix_versions: FixVersionReport,
}

/// The Jira half of a release: issue transitions and fix versions.
///
/// Used by [`ReleaseOrchestrator`] and on its own for issue lists that were
/// computed elsewhere.
#[derive(Clone)]
pub struct JiraRelease {
    tracker: Arc<dyn IssueTracker>,
    settings: JiraSettings,
}

impl JiraRelease {
    pub fn new(tracker: Arc<dyn IssueTracker>, settings: JiraSettings) -> Self {
        Self { tracker, settings }
    }

    /// Runs both Jira phases for `issues`. `version_name` is the release
    /// version used as fix version.
    pub async fn run(&self, dry_run: bool, version_name: &str, issues: &[IssueKey]) -> JiraReport {
        if issues.is_empty() || dry_run {
            info!("No issues to transition");
        }

        let transitions = self
            .transition_issues(dry_run, issues)
            .instrument(info_span!("phase", name = %ReleasePhase::TransitionIssues))
            .await;
        let fix_versions = self
            .update_fix_versions(dry_run, version_name, issues)
            .instrument(info_span!("phase", name = %ReleasePhase::UpdateFixVersions))
            .await;

        JiraReport {
            transitions,
            fix_versions,
        }
    }

    async fn transition_issues(
        &self,
        dry_run: bool,
        issues: &[IssueKey],
    ) -> Option<TransitionSummary> {
        if dry_run {
            info!("Dry run, not transitioning tickets");
            return None;
        }
        info!("Transitioning ticket status of: {}", list_or_none(issues));

        let walker = TransitionWalker::new(Arc::clone(&self.tracker), self.settings.walk_mode);
        let summary = walker
            .transition_all(issues, self.settings.max_concurrency)
            .await;

        for (issue, reason) in &summary.failed {
            warn!("Could not transition {issue}: {reason}");
        }
        info!(
            advanced = summary.advanced.len(),
            already_released = summary.already_released.len(),
            failed = summary.failed.len(),
            "transition summary"
        );
        Some(summary)
    }

    async fn update_fix_versions(
        &self,
        dry_run: bool,
        version_name: &str,
        issues: &[IssueKey],
    ) -> FixVersionReport {
        if dry_run {
            info!("Dry run, not setting release version of tickets");
            return FixVersionReport::Skipped;
        }
        if issues.is_empty() {
            info!("No tickets to set the release version on");
            return FixVersionReport::Skipped;
        }
        info!("Setting release version of: {}", list_or_none(issues));

        let resolved =
            resolve_release_version(self.tracker.as_ref(), &self.settings.project, version_name)
                .await;
        let (version, created) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Got error while trying to update release version of tickets: {e}");
                return FixVersionReport::Unresolved {
                    reason: e.to_string(),
                };
            }
        };

        let (updated, failed) = assign_fix_versions(self.tracker.as_ref(), &version, issues).await;
        FixVersionReport::Applied {
            version,
            created,
            updated,
            failed,
        }
    }
}

fn list_or_none(issues: &[IssueKey]) -> String {
    if issues.is_empty() {
        "found no tickets".to_string()
    } else {
        issues
            .iter()
            .map(IssueKey::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Full release
// ---------------------------------------------------------------------------

/// Settings for a full release run.
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    pub dry_run: bool,
    /// Owner of every repository named in the lockfile.
    pub owner: OwnerName,
    /// `owner/repo` of the repository the action runs in, for logging.
    pub current_repository: String,
    /// Path of the lockfile inside the checkout.
    pub lockfile_path: String,
}

/// Everything a release run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub version: TagName,
    pub dry_run: bool,
    pub issues: Vec<IssueKey>,
    /// Repositories tagged through the host (empty on dry run).
    pub tagged: Vec<RepositoryName>,
    pub jira: JiraReport,
}

/// Drives a release run over the three ports.
pub struct ReleaseOrchestrator {
    local: Arc<dyn LocalRepository>,
    host: Arc<dyn RepositoryHost>,
    jira: JiraRelease,
    settings: ReleaseSettings,
}

impl ReleaseOrchestrator {
    pub fn new(
        local: Arc<dyn LocalRepository>,
        host: Arc<dyn RepositoryHost>,
        jira: JiraRelease,
        settings: ReleaseSettings,
    ) -> Self {
        Self {
            local,
            host,
            jira,
            settings,
        }
    }

    pub async fn run(
        &self,
        lockfile: &Lockfile,
        manifest: &RepositoriesManifest,
    ) -> Result<ReleaseReport, ReleaseError> {
        let issues = self
            .compute_issues(lockfile, manifest)
            .instrument(info_span!("phase", name = %ReleasePhase::ComputeIssues))
            .await?;

        self.tag_current_repo(&lockfile.version)
            .instrument(info_span!("phase", name = %ReleasePhase::TagCurrentRepo))
            .await?;
        let tagged = self
            .tag_sub_repos(lockfile)
            .instrument(info_span!("phase", name = %ReleasePhase::TagSubRepos))
            .await?;

        let jira = self
            .jira
            .run(self.settings.dry_run, lockfile.release_version_name(), &issues)
            .await;

        info!(phase = %ReleasePhase::Done, version = %lockfile.version, "release finished");
        Ok(ReleaseReport {
            version: lockfile.version.clone(),
            dry_run: self.settings.dry_run,
            issues,
            tagged,
            jira,
        })
    }

    async fn compute_issues(
        &self,
        lockfile: &Lockfile,
        manifest: &RepositoriesManifest,
    ) -> Result<Vec<IssueKey>, ReleaseError> {
        let sources = ChangelogSources {
            local: self.local.as_ref(),
            host: self.host.as_ref(),
            owner: &self.settings.owner,
            lockfile_path: &self.settings.lockfile_path,
        };
        let changelog = collect_changelog(&sources, lockfile, manifest).await?;
        let issues = issue_work_set(&changelog);
        info!("Issues in this release: {}", list_or_none(&issues));
        Ok(issues)
    }

    async fn tag_current_repo(&self, tag: &TagName) -> Result<(), ReleaseError> {
        let repository = &self.settings.current_repository;
        if self.settings.dry_run {
            info!("Dry run, not tagging {repository}");
            return Ok(());
        }

        let tagged = match self.local.tag(tag).await {
            Ok(()) => self.local.push_tags().await,
            Err(e) => Err(e),
        };
        tagged.map_err(|source| ReleaseError::TagCurrentRepo {
            repository: repository.clone(),
            tag: tag.clone(),
            source,
        })?;
        info!("Pushed tag {tag} to {repository}");
        Ok(())
    }

    /// Tags every lockfile repository, attempting all of them before
    /// reporting failures together.
    async fn tag_sub_repos(&self, lockfile: &Lockfile) -> Result<Vec<RepositoryName>, ReleaseError> {
        let mut tagged = Vec::new();
        let mut failures = Vec::new();

        for (repository, sha) in &lockfile.repositories {
            if self.settings.dry_run {
                info!("Dry run, not tagging {}/{repository}", self.settings.owner);
                continue;
            }
            let request = TagRequest {
                owner: self.settings.owner.clone(),
                repo: repository.clone(),
                tag: lockfile.version.clone(),
                sha: sha.clone(),
            };
            match self.host.create_lightweight_tag(&request).await {
                Ok(()) => tagged.push(repository.clone()),
                Err(error) => {
                    warn!("Could not tag {repository}: {error}");
                    failures.push(TagFailure {
                        repository: repository.clone(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(tagged)
        } else {
            Err(ReleaseError::Tagging {
                total: lockfile.repositories.len(),
                failures,
            })
        }
    }
}
