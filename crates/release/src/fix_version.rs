//! Release-version lookup and fix-version assignment.

use domain::{IssueKey, IssueTracker, NewVersion, ProjectId, ReleaseVersion, TrackerError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FixVersionError {
    #[error("Could not connect with project versions: {0}")]
    Lookup(#[source] TrackerError),

    #[error("Could not create new release version {name} in project {project}: {source}")]
    Create {
        name: String,
        project: ProjectId,
        #[source]
        source: TrackerError,
    },
}

/// Returns the project version named `name`, creating it (released today)
/// when it does not exist. `created` reports which happened.
///
/// Not atomic: two concurrent runs may both create the version.
pub async fn resolve_release_version(
    tracker: &dyn IssueTracker,
    project: &ProjectId,
    name: &str,
) -> Result<(ReleaseVersion, bool), FixVersionError> {
    let versions = tracker
        .get_project_versions(project)
        .await
        .map_err(FixVersionError::Lookup)?;
    if let Some(existing) = versions.into_iter().find(|v| v.name == name) {
        info!(version = %existing.name, id = %existing.id, "using existing release version");
        return Ok((existing, false));
    }

    let request = NewVersion::released_today(name, project.clone());
    let created = tracker
        .create_version(&request)
        .await
        .map_err(|source| FixVersionError::Create {
            name: name.to_string(),
            project: project.clone(),
            source,
        })?;
    info!(version = %created.name, id = %created.id, "created release version");
    Ok((created, true))
}

/// Result of the fix-version phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixVersionReport {
    /// Phase not run: dry run, or no issues to update.
    Skipped,
    /// The release version could not be resolved; no issue was touched.
    Unresolved { reason: String },
    Applied {
        version: ReleaseVersion,
        created: bool,
        updated: Vec<IssueKey>,
        failed: Vec<(IssueKey, String)>,
    },
}

/// Sets `version` as the fix version of every issue, one at a time.
/// Failures are logged and recorded; the loop always finishes.
pub async fn assign_fix_versions(
    tracker: &dyn IssueTracker,
    version: &ReleaseVersion,
    issues: &[IssueKey],
) -> (Vec<IssueKey>, Vec<(IssueKey, String)>) {
    let mut updated = Vec::new();
    let mut failed = Vec::new();
    for issue in issues {
        match tracker.set_fix_version(issue, &version.id).await {
            Ok(()) => {
                info!("Set fix version of {issue} to {}", version.name);
                updated.push(issue.clone());
            }
            Err(e) => {
                warn!("failed to set fixVersion for issue {issue} to {}: {e}", version.name);
                failed.push((issue.clone(), e.to_string()));
            }
        }
    }
    (updated, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTracker;
    use chrono::Utc;

    fn project() -> ProjectId {
        ProjectId::new("10042").unwrap()
    }

    #[tokio::test]
    async fn existing_version_is_reused() {
        let tracker = FakeTracker::default();
        tracker.add_version("7", "1.2.2");
        tracker.add_version("8", "1.2.3");

        let (version, created) = resolve_release_version(&tracker, &project(), "1.2.3")
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(version.id.as_str(), "8");
        assert!(tracker.created_versions().is_empty());
    }

    #[tokio::test]
    async fn missing_version_is_created_with_todays_date() {
        let tracker = FakeTracker::default();
        tracker.add_version("7", "1.2.2");

        let (version, created) = resolve_release_version(&tracker, &project(), "1.2.3")
            .await
            .unwrap();

        assert!(created);
        assert_eq!(version.name, "1.2.3");
        let requests = tracker.created_versions();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "1.2.3");
        assert_eq!(requests[0].project, project());
        assert_eq!(requests[0].release_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn lookup_failure_is_reported() {
        let tracker = FakeTracker::default();
        tracker.fail_version_lookup();

        let err = resolve_release_version(&tracker, &project(), "1.2.3")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not connect with project versions"));
        assert!(tracker.created_versions().is_empty());
    }

    #[tokio::test]
    async fn assignment_continues_past_failures() {
        let tracker = FakeTracker::default();
        tracker.add_version("8", "1.2.3");
        tracker.fail_fix_version_for("PROJ-2");
        let (version, _) = resolve_release_version(&tracker, &project(), "1.2.3")
            .await
            .unwrap();
        let issues = ["PROJ-1", "PROJ-2", "PROJ-3"].map(|k| IssueKey::new(k).unwrap());

        let (updated, failed) = assign_fix_versions(&tracker, &version, &issues).await;

        let updated: Vec<_> = updated.iter().map(IssueKey::as_str).collect();
        assert_eq!(updated, ["PROJ-1", "PROJ-3"]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0.as_str(), "PROJ-2");
        assert_eq!(
            tracker.fix_version_calls(),
            [
                ("PROJ-1".to_string(), "8".to_string()),
                ("PROJ-3".to_string(), "8".to_string()),
            ]
        );
    }
}
