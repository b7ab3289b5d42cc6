//! In-memory port implementations for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use domain::{
    CommitSha, GitError, HostError, IssueKey, IssueStatus, IssueTracker, LocalRepository,
    NewVersion, OwnerName, ProjectId, ReleaseVersion, RepositoryHost, RepositoryName, TagName,
    TagRequest, TrackerError, TransitionId, VersionId,
};

fn tracker_error(endpoint: &str) -> TrackerError {
    TrackerError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

/// Issue tracker keeping statuses and versions in memory.
#[derive(Default)]
pub struct FakeTracker {
    statuses: Mutex<HashMap<String, String>>,
    transitions: Mutex<Vec<(String, &'static str)>>,
    failing_transitions: Mutex<HashSet<String>>,
    versions: Mutex<Vec<ReleaseVersion>>,
    created: Mutex<Vec<NewVersion>>,
    fix_versions: Mutex<Vec<(String, String)>>,
    failing_fix_versions: Mutex<HashSet<String>>,
    fail_version_lookup: Mutex<bool>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTracker {
    pub fn with_status(issue: &str, status: &str) -> Self {
        let tracker = Self::default();
        tracker.set_status(issue, status);
        tracker
    }

    pub fn set_status(&self, issue: &str, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(issue.to_string(), status.to_string());
    }

    pub fn status_of(&self, issue: &str) -> String {
        self.statuses.lock().unwrap()[issue].clone()
    }

    pub fn fail_transitions_for(&self, issue: &str) {
        self.failing_transitions
            .lock()
            .unwrap()
            .insert(issue.to_string());
    }

    pub fn fail_fix_version_for(&self, issue: &str) {
        self.failing_fix_versions
            .lock()
            .unwrap()
            .insert(issue.to_string());
    }

    pub fn fail_version_lookup(&self) {
        *self.fail_version_lookup.lock().unwrap() = true;
    }

    pub fn add_version(&self, id: &str, name: &str) {
        self.versions.lock().unwrap().push(ReleaseVersion {
            id: VersionId::new(id).unwrap(),
            name: name.to_string(),
            release_date: None,
        });
    }

    pub fn transition_calls(&self) -> Vec<(String, &'static str)> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn created_versions(&self) -> Vec<NewVersion> {
        self.created.lock().unwrap().clone()
    }

    /// `(issue, version id)` pairs in call order.
    pub fn fix_version_calls(&self) -> Vec<(String, String)> {
        self.fix_versions.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn get_issue_status(&self, issue: &IssueKey) -> Result<String, TrackerError> {
        self.enter().await;
        self.statuses
            .lock()
            .unwrap()
            .get(issue.as_str())
            .cloned()
            .ok_or_else(|| TrackerError::Status {
                endpoint: format!("GET /issue/{issue}"),
                status: 404,
                body: "Issue does not exist".to_string(),
            })
    }

    async fn do_transition(
        &self,
        issue: &IssueKey,
        transition: TransitionId,
    ) -> Result<(), TrackerError> {
        self.enter().await;
        if self.failing_transitions.lock().unwrap().contains(issue.as_str()) {
            return Err(tracker_error("POST /transitions"));
        }
        self.transitions
            .lock()
            .unwrap()
            .push((issue.to_string(), transition.as_str()));

        let mut statuses = self.statuses.lock().unwrap();
        let current: IssueStatus = statuses[issue.as_str()].parse().unwrap();
        let edge = current.next().unwrap();
        assert_eq!(edge.transition, transition, "transition not valid from {current}");
        statuses.insert(issue.to_string(), edge.target.label().to_string());
        Ok(())
    }

    async fn get_project_versions(
        &self,
        _project: &ProjectId,
    ) -> Result<Vec<ReleaseVersion>, TrackerError> {
        if *self.fail_version_lookup.lock().unwrap() {
            return Err(tracker_error("GET /versions"));
        }
        Ok(self.versions.lock().unwrap().clone())
    }

    async fn create_version(&self, version: &NewVersion) -> Result<ReleaseVersion, TrackerError> {
        self.created.lock().unwrap().push(version.clone());
        let mut versions = self.versions.lock().unwrap();
        let created = ReleaseVersion {
            id: VersionId::new(format!("new-{}", versions.len() + 1)).unwrap(),
            name: version.name.clone(),
            release_date: Some(version.release_date),
        };
        versions.push(created.clone());
        Ok(created)
    }

    async fn set_fix_version(
        &self,
        issue: &IssueKey,
        version: &VersionId,
    ) -> Result<(), TrackerError> {
        if self.failing_fix_versions.lock().unwrap().contains(issue.as_str()) {
            return Err(tracker_error("PUT /issue"));
        }
        self.fix_versions
            .lock()
            .unwrap()
            .push((issue.to_string(), version.to_string()));
        Ok(())
    }
}

/// Repository host recording tags and serving canned commit messages.
#[derive(Default)]
pub struct FakeHost {
    commits: Mutex<HashMap<String, Vec<String>>>,
    tags: Mutex<Vec<TagRequest>>,
    compares: Mutex<Vec<(String, String, String)>>,
    failing_tags: Mutex<HashSet<String>>,
    fail_compare: Mutex<bool>,
}

impl FakeHost {
    pub fn set_commits(&self, repo: &str, messages: &[&str]) {
        self.commits.lock().unwrap().insert(
            repo.to_string(),
            messages.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub fn fail_tag_for(&self, repo: &str) {
        self.failing_tags.lock().unwrap().insert(repo.to_string());
    }

    pub fn fail_compare(&self) {
        *self.fail_compare.lock().unwrap() = true;
    }

    pub fn tags(&self) -> Vec<TagRequest> {
        self.tags.lock().unwrap().clone()
    }

    /// `(repo, base, head)` triples in call order.
    pub fn compares(&self) -> Vec<(String, String, String)> {
        self.compares.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn create_lightweight_tag(&self, request: &TagRequest) -> Result<(), HostError> {
        if self.failing_tags.lock().unwrap().contains(request.repo.as_str()) {
            return Err(HostError::Status {
                endpoint: format!("POST /repos/{}/{}/git/refs", request.owner, request.repo),
                status: 422,
                body: "Reference already exists".to_string(),
            });
        }
        self.tags.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn compare_commits(
        &self,
        _owner: &OwnerName,
        repo: &RepositoryName,
        base: &CommitSha,
        head: &CommitSha,
    ) -> Result<Vec<String>, HostError> {
        if *self.fail_compare.lock().unwrap() {
            return Err(HostError::Transport {
                endpoint: "compare".to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.compares
            .lock()
            .unwrap()
            .push((repo.to_string(), base.to_string(), head.to_string()));
        Ok(self
            .commits
            .lock()
            .unwrap()
            .get(repo.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

/// Local checkout with a single previous tag and its files.
pub struct FakeGit {
    latest: Option<String>,
    files: Mutex<HashMap<String, String>>,
    tags: Mutex<Vec<String>>,
    pushes: AtomicUsize,
}

impl FakeGit {
    pub fn tagged(latest: &str) -> Self {
        Self {
            latest: Some(latest.to_string()),
            files: Mutex::default(),
            tags: Mutex::default(),
            pushes: AtomicUsize::new(0),
        }
    }

    pub fn untagged() -> Self {
        Self {
            latest: None,
            ..Self::tagged("")
        }
    }

    /// Content of `path` at the latest tag.
    pub fn set_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalRepository for FakeGit {
    async fn latest_version(&self) -> Result<TagName, GitError> {
        self.latest
            .as_deref()
            .and_then(TagName::new)
            .ok_or_else(|| GitError::new("describe", "fatal: No names found"))
    }

    async fn tag(&self, tag: &TagName) -> Result<(), GitError> {
        self.tags.lock().unwrap().push(tag.to_string());
        Ok(())
    }

    async fn push_tags(&self) -> Result<(), GitError> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn read_file_at(&self, revision: &TagName, path: &str) -> Result<String, GitError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| GitError::new("show", format!("path '{path}' does not exist in '{revision}'")))
    }
}
