//! Release domain for the CI actions.
//!
//! This crate contains every domain concept, newtype identifier, value type,
//! and port trait used by the release actions. Infrastructure crates implement
//! the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueKey`, `CommitSha`, `TagName`, etc.) |
//! | [`types`] | Value types (`Lockfile`, `ReleaseVersion`, `ChangelogEntry`, etc.) |
//! | [`workflow`] | The issue status workflow table |
//! | [`changelog`] | Issue-key extraction and the release work set |
//! | [`ports`] | `IssueTracker`, `RepositoryHost`, `LocalRepository` |
//! | [`errors`] | Domain and port error types |

pub mod changelog;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;
pub mod workflow;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use changelog::{extract_issue_keys, issue_work_set};
pub use errors::{DomainError, GitError, HostError, TrackerError};
pub use identifiers::{
    CommitSha, IssueKey, OwnerName, ProjectId, ReleaseRunId, RepositoryName, TagName,
    TransitionId, VersionId,
};
pub use ports::{IssueTracker, LocalRepository, RepositoryHost};
pub use types::{
    ChangelogEntry, Lockfile, NewVersion, ReleaseVersion, RepositoriesManifest, TagRequest,
};
pub use workflow::{Edge, IssueStatus};
