//! Release orchestration for the CI actions.
//!
//! Computes the issues of a release from the lockfile changelog, tags the
//! current repository and every sub-repository, walks the issues through the
//! Jira workflow, and assigns the release fix version.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Talks to the outside world only through the ports in
//! [`domain`]; the CLI wires concrete adapters in.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`changelog`] | Commit collection between the previous and current lockfile |
//! | [`walker`] | `TransitionWalker` and batch transition summaries |
//! | [`fix_version`] | Release-version resolution and fix-version assignment |
//! | [`orchestrator`] | `ReleaseOrchestrator`, `JiraRelease`, phases and reports |

pub mod changelog;
pub mod fix_version;
pub mod orchestrator;
pub mod walker;

#[cfg(test)]
mod testing;

pub use changelog::{collect_changelog, ChangelogError, ChangelogSources};
pub use fix_version::{
    assign_fix_versions, resolve_release_version, FixVersionError, FixVersionReport,
};
pub use orchestrator::{
    JiraRelease, JiraReport, JiraSettings, ReleaseError, ReleaseOrchestrator, ReleasePhase,
    ReleaseReport, ReleaseSettings, TagFailure, DEFAULT_MAX_CONCURRENCY,
};
pub use walker::{
    TransitionError, TransitionOutcome, TransitionSummary, TransitionWalker, WalkMode,
};
