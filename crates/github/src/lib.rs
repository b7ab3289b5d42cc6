//! GitHub repository host infrastructure adapter.
//!
//! Implements [`domain::RepositoryHost`] over the GitHub REST API: lightweight
//! tag creation and commit comparison between two SHAs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (authentication, pagination, API versioning) are
//! handled here; the orchestration layer never sees them.

pub mod client;
pub mod context;
pub mod models;

pub use client::{GitHubClient, GitHubConfig, DEFAULT_API_URL};
pub use context::RepositoryContext;
