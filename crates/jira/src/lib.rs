//! Jira issue tracker infrastructure adapter.
//!
//! Implements the [`domain::IssueTracker`] trait over the Jira Cloud REST
//! API v3 with basic (email + API token) authentication.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting, and response
//! parsing live here. The orchestration layer sees only
//! [`domain::IssueTracker`].

pub mod client;
pub mod models;

pub use client::{JiraClient, JiraConfig};
