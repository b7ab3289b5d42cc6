//! Error types shared across the release domain.
//!
//! [`DomainError`] covers invalid domain input (unknown workflow statuses,
//! malformed lockfiles). The port errors ([`TrackerError`], [`HostError`],
//! [`GitError`]) are produced by infrastructure adapters so the orchestration
//! layer can report failures without knowing the transport behind them.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Invalid domain input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A Jira status label outside the release workflow.
    #[error("Unknown status {status}")]
    UnknownStatus { status: String },

    /// A lockfile or manifest could not be parsed.
    #[error("Invalid {document}: {message}")]
    InvalidDocument {
        document: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failure reported by an [`crate::IssueTracker`] implementation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker answered with a non-success status.
    #[error("issue tracker request {endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("issue tracker request {endpoint} could not be sent: {message}")]
    Transport { endpoint: String, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected issue tracker response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Failure reported by a [`crate::RepositoryHost`] implementation.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("repository host request {endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("repository host request {endpoint} could not be sent: {message}")]
    Transport { endpoint: String, message: String },

    #[error("unexpected repository host response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Failure reported by a [`crate::LocalRepository`] implementation.
#[derive(Debug, Error)]
#[error("git {operation} failed: {message}")]
pub struct GitError {
    pub operation: String,
    pub message: String,
}

impl GitError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
