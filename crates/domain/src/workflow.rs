//! The Jira issue workflow walked during a release.
//!
//! Every status except [`IssueStatus::Released`] has exactly one outgoing
//! edge. The table is an exhaustive `match`, so a new status cannot be added
//! without deciding where it leads.

use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;
use crate::TransitionId;

/// A Jira issue status known to the release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueStatus {
    NoActionNeeded,
    New,
    Accepted,
    InProgress,
    InReview,
    Done,
    /// Terminal.
    Released,
}

/// One outgoing workflow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub transition: TransitionId,
    pub target: IssueStatus,
}

const fn edge(id: &'static str, target: IssueStatus) -> Edge {
    Edge {
        transition: TransitionId::from_static(id),
        target,
    }
}

impl IssueStatus {
    /// Every status, in workflow order.
    pub const ALL: [IssueStatus; 7] = [
        IssueStatus::NoActionNeeded,
        IssueStatus::New,
        IssueStatus::Accepted,
        IssueStatus::InProgress,
        IssueStatus::InReview,
        IssueStatus::Done,
        IssueStatus::Released,
    ];

    /// The status label as Jira displays it.
    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::NoActionNeeded => "No action needed",
            IssueStatus::New => "New",
            IssueStatus::Accepted => "Accepted",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::InReview => "In review",
            IssueStatus::Done => "Done",
            IssueStatus::Released => "Released",
        }
    }

    /// The single edge leaving this status, `None` for the terminal status.
    pub fn next(self) -> Option<Edge> {
        match self {
            IssueStatus::Done => Some(edge("211", IssueStatus::Released)),
            IssueStatus::New => Some(edge("171", IssueStatus::Accepted)),
            IssueStatus::Accepted => Some(edge("71", IssueStatus::InProgress)),
            IssueStatus::InProgress => Some(edge("91", IssueStatus::Done)),
            IssueStatus::NoActionNeeded => Some(edge("201", IssueStatus::New)),
            IssueStatus::InReview => Some(edge("91", IssueStatus::Done)),
            IssueStatus::Released => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IssueStatus {
    type Err = DomainError;

    /// Labels match exactly; Jira's casing is not normalised.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| DomainError::UnknownStatus {
                status: s.to_string(),
            })
    }
}
