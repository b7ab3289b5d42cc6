//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`TagName`] with a [`CommitSha`] even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// Deserialisation goes through `new` so empty values are rejected.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| format!("{} must not be empty", stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single action invocation.
///
/// Generated fresh for every CLI invocation; attached to the root span so all
/// activity from a single release run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseRunId(Uuid);

impl ReleaseRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ReleaseRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (Jira / Git names)
// ---------------------------------------------------------------------------

string_id! {
    /// A Jira issue id or key (e.g. `"PROJ-42"`).
    ///
    /// Opaque: nothing beyond string equality is assumed.
    IssueKey
}

string_id! {
    /// A repository name without its owner (e.g. `"proximity"`).
    RepositoryName
}

string_id! {
    /// A GitHub account or organisation that owns repositories.
    OwnerName
}

string_id! {
    /// A Git commit SHA.
    CommitSha
}

string_id! {
    /// A Git tag name (e.g. `"v1.2.3"`).
    TagName
}

string_id! {
    /// A Jira project id or key, as configured for release versions.
    ProjectId
}

string_id! {
    /// The Jira-assigned id of a project version.
    VersionId
}

/// A Jira workflow transition id.
///
/// Only ever produced by the fixed workflow table, so it wraps a static string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionId(&'static str);

impl TransitionId {
    pub(crate) const fn from_static(id: &'static str) -> Self {
        Self(id)
    }

    /// Returns the transition id as a string slice.
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(IssueKey::new("").is_none());
        assert_eq!(IssueKey::new("PROJ-1").map(|k| k.to_string()), Some("PROJ-1".into()));
    }

    #[test]
    fn deserialising_an_empty_identifier_fails() {
        let err = serde_json::from_str::<CommitSha>("\"\"").unwrap_err();
        assert!(err.to_string().contains("CommitSha must not be empty"));

        let sha: CommitSha = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(sha.as_str(), "abc123");
    }
}
