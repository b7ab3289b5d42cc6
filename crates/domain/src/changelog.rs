//! Issue-key extraction and the release work set.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::{ChangelogEntry, IssueKey};

// Hard-coded pattern, verified by the tests below.
static ISSUE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"\b[A-Z][A-Z0-9]+-[0-9]+\b") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

/// Returns every Jira issue key mentioned in `text`, in order of appearance,
/// without duplicates.
pub fn extract_issue_keys(text: &str) -> Vec<IssueKey> {
    let mut seen = HashSet::new();
    ISSUE_KEY_RE
        .find_iter(text)
        .filter(|m| seen.insert(m.as_str()))
        .filter_map(|m| IssueKey::new(m.as_str()))
        .collect()
}

/// Builds the set of issues implicated by a release: the union of every
/// entry's linked issues, first-seen order, de-duplicated.
pub fn issue_work_set<'a>(entries: impl IntoIterator<Item = &'a ChangelogEntry>) -> Vec<IssueKey> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for key in entries.into_iter().flat_map(|e| e.issues.iter()) {
        if seen.insert(key.clone()) {
            keys.push(key.clone());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RepositoryName;

    fn keys(values: &[IssueKey]) -> Vec<&str> {
        values.iter().map(IssueKey::as_str).collect()
    }

    #[test]
    fn extracts_keys_in_order() {
        let found = extract_issue_keys("PROJ-12: fix crash (see also EXVT-7, PROJ-12)");
        assert_eq!(keys(&found), ["PROJ-12", "EXVT-7"]);
    }

    #[test]
    fn ignores_lowercase_and_embedded_tokens() {
        let found = extract_issue_keys("proj-1 xPROJ-2 utf-8 A-1 PR2-9");
        assert_eq!(keys(&found), ["PR2-9"]);
    }

    #[test]
    fn work_set_deduplicates_across_repositories() {
        let a = RepositoryName::new("repoA").unwrap();
        let b = RepositoryName::new("repoB").unwrap();
        let entries = [
            ChangelogEntry::from_commit(a.clone(), "PROJ-1 first"),
            ChangelogEntry::from_commit(b, "PROJ-2 and PROJ-1"),
            ChangelogEntry::from_commit(a, "chore: no ticket"),
        ];

        assert_eq!(keys(&issue_work_set(&entries)), ["PROJ-1", "PROJ-2"]);
    }
}
