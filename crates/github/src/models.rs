//! GitHub REST wire types.

use serde::{Deserialize, Serialize};

/// `POST /repos/{owner}/{repo}/git/refs` body.
#[derive(Debug, Serialize)]
pub struct CreateRefRequest {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
}

/// One page of `GET /repos/{owner}/{repo}/compare/{base}...{head}`.
#[derive(Debug, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub total_commits: usize,
    #[serde(default)]
    pub commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
pub struct CompareCommit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub message: String,
}
