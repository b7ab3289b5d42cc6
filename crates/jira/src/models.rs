//! Jira REST v3 wire types.

use chrono::NaiveDate;
use domain::{NewVersion, ReleaseVersion, VersionId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `GET /issue/{key}` restricted to the status field.
#[derive(Debug, Deserialize)]
pub struct IssueResponse {
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    pub status: IssueStatusField,
}

#[derive(Debug, Deserialize)]
pub struct IssueStatusField {
    pub name: String,
}

/// `POST /issue/{key}/transitions` body.
#[derive(Debug, Serialize)]
pub struct TransitionRequest<'a> {
    pub transition: TransitionRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct TransitionRef<'a> {
    pub id: &'a str,
}

/// A project version as returned by `GET /project/{p}/versions` and
/// `POST /version`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl VersionResponse {
    /// Converts to the domain type. Unparsable release dates are dropped.
    pub fn into_domain(self) -> Option<ReleaseVersion> {
        Some(ReleaseVersion {
            id: VersionId::new(self.id)?,
            name: self.name,
            release_date: self
                .release_date
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        })
    }
}

/// `POST /version` body.
///
/// Jira accepts either a numeric `projectId` or a project key under
/// `project`; numeric ids are sent as numbers.
pub fn create_version_body(version: &NewVersion) -> Value {
    let mut body = json!({
        "name": version.name,
        "releaseDate": version.release_date.format("%Y-%m-%d").to_string(),
    });
    let project = version.project.as_str();
    match project.parse::<u64>() {
        Ok(id) => body["projectId"] = json!(id),
        Err(_) => body["project"] = json!(project),
    }
    body
}

/// `PUT /issue/{key}` body replacing the fix versions.
pub fn fix_version_body(version: &VersionId) -> Value {
    json!({
        "fields": {
            "fixVersions": [{ "id": version.as_str() }]
        }
    })
}
