//! HTTP client for Jira Cloud.

use async_trait::async_trait;
use domain::{
    IssueKey, IssueTracker, NewVersion, ProjectId, ReleaseVersion, TrackerError, TransitionId,
    VersionId,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    create_version_body, fix_version_body, IssueResponse, TransitionRef, TransitionRequest,
    VersionResponse,
};

const API_PREFIX: &str = "/rest/api/3";

/// Connection settings for a Jira Cloud site.
#[derive(Clone)]
pub struct JiraConfig {
    /// Site host, with or without scheme (e.g. `example.atlassian.net`).
    pub host: String,
    /// Account email used for basic authentication.
    pub username: String,
    pub api_token: String,
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// [`IssueTracker`] backed by the Jira REST API v3.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    api_base: Url,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ci-actions/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Transport {
                endpoint: "client".to_string(),
                message: e.to_string(),
            })?;
        let api_base = Url::parse(&format!("{}{API_PREFIX}", base_url(&config.host)))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| TrackerError::Transport {
                endpoint: "client".to_string(),
                message: format!("invalid Jira host {:?}", config.host),
            })?;
        Ok(Self {
            http,
            api_base,
            config,
        })
    }

    /// API URL for `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // `new` rejects bases that cannot carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http
            .request(method, self.url(segments))
            .basic_auth(&self.config.username, Some(&self.config.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, TrackerError> {
        debug!(endpoint, "jira request");
        let response = request.send().await.map_err(|e| TrackerError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, TrackerError> {
        self.send(endpoint, request)
            .await?
            .json()
            .await
            .map_err(|e| TrackerError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

/// Normalises a configured host into a base URL without trailing slash.
fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn decode_version(endpoint: &str, version: VersionResponse) -> Result<ReleaseVersion, TrackerError> {
    version.into_domain().ok_or_else(|| TrackerError::Decode {
        endpoint: endpoint.to_string(),
        message: "version without id".to_string(),
    })
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn get_issue_status(&self, issue: &IssueKey) -> Result<String, TrackerError> {
        let endpoint = format!("GET /issue/{issue}");
        let request = self
            .request(Method::GET, &["issue", issue.as_str()])
            .query(&[("fields", "status"), ("expand", "transitions")]);
        let issue: IssueResponse = self.json(&endpoint, request).await?;
        Ok(issue.fields.status.name)
    }

    async fn do_transition(
        &self,
        issue: &IssueKey,
        transition: TransitionId,
    ) -> Result<(), TrackerError> {
        let endpoint = format!("POST /issue/{issue}/transitions");
        let request = self
            .request(Method::POST, &["issue", issue.as_str(), "transitions"])
            .json(&TransitionRequest {
                transition: TransitionRef {
                    id: transition.as_str(),
                },
            });
        self.send(&endpoint, request).await?;
        Ok(())
    }

    async fn get_project_versions(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<ReleaseVersion>, TrackerError> {
        let endpoint = format!("GET /project/{project}/versions");
        let request = self.request(Method::GET, &["project", project.as_str(), "versions"]);
        let versions: Vec<VersionResponse> = self.json(&endpoint, request).await?;
        versions
            .into_iter()
            .map(|v| decode_version(&endpoint, v))
            .collect()
    }

    async fn create_version(&self, version: &NewVersion) -> Result<ReleaseVersion, TrackerError> {
        let endpoint = "POST /version";
        let request = self
            .request(Method::POST, &["version"])
            .json(&create_version_body(version));
        let created: VersionResponse = self.json(endpoint, request).await?;
        decode_version(endpoint, created)
    }

    async fn set_fix_version(
        &self,
        issue: &IssueKey,
        version: &VersionId,
    ) -> Result<(), TrackerError> {
        let endpoint = format!("PUT /issue/{issue}");
        let request = self
            .request(Method::PUT, &["issue", issue.as_str()])
            .json(&fix_version_body(version));
        self.send(&endpoint, request).await?;
        Ok(())
    }
}
