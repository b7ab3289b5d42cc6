//! HTTP client for the GitHub REST API.

use async_trait::async_trait;
use domain::{CommitSha, HostError, OwnerName, RepositoryHost, RepositoryName, TagRequest};
use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, info};

use crate::models::{CompareResponse, CreateRefRequest};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// Connection settings for the GitHub API.
#[derive(Clone)]
pub struct GitHubConfig {
    /// API root, `GITHUB_API_URL` on GitHub Enterprise.
    pub api_url: String,
    pub token: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// [`RepositoryHost`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, HostError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ci-actions/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostError::Transport {
                endpoint: "client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let root = self.config.api_url.trim_end_matches('/');
        self.http
            .request(method, format!("{root}{path}"))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, HostError> {
        debug!(endpoint, "github request");
        let response = request.send().await.map_err(|e| HostError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HostError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn create_lightweight_tag(&self, request: &TagRequest) -> Result<(), HostError> {
        let path = format!("/repos/{}/{}/git/refs", request.owner, request.repo);
        let endpoint = format!("POST {path}");
        let http = self.request(Method::POST, &path).json(&CreateRefRequest {
            reference: format!("refs/tags/{}", request.tag),
            sha: request.sha.to_string(),
        });
        self.send(&endpoint, http).await?;
        info!(
            repository = %format_args!("{}/{}", request.owner, request.repo),
            tag = %request.tag,
            sha = %request.sha,
            "created lightweight tag"
        );
        Ok(())
    }

    async fn compare_commits(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        base: &CommitSha,
        head: &CommitSha,
    ) -> Result<Vec<String>, HostError> {
        let path = format!("/repos/{owner}/{repo}/compare/{base}...{head}");
        let endpoint = format!("GET {path}");
        let mut messages = Vec::new();

        for page in 1.. {
            let http = self
                .request(Method::GET, &path)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let body: CompareResponse = self
                .send(&endpoint, http)
                .await?
                .json()
                .await
                .map_err(|e| HostError::Decode {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                })?;

            let fetched = body.commits.len();
            messages.extend(body.commits.into_iter().map(|c| c.commit.message));
            if fetched < PER_PAGE || messages.len() >= body.total_commits {
                break;
            }
        }

        Ok(messages)
    }
}
