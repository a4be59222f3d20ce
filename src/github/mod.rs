pub mod fixture;
pub mod types;

pub use types::{PrUrl, RepoRef, RepoSlug};

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GitHubConfig;
use types::{
    ApiComment, ApiCommit, ApiFile, ApiIssue, ApiLabel, ApiPullRequest, ApiRepository, ApiReview,
};

const PER_PAGE: usize = 100;
const USER_AGENT: &str = "pr-ttm";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid PR URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid repository identifier: {0}")]
    InvalidRepo(String),

    #[error("GitHub token not found in config or environment")]
    MissingToken,

    #[error("Failed to load fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Parse a GitHub PR URL into its component parts.
/// Expected format: https://github.com/{owner}/{repo}/pull/{number}
pub fn parse_pr_url(url: &str) -> Result<PrUrl, GitHubError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| GitHubError::InvalidUrl(url.to_string()))?;

    if parsed.host_str() != Some("github.com") {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(|| GitHubError::InvalidUrl(url.to_string()))?
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() != 4 || segments[2] != "pull" {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    let pr_number = segments[3]
        .parse::<u64>()
        .map_err(|_| GitHubError::InvalidUrl(url.to_string()))?;

    Ok(PrUrl {
        repo: RepoSlug {
            owner: segments[0].to_string(),
            name: segments[1].to_string(),
        },
        pr_number,
    })
}

/// Parse a repository identifier: either a numeric repository id or `owner/name`.
pub fn parse_repo_ref(input: &str) -> Result<RepoRef, GitHubError> {
    if let Ok(id) = input.parse::<u64>() {
        return Ok(RepoRef::Id(id));
    }
    parse_slug(input).map(RepoRef::Slug)
}

fn parse_slug(input: &str) -> Result<RepoSlug, GitHubError> {
    match input.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(RepoSlug {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(GitHubError::InvalidRepo(input.to_string())),
    }
}

/// Read access to a pull request and its sub-resources, plus the one write
/// the tool performs (posting the prediction as a comment).
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Look up a repository by numeric id.
    async fn repository(&self, id: u64) -> Result<RepoSlug, GitHubError>;

    async fn pull_request(&self, repo: &RepoSlug, number: u64)
        -> Result<ApiPullRequest, GitHubError>;

    /// The issue entity backing the pull request.
    async fn issue(&self, repo: &RepoSlug, number: u64) -> Result<ApiIssue, GitHubError>;

    async fn labels(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiLabel>, GitHubError>;

    async fn reviews(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiReview>, GitHubError>;

    /// Conversation comments, not inline code-review comments.
    async fn issue_comments(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<ApiComment>, GitHubError>;

    async fn commits(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiCommit>, GitHubError>;

    async fn files(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiFile>, GitHubError>;

    async fn create_comment(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError>;
}

/// Turn any repository reference into a slug, hitting the API only for numeric ids.
pub async fn resolve_repo(api: &dyn HostingApi, repo: &RepoRef) -> Result<RepoSlug, GitHubError> {
    match repo {
        RepoRef::Slug(slug) => Ok(slug.clone()),
        RepoRef::Id(id) => api.repository(*id).await,
    }
}

/// REST v3 client authenticated with a bearer token.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig, token: &str) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        debug!(path, "GET");
        let value = self
            .request(Method::GET, path)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(value)
    }

    /// Follow `page=1,2,..` until a page comes back shorter than `PER_PAGE`.
    async fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        for page in 1usize.. {
            debug!(path, page, "GET page");
            let batch = self
                .request(Method::GET, path)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<T>>()
                .await?;
            let last = batch.len() < PER_PAGE;
            items.extend(batch);
            if last {
                break;
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    #[instrument(skip(self))]
    async fn repository(&self, id: u64) -> Result<RepoSlug, GitHubError> {
        let repo: ApiRepository = self.get_json(&format!("/repositories/{id}")).await?;
        parse_slug(&repo.full_name)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn pull_request(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<ApiPullRequest, GitHubError> {
        self.get_json(&format!("/repos/{}/{}/pulls/{number}", repo.owner, repo.name))
            .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn issue(&self, repo: &RepoSlug, number: u64) -> Result<ApiIssue, GitHubError> {
        self.get_json(&format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name))
            .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn labels(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiLabel>, GitHubError> {
        self.get_paginated(&format!(
            "/repos/{}/{}/issues/{number}/labels",
            repo.owner, repo.name
        ))
        .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn reviews(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiReview>, GitHubError> {
        self.get_paginated(&format!(
            "/repos/{}/{}/pulls/{number}/reviews",
            repo.owner, repo.name
        ))
        .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn issue_comments(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<ApiComment>, GitHubError> {
        self.get_paginated(&format!(
            "/repos/{}/{}/issues/{number}/comments",
            repo.owner, repo.name
        ))
        .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn commits(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiCommit>, GitHubError> {
        self.get_paginated(&format!(
            "/repos/{}/{}/pulls/{number}/commits",
            repo.owner, repo.name
        ))
        .await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn files(&self, repo: &RepoSlug, number: u64) -> Result<Vec<ApiFile>, GitHubError> {
        self.get_paginated(&format!(
            "/repos/{}/{}/pulls/{number}/files",
            repo.owner, repo.name
        ))
        .await
    }

    #[instrument(skip(self, repo, body), fields(repo = %repo))]
    async fn create_comment(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        self.request(
            Method::POST,
            &format!("/repos/{}/{}/issues/{number}/comments", repo.owner, repo.name),
        )
        .json(&serde_json::json!({ "body": body }))
        .send()
        .await?
        .error_for_status()?;
        debug!("posted comment");
        Ok(())
    }
}
