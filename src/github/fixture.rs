use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use super::types::{
    ApiComment, ApiCommit, ApiFile, ApiIssue, ApiLabel, ApiPullRequest, ApiRepository, ApiReview,
};
use super::{parse_slug, GitHubError, HostingApi, RepoSlug};

const SAMPLE_PULL: &str = include_str!("../../tests/fixtures/sample_pull.json");

#[derive(Debug, Clone, Deserialize)]
struct FixtureData {
    repository: ApiRepository,
    pull: ApiPullRequest,
    issue: ApiIssue,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    reviews: Vec<ApiReview>,
    #[serde(default)]
    comments: Vec<ApiComment>,
    #[serde(default)]
    commits: Vec<ApiCommit>,
    #[serde(default)]
    files: Vec<ApiFile>,
}

/// Serves one canned pull request from JSON, whatever repository or number is asked for.
/// Comments posted to it are kept in memory.
pub struct FixtureHosting {
    data: FixtureData,
    posted: Mutex<Vec<String>>,
}

impl FixtureHosting {
    pub fn from_json(json: &str) -> Result<Self, GitHubError> {
        Ok(Self {
            data: serde_json::from_str(json)?,
            posted: Mutex::new(Vec::new()),
        })
    }

    /// The pull request embedded in the binary, used by `--mock`.
    pub fn sample() -> Result<Self, GitHubError> {
        Self::from_json(SAMPLE_PULL)
    }

    pub fn pull_number(&self) -> u64 {
        self.data.pull.number
    }

    pub fn posted_comments(&self) -> Vec<String> {
        self.posted
            .lock()
            .map(|posted| posted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HostingApi for FixtureHosting {
    async fn repository(&self, _id: u64) -> Result<RepoSlug, GitHubError> {
        parse_slug(&self.data.repository.full_name)
    }

    async fn pull_request(
        &self,
        _repo: &RepoSlug,
        _number: u64,
    ) -> Result<ApiPullRequest, GitHubError> {
        Ok(self.data.pull.clone())
    }

    async fn issue(&self, _repo: &RepoSlug, _number: u64) -> Result<ApiIssue, GitHubError> {
        Ok(self.data.issue.clone())
    }

    async fn labels(&self, _repo: &RepoSlug, _number: u64) -> Result<Vec<ApiLabel>, GitHubError> {
        Ok(self.data.labels.clone())
    }

    async fn reviews(&self, _repo: &RepoSlug, _number: u64) -> Result<Vec<ApiReview>, GitHubError> {
        Ok(self.data.reviews.clone())
    }

    async fn issue_comments(
        &self,
        _repo: &RepoSlug,
        _number: u64,
    ) -> Result<Vec<ApiComment>, GitHubError> {
        Ok(self.data.comments.clone())
    }

    async fn commits(&self, _repo: &RepoSlug, _number: u64) -> Result<Vec<ApiCommit>, GitHubError> {
        Ok(self.data.commits.clone())
    }

    async fn files(&self, _repo: &RepoSlug, _number: u64) -> Result<Vec<ApiFile>, GitHubError> {
        Ok(self.data.files.clone())
    }

    async fn create_comment(
        &self,
        _repo: &RepoSlug,
        _number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        if let Ok(mut posted) = self.posted.lock() {
            posted.push(body.to_string());
        }
        Ok(())
    }
}
