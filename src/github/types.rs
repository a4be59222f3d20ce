use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `owner/name` pair identifying a repository on the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// How the caller named the repository.
/// Numeric ids must be resolved to a slug before any PR lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoRef {
    Id(u64),
    Slug(RepoSlug),
}

/// Represents the parsed components of a GitHub PR URL.
#[derive(Debug, Clone)]
pub struct PrUrl {
    pub repo: RepoSlug,
    pub pr_number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub full_name: String,
}

/// Subset of `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub user: Option<ApiUser>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merged_by: Option<ApiUser>,
    pub additions: i64,
    pub deletions: i64,
    pub commits: u64,
    pub changed_files: u64,
}

/// The issue side of a pull request; only `closed_by` lives here.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssue {
    pub closed_by: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiReview {
    pub id: u64,
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    /// Null for reviews that are still pending.
    pub submitted_at: Option<DateTime<Utc>>,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiComment {
    pub user: Option<ApiUser>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommit {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFile {
    pub filename: String,
}

/// Login of an optional user object, absent unless both the object and its login exist.
pub fn login_of(user: Option<&ApiUser>) -> Option<String> {
    user.and_then(|u| u.login.clone())
}
