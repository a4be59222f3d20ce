pub mod interactions;
pub mod reviews;
pub mod size;
pub mod types;

pub use types::{PullRequestRecord, ReviewRecord};

use tracing::{debug, info, instrument};

use crate::config::GitHubConfig;
use crate::github::types::{login_of, ApiPullRequest};
use crate::github::{self, GitHubClient, GitHubError, HostingApi, RepoRef, RepoSlug};

/// Build the feature record for an already fetched pull request.
///
/// Sub-resources are fetched one after another: issue, labels, reviews,
/// issue comments, commits, files. Any failed fetch aborts the whole parse.
#[instrument(skip(api, repo, pull), fields(repo = %repo, pr = pull.number))]
pub async fn parse(
    api: &dyn HostingApi,
    repo: &RepoSlug,
    pull: &ApiPullRequest,
) -> Result<PullRequestRecord, GitHubError> {
    let number = pull.number;

    let created_at = pull.created_at.timestamp();
    let closed_at = pull.closed_at.map(|at| at.timestamp());
    let merged_at = pull.merged_at.map(|at| at.timestamp());

    // closed_by is only tracked on the issue side
    let issue = api.issue(repo, number).await?;
    let closed_by = login_of(issue.closed_by.as_ref());
    let merged_by = login_of(pull.merged_by.as_ref());

    let labels: Vec<String> = api
        .labels(repo, number)
        .await?
        .into_iter()
        .map(|label| label.name)
        .collect();

    let size = size::resolve_size(&labels, pull.additions, pull.deletions);
    debug!(%size, additions = pull.additions, deletions = pull.deletions, "resolved size");

    let reviews = reviews::extract_reviews(&api.reviews(repo, number).await?);
    let interactions = interactions::get_interactions(&api.issue_comments(repo, number).await?);

    let commits: Vec<String> = api
        .commits(repo, number)
        .await?
        .into_iter()
        .map(|commit| commit.sha)
        .collect();

    let changed_files: Vec<String> = api
        .files(repo, number)
        .await?
        .into_iter()
        .map(|file| file.filename)
        .collect();

    let first_review_at = reviews::first_review_time(&reviews);
    let first_approve_at = reviews::first_approve_time(&reviews);
    debug!(
        reviews = reviews.len(),
        commenters = interactions.len(),
        commits = commits.len(),
        files = changed_files.len(),
        "collected sub-resources"
    );

    Ok(PullRequestRecord {
        title: pull.title.clone(),
        body: pull.body.clone(),
        size,
        created_by: login_of(pull.user.as_ref()),
        created_at,
        closed_at,
        closed_by,
        merged_at,
        merged_by,
        commits_number: pull.commits,
        changed_files_number: pull.changed_files,
        interactions,
        reviews,
        labels,
        commits,
        changed_files,
        first_review_at,
        first_approve_at,
    })
}

/// Resolve the repository, fetch the pull request and parse it.
pub async fn extract(
    api: &dyn HostingApi,
    repo: &RepoRef,
    number: u64,
) -> Result<(RepoSlug, PullRequestRecord), GitHubError> {
    let slug = github::resolve_repo(api, repo).await?;
    info!(repo = %slug, pr = number, "fetching pull request");
    let pull = api.pull_request(&slug, number).await?;
    let record = parse(api, &slug, &pull).await?;
    Ok((slug, record))
}

/// Feature record for `pr_id` in `repo_id` (`owner/name` or numeric id), fetched
/// live from api.github.com with the default 50 s timeout.
pub async fn get_mi_parsed_pr(
    repo_id: &str,
    pr_id: u64,
    token: &str,
) -> Result<PullRequestRecord, GitHubError> {
    let repo = github::parse_repo_ref(repo_id)?;
    let client = GitHubClient::new(&GitHubConfig::default(), token)?;
    let (_, record) = extract(&client, &repo, pr_id).await?;
    Ok(record)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::github::fixture::FixtureHosting;
    use crate::github::types::{ApiComment, ApiCommit, ApiFile, ApiIssue, ApiLabel, ApiReview};
    use async_trait::async_trait;

    pub async fn sample_record() -> PullRequestRecord {
        let api = FixtureHosting::sample().unwrap();
        let (_, record) = extract(&api, &RepoRef::Id(1), 42).await.unwrap();
        record
    }

    #[tokio::test]
    async fn test_parse_sample_timestamps_and_identities() {
        let record = sample_record().await;
        assert_eq!(record.title, "Add review-time features");
        assert_eq!(record.created_by.as_deref(), Some("alice"));
        assert_eq!(record.created_at, 1_614_592_800);
        assert_eq!(record.closed_at, Some(1_614_688_200));
        assert_eq!(record.merged_at, Some(1_614_688_200));
        assert_eq!(record.closed_by.as_deref(), Some("carol"));
        assert_eq!(record.merged_by.as_deref(), Some("carol"));
    }

    #[tokio::test]
    async fn test_parse_sample_size_and_lists() {
        let record = sample_record().await;
        // 120 additions + 35 deletions, no size label
        assert_eq!(record.size, "L");
        assert_eq!(record.labels, vec!["kind/feature", "approved"]);
        assert_eq!(record.commits, vec!["9f2c1e7a0b4d", "c81d55e3f0aa"]);
        assert_eq!(record.changed_files.len(), 3);
        assert_eq!(record.changed_files[0], "src/features/reviews.rs");
        assert_eq!(record.commits_number, 2);
        assert_eq!(record.changed_files_number, 3);
    }

    #[tokio::test]
    async fn test_parse_sample_reviews_and_interactions() {
        let record = sample_record().await;
        assert_eq!(record.reviews.len(), 3);
        assert_eq!(record.reviews["5001"].words_count, 4);
        assert!(record.reviews["5003"].author.is_none());
        assert_eq!(record.reviews["5003"].words_count, 3);
        assert_eq!(record.first_review_at, Some(1_614_607_200));
        assert_eq!(record.first_approve_at, Some(1_614_676_530));

        assert_eq!(record.interactions.len(), 2);
        assert_eq!(record.interactions["alice"], 4);
        assert_eq!(record.interactions["bob"], 1);
    }

    /// Open pull request with a size label, failing on the files endpoint.
    struct OpenPull {
        fail_files: bool,
    }

    fn open_pull() -> ApiPullRequest {
        serde_json::from_str(
            r#"{
                "number": 7, "title": "WIP", "body": null, "user": null,
                "created_at": "2021-01-01T00:00:00Z", "closed_at": null,
                "merged_at": null, "merged_by": null,
                "additions": 2000, "deletions": 0, "commits": 1, "changed_files": 1
            }"#,
        )
        .unwrap()
    }

    #[async_trait]
    impl HostingApi for OpenPull {
        async fn repository(&self, _id: u64) -> Result<RepoSlug, GitHubError> {
            Err(GitHubError::InvalidRepo("unused".to_string()))
        }
        async fn pull_request(
            &self,
            _r: &RepoSlug,
            _n: u64,
        ) -> Result<ApiPullRequest, GitHubError> {
            Ok(open_pull())
        }
        async fn issue(&self, _r: &RepoSlug, _n: u64) -> Result<ApiIssue, GitHubError> {
            Ok(ApiIssue { closed_by: None })
        }
        async fn labels(&self, _r: &RepoSlug, _n: u64) -> Result<Vec<ApiLabel>, GitHubError> {
            Ok(vec![ApiLabel {
                name: "size/XS".to_string(),
            }])
        }
        async fn reviews(&self, _r: &RepoSlug, _n: u64) -> Result<Vec<ApiReview>, GitHubError> {
            Ok(vec![])
        }
        async fn issue_comments(
            &self,
            _r: &RepoSlug,
            _n: u64,
        ) -> Result<Vec<ApiComment>, GitHubError> {
            Ok(vec![])
        }
        async fn commits(&self, _r: &RepoSlug, _n: u64) -> Result<Vec<ApiCommit>, GitHubError> {
            Ok(vec![ApiCommit {
                sha: "abc".to_string(),
            }])
        }
        async fn files(&self, _r: &RepoSlug, _n: u64) -> Result<Vec<ApiFile>, GitHubError> {
            if self.fail_files {
                return Err(GitHubError::InvalidUrl("files".to_string()));
            }
            Ok(vec![])
        }
        async fn create_comment(
            &self,
            _r: &RepoSlug,
            _n: u64,
            _b: &str,
        ) -> Result<(), GitHubError> {
            Ok(())
        }
    }

    fn slug() -> RepoSlug {
        RepoSlug {
            owner: "org".to_string(),
            name: "repo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_parse_open_pull_request() {
        let api = OpenPull { fail_files: false };
        let record = parse(&api, &slug(), &open_pull()).await.unwrap();
        assert_eq!(record.size, "XS");
        assert!(record.body.is_none());
        assert!(record.created_by.is_none());
        assert!(record.closed_at.is_none());
        assert!(record.merged_at.is_none());
        assert!(record.closed_by.is_none());
        assert!(record.merged_by.is_none());
        assert!(record.reviews.is_empty());
        assert!(record.first_review_at.is_none());
        assert!(record.first_approve_at.is_none());
    }

    #[tokio::test]
    async fn test_sub_resource_failure_aborts_parse() {
        let api = OpenPull { fail_files: true };
        let err = parse(&api, &slug(), &open_pull()).await.unwrap_err();
        assert!(matches!(err, GitHubError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_get_mi_parsed_pr_rejects_bad_repo_id() {
        let err = get_mi_parsed_pr("not-a-repo", 1, "token").await.unwrap_err();
        assert!(matches!(err, GitHubError::InvalidRepo(_)));
    }

    #[tokio::test]
    async fn test_extract_with_slug_skips_repository_lookup() {
        let api = OpenPull { fail_files: false };
        let (resolved, record) = extract(&api, &RepoRef::Slug(slug()), 7).await.unwrap();
        assert_eq!(resolved, slug());
        assert_eq!(record.commits, vec!["abc"]);
    }
}
