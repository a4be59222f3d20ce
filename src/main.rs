use clap::Parser;
use pr_ttm::github::fixture::FixtureHosting;
use pr_ttm::github::{self, GitHubClient, GitHubError, HostingApi, RepoRef};
use pr_ttm::{config, features, predict, report};
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// PR TTM: extracts features from a GitHub Pull Request and predicts how long
/// it will take to merge.
#[derive(Parser, Debug)]
#[command(name = "pr-ttm", version, about)]
struct Cli {
    /// Repository as owner/name or numeric id, or a full PR URL
    /// (e.g., https://github.com/org/repo/pull/42)
    ///
    /// Not required when --mock is used.
    repo: Option<String>,

    /// Pull request number. Omit when REPO is a PR URL.
    number: Option<u64>,

    /// Prediction endpoint; overrides [model].url and TTM_MODEL_URL
    #[arg(long)]
    model_url: Option<String>,

    /// Print the extracted feature record as JSON and stop
    #[arg(long)]
    features_only: bool,

    /// Optional output file path for markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Post the estimate as a comment on the pull request
    #[arg(long)]
    comment: bool,

    /// Use a built-in fixture PR instead of the GitHub API (no token needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let (api, repo, number): (Box<dyn HostingApi>, RepoRef, u64) = if cli.r#mock {
        info!("using fixture PR data");
        let fixture = FixtureHosting::sample()?;
        let repo = match cli.repo.as_deref() {
            Some(repo) => github::parse_repo_ref(repo)?,
            None => RepoRef::Id(0),
        };
        let number = cli.number.unwrap_or_else(|| fixture.pull_number());
        (Box::new(fixture) as Box<dyn HostingApi>, repo, number)
    } else {
        let target = cli.repo.as_deref().ok_or(
            "REPO is required unless --mock is used. Usage: pr-ttm <owner/name> <number> or pr-ttm <PR URL>",
        )?;
        let (repo, number) = parse_target(target, cli.number)?;
        let token = config.github_token().ok_or(GitHubError::MissingToken)?;
        let client = GitHubClient::new(&config.github, &token)?;
        (Box::new(client) as Box<dyn HostingApi>, repo, number)
    };

    let _main_span = info_span!("pr_ttm", pr = number).entered();

    let (slug, record) = features::extract(api.as_ref(), &repo, number).await?;
    info!(repo = %slug, size = %record.size, reviews = record.reviews.len(), "extracted features");

    if cli.features_only {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let model_url = config.model_url(cli.model_url.as_deref()).ok_or(
        "No prediction endpoint configured. Pass --model-url, set [model].url or TTM_MODEL_URL",
    )?;

    info!(model_url = %model_url, "requesting prediction");
    let http = reqwest::Client::new();
    let bucket = predict::predict(&http, &model_url, &record).await?;

    let built_report = report::build(&slug, number, &record, &bucket);
    report::output(&built_report, cli.output.as_deref())?;

    if cli.comment {
        info!("posting estimate to pull request");
        api.create_comment(&slug, number, &report::comment_body(&built_report))
            .await?;
    }
    info!(bucket = %bucket, "done");

    Ok(())
}

/// A PR URL carries its own number; anything else needs NUMBER alongside.
fn parse_target(target: &str, number: Option<u64>) -> Result<(RepoRef, u64), GitHubError> {
    if target.starts_with("http://") || target.starts_with("https://") {
        let parsed = github::parse_pr_url(target)?;
        debug!(repo = %parsed.repo, pr = parsed.pr_number, "parsed PR URL");
        return Ok((RepoRef::Slug(parsed.repo), parsed.pr_number));
    }
    let repo = github::parse_repo_ref(target)?;
    let number = number
        .ok_or_else(|| GitHubError::InvalidRepo(format!("{target} (missing PR number)")))?;
    Ok((repo, number))
}
