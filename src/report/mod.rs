pub mod types;

pub use types::Report;

use crate::features::PullRequestRecord;
use crate::github::RepoSlug;
use crate::predict::UNKNOWN;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};
use types::format_timestamp;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Build a Report from the extracted features and the predicted bucket.
pub fn build(repo: &RepoSlug, pr_number: u64, record: &PullRequestRecord, bucket: &str) -> Report {
    Report {
        repo: repo.to_string(),
        pr_number,
        pr_title: record.title.clone(),
        author: record.created_by.clone(),
        size: record.size.clone(),
        commits_number: record.commits_number,
        changed_files_number: record.changed_files_number,
        reviews: record.reviews.len(),
        created_at: record.created_at,
        first_review_at: record.first_review_at,
        first_approve_at: record.first_approve_at,
        bucket: bucket.to_string(),
    }
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(pr = report.pr_number, bucket = %report.bucket))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

/// Text posted back on the pull request.
pub fn comment_body(report: &Report) -> String {
    if report.bucket == UNKNOWN {
        return "Estimated time to merge: Unknown (no prediction available)".to_string();
    }
    format!("Estimated time to merge: **{}**", report.bucket)
}

/// Format and print the report to the terminal with colors:
///
/// PR #42: "Add review-time features" (org/repo)
/// Author: alice | Size: L | Commits: 2 | Files changed: 3 | Reviews: 3
///
/// Created:        2021-03-01T10:00:00+00:00
/// First review:   ...
/// First approval: ...
///
/// ═══ Estimated time to merge: 3-6 hrs ═══
fn print_terminal_report(report: &Report) {
    println!();
    println!(
        "PR #{}: \"{}\" ({})",
        report.pr_number, report.pr_title, report.repo
    );
    println!(
        "Author: {} | Size: {} | Commits: {} | Files changed: {} | Reviews: {}",
        report.author.as_deref().unwrap_or("-"),
        report.size,
        report.commits_number,
        report.changed_files_number,
        report.reviews
    );
    println!();
    println!("Created:        {}", format_timestamp(Some(report.created_at)));
    println!("First review:   {}", format_timestamp(report.first_review_at));
    println!("First approval: {}", format_timestamp(report.first_approve_at));
    println!();
    println!(
        "═══ Estimated time to merge: {} ═══",
        colorize_bucket(&report.bucket)
    );
    println!();
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut md = String::new();
    md.push_str(&format!(
        "# PR #{}: \"{}\"\n\n",
        report.pr_number, report.pr_title
    ));
    md.push_str(&format!(
        "**Repository:** {} | **Author:** {} | **Size:** {}\n\n",
        report.repo,
        report.author.as_deref().unwrap_or("-"),
        report.size
    ));
    md.push_str(&format!(
        "- Commits: {}\n- Files changed: {}\n- Reviews: {}\n",
        report.commits_number, report.changed_files_number, report.reviews
    ));
    md.push_str(&format!(
        "- Created: {}\n- First review: {}\n- First approval: {}\n\n",
        format_timestamp(Some(report.created_at)),
        format_timestamp(report.first_review_at),
        format_timestamp(report.first_approve_at)
    ));
    md.push_str(&format!("## Estimated time to merge: {}\n", report.bucket));

    std::fs::write(path, md)?;
    Ok(())
}

fn colorize_bucket(bucket: &str) -> colored::ColoredString {
    if bucket == UNKNOWN {
        bucket.yellow().bold()
    } else {
        bucket.green().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tests::sample_record;

    fn repo() -> RepoSlug {
        RepoSlug {
            owner: "thoth-station".to_string(),
            name: "mi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_report_metadata() {
        let record = sample_record().await;
        let report = build(&repo(), 42, &record, "3-6 hrs");
        assert_eq!(report.repo, "thoth-station/mi");
        assert_eq!(report.pr_number, 42);
        assert_eq!(report.author.as_deref(), Some("alice"));
        assert_eq!(report.size, "L");
        assert_eq!(report.reviews, 3);
        assert_eq!(report.bucket, "3-6 hrs");
    }

    #[tokio::test]
    async fn test_write_markdown_report() {
        let record = sample_record().await;
        let report = build(&repo(), 42, &record, "1-1.5 days");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_markdown_report(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# PR #42"));
        assert!(content.contains("**Author:** alice"));
        assert!(content.contains("**Size:** L"));
        assert!(content.contains("- First approval: 2021-03-02T09:15:30+00:00"));
        assert!(content.contains("## Estimated time to merge: 1-1.5 days"));
    }

    #[tokio::test]
    async fn test_comment_body() {
        let record = sample_record().await;
        let report = build(&repo(), 42, &record, ">19 days");
        assert_eq!(comment_body(&report), "Estimated time to merge: **>19 days**");

        let report = build(&repo(), 42, &record, UNKNOWN);
        assert!(comment_body(&report).contains("Unknown"));
    }

    #[tokio::test]
    async fn test_output_to_file() {
        let record = sample_record().await;
        let report = build(&repo(), 42, &record, UNKNOWN);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.md");
        output(&report, Some(&path)).unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_output_to_terminal() {
        let record = sample_record().await;
        let report = build(&repo(), 42, &record, "0-3 hrs");
        // Should not panic
        output(&report, None).unwrap();
    }
}
