use chrono::DateTime;

/// What gets shown to the user for one predicted pull request.
#[derive(Debug)]
pub struct Report {
    /// `owner/name`
    pub repo: String,
    pub pr_number: u64,
    pub pr_title: String,
    pub author: Option<String>,
    pub size: String,
    pub commits_number: u64,
    pub changed_files_number: u64,
    pub reviews: usize,
    pub created_at: i64,
    pub first_review_at: Option<i64>,
    pub first_approve_at: Option<i64>,
    /// Predicted time-to-merge range, or `Unknown`
    pub bucket: String,
}

/// Render an epoch timestamp as RFC 3339, or a dash when absent.
pub fn format_timestamp(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "-".to_string())
}
