use std::collections::BTreeMap;

use serde::Serialize;

/// Review state that counts as an approval.
pub const APPROVED: &str = "APPROVED";

/// Size sentinel for a line count no bucket covers.
pub const SIZE_NAN: &str = "NaN";

/// Size bucket derived from the number of changed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrSize {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
}

impl PrSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrSize::XS => "XS",
            PrSize::S => "S",
            PrSize::M => "M",
            PrSize::L => "L",
            PrSize::XL => "XL",
            PrSize::XXL => "XXL",
        }
    }
}

impl std::fmt::Display for PrSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted review on a pull request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub author: Option<String>,
    pub words_count: usize,
    pub submitted_at: i64,
    /// Passed through verbatim, e.g. `APPROVED`, `COMMENTED`, `CHANGES_REQUESTED`.
    pub state: String,
}

/// Flat feature set for a single pull request.
///
/// Field order is the column order sent to the prediction service.
/// Absent optionals serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestRecord {
    pub title: String,
    pub body: Option<String>,
    /// A `size/<VALUE>` label verbatim, otherwise the computed bucket.
    pub size: String,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub closed_at: Option<i64>,
    pub closed_by: Option<String>,
    pub merged_at: Option<i64>,
    pub merged_by: Option<String>,
    pub commits_number: u64,
    pub changed_files_number: u64,
    /// Commenter login to cumulative word count.
    pub interactions: BTreeMap<String, usize>,
    /// Review id to review.
    pub reviews: BTreeMap<String, ReviewRecord>,
    pub labels: Vec<String>,
    pub commits: Vec<String>,
    pub changed_files: Vec<String>,
    pub first_review_at: Option<i64>,
    pub first_approve_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_display() {
        assert_eq!(PrSize::XS.to_string(), "XS");
        assert_eq!(PrSize::XXL.to_string(), "XXL");
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let record = PullRequestRecord {
            title: "t".to_string(),
            body: None,
            size: "XS".to_string(),
            created_by: Some("alice".to_string()),
            created_at: 1,
            closed_at: None,
            closed_by: None,
            merged_at: None,
            merged_by: None,
            commits_number: 0,
            changed_files_number: 0,
            interactions: BTreeMap::new(),
            reviews: BTreeMap::new(),
            labels: vec![],
            commits: vec![],
            changed_files: vec![],
            first_review_at: None,
            first_approve_at: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.first(), Some(&"title"));
        assert_eq!(keys.last(), Some(&"first_approve_at"));
        assert_eq!(keys.len(), 18);
        assert!(value["closed_by"].is_null());
    }
}
