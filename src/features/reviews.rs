use std::collections::BTreeMap;

use tracing::debug;

use super::interactions::words_count;
use super::types::{ReviewRecord, APPROVED};
use crate::github::types::{login_of, ApiReview};

/// Key each submitted review by its stringified id.
/// Pending reviews carry no submission instant and are left out.
pub fn extract_reviews(reviews: &[ApiReview]) -> BTreeMap<String, ReviewRecord> {
    let mut results = BTreeMap::new();
    for review in reviews {
        let Some(submitted_at) = review.submitted_at else {
            debug!(review = review.id, state = %review.state, "skipping unsubmitted review");
            continue;
        };
        results.insert(
            review.id.to_string(),
            ReviewRecord {
                author: login_of(review.user.as_ref()),
                words_count: words_count(review.body.as_deref().unwrap_or_default()),
                submitted_at: submitted_at.timestamp(),
                state: review.state.clone(),
            },
        );
    }
    results
}

/// Earliest submission across all reviews.
pub fn first_review_time(reviews: &BTreeMap<String, ReviewRecord>) -> Option<i64> {
    reviews.values().map(|r| r.submitted_at).min()
}

/// Earliest submission among approving reviews.
pub fn first_approve_time(reviews: &BTreeMap<String, ReviewRecord>) -> Option<i64> {
    reviews
        .values()
        .filter(|r| r.state == APPROVED)
        .map(|r| r.submitted_at)
        .min()
}
