use super::types::{PrSize, SIZE_NAN};

const SIZE_LABEL_PREFIX: &str = "size/";

/// Bucket a changed-line count. Negative counts have no bucket.
pub fn classify_size(lines_changed: i64) -> Option<PrSize> {
    match lines_changed {
        1000.. => Some(PrSize::XXL),
        500..=999 => Some(PrSize::XL),
        100..=499 => Some(PrSize::L),
        30..=99 => Some(PrSize::M),
        10..=29 => Some(PrSize::S),
        0..=9 => Some(PrSize::XS),
        _ => None,
    }
}

/// Value of the first `size/<VALUE>` label, unvalidated.
/// An empty value counts as no size label.
pub fn labeled_size(labels: &[String]) -> Option<&str> {
    labels
        .iter()
        .find_map(|label| label.strip_prefix(SIZE_LABEL_PREFIX))
        .filter(|value| !value.is_empty())
}

/// Size feature: an explicit label wins, otherwise additions + deletions are bucketed.
pub fn resolve_size(labels: &[String], additions: i64, deletions: i64) -> String {
    if let Some(label) = labeled_size(labels) {
        return label.to_string();
    }
    classify_size(additions + deletions)
        .map(|size| size.to_string())
        .unwrap_or_else(|| SIZE_NAN.to_string())
}
