/// Result when no duration bucket can be determined.
pub const UNKNOWN: &str = "Unknown";

/// Model output class to human-readable time-to-merge range.
pub static DURATION_BUCKETS: [(&str, &str); 10] = [
    ("Class_0", "0-3 hrs"),
    ("Class_1", "3-6 hrs"),
    ("Class_2", "6-15 hrs"),
    ("Class_3", "15-24 hrs"),
    ("Class_4", "1-1.5 days"),
    ("Class_5", "1.5-2.5 days"),
    ("Class_6", "2.5-4.5 days"),
    ("Class_7", "4.5-8 days"),
    ("Class_8", "8-19 days"),
    ("Class_9", ">19 days"),
];

pub fn bucket_label(class_name: &str) -> Option<&'static str> {
    DURATION_BUCKETS
        .iter()
        .find(|(class, _)| *class == class_name)
        .map(|(_, label)| *label)
}
