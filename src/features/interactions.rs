use std::collections::BTreeMap;

use tracing::debug;

use crate::github::types::{login_of, ApiComment};

/// Number of tokens when splitting on a single space.
/// Consecutive, leading and trailing spaces each yield an empty token.
pub fn words_count(body: &str) -> usize {
    body.split(' ').count()
}

/// Total word count per comment author, over `(author, body)` pairs.
pub fn interaction_totals<'a, I>(comments: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut totals = BTreeMap::new();
    for (author, body) in comments {
        *totals.entry(author.to_string()).or_insert(0) += words_count(body);
    }
    totals
}

/// Interaction totals over issue comments as returned by the hosting API.
/// Comments without a user are skipped; a null body counts as empty.
pub fn get_interactions(comments: &[ApiComment]) -> BTreeMap<String, usize> {
    let authored: Vec<(String, &str)> = comments
        .iter()
        .filter_map(|comment| {
            let author = login_of(comment.user.as_ref());
            if author.is_none() {
                debug!("skipping comment without an author");
            }
            author.map(|a| (a, comment.body.as_deref().unwrap_or_default()))
        })
        .collect();
    interaction_totals(authored.iter().map(|(a, b)| (a.as_str(), *b)))
}
