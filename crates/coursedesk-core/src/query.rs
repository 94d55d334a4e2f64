//! Local catalog search.
//!
//! Matches the search term against titles only, case-insensitively, and
//! never reorders or mutates the input.

use crate::models::TopicRecord;

/// Records whose title contains `search_term`, in input order.
///
/// An empty term returns every record.
pub fn filter(records: &[TopicRecord], search_term: &str) -> Vec<TopicRecord> {
    filter_refs(records, search_term)
        .into_iter()
        .cloned()
        .collect()
}

/// Borrowing variant of [`filter`].
pub fn filter_refs<'a>(records: &'a [TopicRecord], search_term: &str) -> Vec<&'a TopicRecord> {
    if search_term.is_empty() {
        return records.iter().collect();
    }
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|record| title_matches(record, &needle))
        .collect()
}

fn title_matches(record: &TopicRecord, lowercase_needle: &str) -> bool {
    record.title.to_lowercase().contains(lowercase_needle)
}
