//! Narrowing and ordering of the catalog for display.

use crate::models::{FilterCriteria, QueryRecord, SortBy};

/// Records of `catalog` that pass every active filter in `criteria`, in display order.
///
/// Filters with an empty criterion are skipped. The catalog itself is left untouched.
pub fn visible<'a>(catalog: &'a [QueryRecord], criteria: &FilterCriteria) -> Vec<&'a QueryRecord> {
    let terms = criteria.search_terms();
    let mut records: Vec<&QueryRecord> = catalog
        .iter()
        .filter(|q| passes_facets(q, criteria) && matches_terms(q, &terms))
        .collect();
    sort(&mut records, criteria.sort_by);
    records
}

/// Whether a single record passes every active filter in `criteria`
pub fn matches(record: &QueryRecord, criteria: &FilterCriteria) -> bool {
    passes_facets(record, criteria) && matches_terms(record, &criteria.search_terms())
}

fn passes_facets(record: &QueryRecord, criteria: &FilterCriteria) -> bool {
    if let Some(tag) = criteria.tag.as_deref() {
        if !record.has_tag(tag) {
            return false;
        }
    }
    if let Some(author) = criteria.created_by.as_deref() {
        if record.created_by != author {
            return false;
        }
    }
    if let Some(connection_id) = criteria.connection_id.as_deref() {
        if record.connection_id.as_deref() != Some(connection_id) {
            return false;
        }
    }
    true
}

/// Every term must occur in the name or in the query text. Terms are already lowercased.
fn matches_terms(record: &QueryRecord, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let name = record.name.to_lowercase();
    let query_text = record.query_text.to_lowercase();
    terms
        .iter()
        .all(|term| name.contains(term.as_str()) || query_text.contains(term.as_str()))
}

fn sort(records: &mut [&QueryRecord], sort_by: SortBy) {
    match sort_by {
        SortBy::Name => records.sort_by_cached_key(|q| q.name.to_lowercase()),
        SortBy::ModifiedDate => records.sort_by(|a, b| b.modified_date.cmp(&a.modified_date)),
    }
}
