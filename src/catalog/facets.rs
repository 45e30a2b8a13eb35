//! Distinct filter values derived from a catalog.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::QueryRecord;

/// Options offered by the author and tag filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

impl Facets {
    pub fn from_catalog(catalog: &[QueryRecord]) -> Self {
        Facets {
            authors: authors(catalog),
            tags: tags(catalog),
        }
    }
}

/// Distinct `created_by` values in order of first appearance.
pub fn authors(catalog: &[QueryRecord]) -> Vec<String> {
    distinct(catalog.iter().map(|q| q.created_by.as_str()))
}

/// Distinct tags across every record in order of first appearance. Empty tags are dropped.
pub fn tags(catalog: &[QueryRecord]) -> Vec<String> {
    distinct(
        catalog
            .iter()
            .flat_map(|q| q.tags.iter().map(String::as_str))
            .filter(|tag| !tag.is_empty()),
    )
}

/// Resolve the default author filter.
///
/// Returns the candidate when it owns at least one query in the catalog, otherwise an
/// empty string, which the author filter treats as "everyone".
pub fn reconcile_author(candidate: Option<&str>, authors: &[String]) -> String {
    match candidate {
        Some(author) if authors.iter().any(|a| a == author) => author.to_string(),
        _ => String::new(),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
