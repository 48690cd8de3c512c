//! Category derivation
//!
//! Categories are never authored independently; they are derived from
//! whatever quotes exist, in first-seen order.

use std::collections::HashSet;

use crate::models::Quote;

/// Iterate the distinct categories of a quote sequence in first-seen order
///
/// Pure and lazy; duplicates after the first occurrence are skipped.
pub fn distinct_categories(quotes: &[Quote]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .map(|q| q.category.as_str())
        .filter(move |c| seen.insert(*c))
}

/// Collect the distinct categories into owned strings
pub fn category_set(quotes: &[Quote]) -> Vec<String> {
    distinct_categories(quotes).map(String::from).collect()
}
