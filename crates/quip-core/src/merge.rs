//! Merge engine
//!
//! Reconciles the local quote sequence with a fetched remote snapshot.
//! Local-wins: on a text collision the local entry is kept unchanged and
//! the remote version is discarded. No field-level merge, no timestamps.

use std::collections::HashSet;

use crate::models::Quote;

/// Merge a remote snapshot into the local sequence
///
/// Local entries come first in their original order, followed by every
/// remote entry whose text does not appear in the local sequence, in
/// remote order. The membership test is built from `local` alone, so
/// remote entries that duplicate each other are all appended.
///
/// Pure function; merging the same snapshot against its own output is a
/// no-op.
pub fn merge(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let known: HashSet<&str> = local.iter().map(|q| q.text.as_str()).collect();

    let mut merged = local.to_vec();
    merged.extend(
        remote
            .iter()
            .filter(|q| !known.contains(q.text.as_str()))
            .cloned(),
    );
    merged
}
