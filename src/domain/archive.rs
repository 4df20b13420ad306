//! The cumulative fix archive and its merge rule.
//!
//! The archive holds at most one fix per `(entity_id, timestamp)`. Merging a
//! batch keeps the later-appearing row for every key, so re-ingesting a
//! corrected export supersedes the stale record and merging the same batch
//! twice changes nothing.

use std::collections::HashMap;

use super::fix::{Fix, FixKey};

/// Ordered, deduplicated collection of every fix ever ingested.
///
/// Canonical order is newest first. Nothing downstream relies on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    fixes: Vec<Fix>,
}

impl Archive {
    /// Build an archive from rows as loaded, without reordering or dedup.
    #[must_use]
    pub fn from_fixes(fixes: Vec<Fix>) -> Self {
        Self { fixes }
    }

    #[must_use]
    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    pub fn fixes_mut(&mut self) -> &mut [Fix] {
        &mut self.fixes
    }

    #[must_use]
    pub fn into_fixes(self) -> Vec<Fix> {
        self.fixes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// Keep the last occurrence of every key, preserving relative order of survivors.
fn dedup_keep_last(rows: Vec<Fix>) -> Vec<Fix> {
    let mut last_index: HashMap<FixKey, usize> = HashMap::with_capacity(rows.len());
    for (index, fix) in rows.iter().enumerate() {
        last_index.insert(fix.key(), index);
    }

    rows.into_iter()
        .enumerate()
        .filter(|(index, fix)| last_index.get(&fix.key()) == Some(index))
        .map(|(_, fix)| fix)
        .collect()
}

/// Merge an incoming batch into the existing archive.
///
/// Rows are concatenated existing-first, deduplicated by
/// `(entity_id, timestamp)` keeping the later row, then stably sorted
/// newest first.
#[must_use]
pub fn merge(existing: Option<Archive>, incoming: Vec<Fix>) -> Archive {
    let mut rows = existing.map(Archive::into_fixes).unwrap_or_default();
    rows.extend(incoming);

    let mut fixes = dedup_keep_last(rows);
    fixes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Archive { fixes }
}
