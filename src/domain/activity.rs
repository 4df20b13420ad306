//! Active/inactive partitioning by most-recent-fix recency.
//!
//! Everything here is recomputed from the full archive each run. There is
//! no persisted "active" flag.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::archive::Archive;
use super::{EntityId, Fix};

/// Recency window ending at the run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindow {
    now: NaiveDateTime,
    days: u32,
}

impl ActivityWindow {
    #[must_use]
    pub fn ending_at(now: NaiveDateTime, days: u32) -> Self {
        Self { now, days }
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    /// `now - days`. Entities seen at or after this instant are active.
    ///
    /// Windows reaching past the earliest representable date start there.
    #[must_use]
    pub fn cutoff(&self) -> NaiveDateTime {
        self.now
            .checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(NaiveDateTime::MIN)
    }
}

/// Most recent fix time of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastSeen {
    pub entity_id: EntityId,
    pub last_seen: NaiveDateTime,
}

/// Every archived entity lands in exactly one of the two sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPartition {
    pub active_ids: BTreeSet<EntityId>,
    /// Oldest dropout first.
    pub inactive: Vec<LastSeen>,
}

impl ActivityPartition {
    #[must_use]
    pub fn is_active(&self, entity_id: &EntityId) -> bool {
        self.active_ids.contains(entity_id)
    }
}

/// Maximum timestamp per entity across the whole archive.
#[must_use]
pub fn last_seen(archive: &Archive) -> BTreeMap<EntityId, NaiveDateTime> {
    let mut seen: BTreeMap<EntityId, NaiveDateTime> = BTreeMap::new();
    for fix in archive.fixes() {
        seen.entry(fix.entity_id.clone())
            .and_modify(|ts| *ts = (*ts).max(fix.timestamp))
            .or_insert(fix.timestamp);
    }
    seen
}

/// Split entities by whether `last_seen >= cutoff`.
#[must_use]
pub fn partition(archive: &Archive, cutoff: NaiveDateTime) -> ActivityPartition {
    let mut result = ActivityPartition::default();

    for (entity_id, seen) in last_seen(archive) {
        if seen >= cutoff {
            result.active_ids.insert(entity_id);
        } else {
            result.inactive.push(LastSeen {
                entity_id,
                last_seen: seen,
            });
        }
    }

    // Stable sort over the id-ordered map keeps ties ordered by entity id.
    result.inactive.sort_by_key(|entry| entry.last_seen);
    result
}

/// Full history of every active entity, in archive order.
#[must_use]
pub fn active_fixes(archive: &Archive, partition: &ActivityPartition) -> Vec<Fix> {
    archive
        .fixes()
        .iter()
        .filter(|fix| partition.is_active(&fix.entity_id))
        .cloned()
        .collect()
}

/// One fix per entity: the one with the greatest timestamp.
///
/// On equal timestamps the row appearing later in `fixes` wins. Output is
/// sorted by entity id.
#[must_use]
pub fn latest_per_entity(fixes: &[Fix]) -> Vec<Fix> {
    let mut best: HashMap<&EntityId, usize> = HashMap::new();
    for (index, fix) in fixes.iter().enumerate() {
        best.entry(&fix.entity_id)
            .and_modify(|current| {
                if fix.timestamp >= fixes[*current].timestamp {
                    *current = index;
                }
            })
            .or_insert(index);
    }

    let mut latest: Vec<Fix> = best.into_values().map(|index| fixes[index].clone()).collect();
    latest.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
    latest
}

/// Active fixes grouped per entity, chronological within each group.
///
/// Groups are ordered by entity id. Used for line renderings.
#[must_use]
pub fn tracks(fixes: &[Fix]) -> BTreeMap<EntityId, Vec<Fix>> {
    let mut grouped: BTreeMap<EntityId, Vec<Fix>> = BTreeMap::new();
    for fix in fixes {
        grouped
            .entry(fix.entity_id.clone())
            .or_default()
            .push(fix.clone());
    }
    for group in grouped.values_mut() {
        group.sort_by_key(|fix| fix.timestamp);
    }
    grouped
}
