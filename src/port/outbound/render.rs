//! Output port for the derived map and tabular views.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{EntityId, Fix, LastSeen};
use crate::error::Result;

/// Everything the output writers render, derived fresh each run.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Latest fix per active entity, sorted by entity id.
    pub latest: &'a [Fix],
    /// Full history of active entities, archive order.
    pub active: &'a [Fix],
    /// Active history grouped per entity, chronological within a group.
    pub tracks: &'a BTreeMap<EntityId, Vec<Fix>>,
    /// Inactive entities, oldest dropout first.
    pub inactive: &'a [LastSeen],
}

/// Renders a [`Snapshot`] into files under an output directory.
pub trait SnapshotWriter {
    /// Short label used in logs and the run report.
    fn name(&self) -> &'static str;

    /// Write this writer's files, returning their paths.
    fn write(&self, snapshot: &Snapshot<'_>, out_dir: &Path) -> Result<Vec<PathBuf>>;
}
