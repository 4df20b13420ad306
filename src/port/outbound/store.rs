//! Persistence port for the cumulative archive.

use std::path::Path;

use crate::domain::Archive;
use crate::error::{ArchiveCorruptError, Result};

/// Outcome of reading the persisted archive.
#[derive(Debug)]
pub enum ArchiveLoad {
    /// No archive exists yet.
    Missing,
    /// The archive was read back intact.
    Loaded(Archive),
    /// The archive exists but could not be read; it is discarded for the run.
    Corrupt(ArchiveCorruptError),
}

/// Read-modify-write storage for the archive.
///
/// No locking: concurrent runs against the same store must be serialized
/// by the caller.
pub trait ArchiveStore {
    /// Where the archive lives, for reporting.
    fn location(&self) -> &Path;

    /// Read the archive. Never fails; problems surface as [`ArchiveLoad::Corrupt`].
    fn load(&self) -> ArchiveLoad;

    /// Replace the persisted archive with `archive`.
    fn persist(&self, archive: &Archive) -> Result<()>;
}
