//! Input ports: fix batches and area polygons.

use std::path::{Path, PathBuf};

use crate::domain::{Area, AreaKind, Fix};
use crate::error::{PolygonUnavailableError, Result};

/// Rows loaded from one or more batch files.
#[derive(Debug, Clone, Default)]
pub struct BatchLoad {
    /// Valid fixes in file order, each tagged with its source file.
    pub fixes: Vec<Fix>,
    /// Files read, in the order they were read.
    pub files: Vec<PathBuf>,
    /// Data rows seen across all files.
    pub rows_read: usize,
    /// Rows discarded for a blank id, bad timestamp or bad coordinates.
    pub rows_dropped: usize,
}

impl BatchLoad {
    /// Append another load, keeping file order.
    pub fn absorb(&mut self, other: BatchLoad) {
        self.fixes.extend(other.fixes);
        self.files.extend(other.files);
        self.rows_read += other.rows_read;
        self.rows_dropped += other.rows_dropped;
    }
}

/// Reads positional fixes from batch exports.
pub trait FixSource {
    /// Batch files to process: `explicit` when given, otherwise every file
    /// in `dir` matching `pattern`. Fails when nothing is found.
    fn locate(&self, explicit: &[PathBuf], dir: &Path, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Load every path, in sorted path order.
    fn load(&self, paths: &[PathBuf]) -> Result<BatchLoad>;
}

/// Reads one area polygon definition.
pub trait AreaSource {
    fn load(&self, kind: AreaKind, path: &Path) -> std::result::Result<Area, PolygonUnavailableError>;
}
