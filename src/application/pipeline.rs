//! The end-to-end tracking run.
//!
//! # Flow
//!
//! ```text
//! locate --> areas --> batches --> archive load --> merge
//!                                                     |
//!                                                     v
//!   writers <-- persist <-- partition <-- classify (every row)
//! ```
//!
//! Missing or broken areas, an unreadable archive, dropped batch rows and
//! failing writers all degrade the run and are collected as
//! [`RunWarning`]s. Only "nothing to process", batch I/O and archive
//! persistence failures abort it.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::outbound::geojson::GeoJsonWriter;
use crate::adapter::outbound::kml::KmlWriter;
use crate::adapter::outbound::tabular::{
    CsvArchiveStore, CsvAreaSource, CsvTableWriter, SemicolonBatchReader,
};
use crate::domain::activity::{self, ActivityWindow};
use crate::domain::archive::merge;
use crate::domain::area::classify_fixes;
use crate::domain::{AreaKind, AreaState, Areas, EntityId, LastSeen};
use crate::error::Result;
use crate::port::outbound::render::{Snapshot, SnapshotWriter};
use crate::port::outbound::source::{AreaSource, FixSource};
use crate::port::outbound::store::{ArchiveLoad, ArchiveStore};

/// Resolved inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Explicit batch files. Empty means discover in `input_dir`.
    pub inputs: Vec<PathBuf>,
    pub input_dir: PathBuf,
    pub pattern: String,
    pub deployment_csv: PathBuf,
    pub operational_csv: PathBuf,
    pub out_dir: PathBuf,
    pub active_days: u32,
    pub geojson: bool,
    /// Local wall-clock time the activity window ends at.
    pub now: NaiveDateTime,
}

/// What happened to the previously persisted archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveOutcome {
    /// No archive existed; the batch became the archive.
    Created,
    /// The batch was merged into the existing archive.
    Appended,
    /// The existing archive was unreadable and replaced by the batch.
    Discarded,
}

impl ArchiveOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Appended => "appended",
            Self::Discarded => "discarded",
        }
    }
}

/// Availability of one area for this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaReport {
    pub kind: AreaKind,
    pub path: PathBuf,
    pub available: bool,
}

/// A degradation that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    PolygonUnavailable { area: AreaKind, reason: String },
    ArchiveDiscarded { path: PathBuf, reason: String },
    RowsDropped { count: usize },
    WriterFailed { writer: &'static str, reason: String },
}

impl std::fmt::Display for RunWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolygonUnavailable { reason, .. } => {
                write!(f, "{reason}; no points match this area")
            }
            Self::ArchiveDiscarded { reason, .. } => {
                write!(f, "{reason}; starting a fresh archive")
            }
            Self::RowsDropped { count } => write!(f, "{count} malformed batch rows dropped"),
            Self::WriterFailed { writer, reason } => write!(f, "{writer} output failed: {reason}"),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub files: Vec<PathBuf>,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub archive: ArchiveOutcome,
    pub archive_path: PathBuf,
    pub areas: Vec<AreaReport>,
    pub total_records: usize,
    pub in_area_records: usize,
    pub cutoff: NaiveDateTime,
    pub active: Vec<EntityId>,
    pub inactive: Vec<LastSeen>,
    /// Derived outputs that were written, in writer order.
    pub outputs: Vec<PathBuf>,
    pub warnings: Vec<RunWarning>,
}

/// Runs the tracking flow over pluggable ports.
pub struct Pipeline {
    fixes: Box<dyn FixSource>,
    areas: Box<dyn AreaSource>,
    store: Box<dyn ArchiveStore>,
    writers: Vec<Box<dyn SnapshotWriter>>,
}

impl Pipeline {
    pub fn new(
        fixes: Box<dyn FixSource>,
        areas: Box<dyn AreaSource>,
        store: Box<dyn ArchiveStore>,
        writers: Vec<Box<dyn SnapshotWriter>>,
    ) -> Self {
        Self {
            fixes,
            areas,
            store,
            writers,
        }
    }

    /// File-backed adapters writing into `options.out_dir`.
    #[must_use]
    pub fn standard(options: &RunOptions) -> Self {
        let mut writers: Vec<Box<dyn SnapshotWriter>> =
            vec![Box::new(CsvTableWriter), Box::new(KmlWriter)];
        if options.geojson {
            writers.push(Box::new(GeoJsonWriter));
        }

        Self::new(
            Box::new(SemicolonBatchReader),
            Box::new(CsvAreaSource),
            Box::new(CsvArchiveStore::in_dir(&options.out_dir)),
            writers,
        )
    }

    fn load_area(&self, kind: AreaKind, path: &Path, warnings: &mut Vec<RunWarning>) -> AreaState {
        match self.areas.load(kind, path) {
            Ok(area) => {
                debug!(area = %kind, path = %path.display(), "area loaded");
                AreaState::Available(area)
            }
            Err(e) => {
                warn!(area = %kind, error = %e, "area unavailable");
                let reason = e.to_string();
                warnings.push(RunWarning::PolygonUnavailable {
                    area: kind,
                    reason: reason.clone(),
                });
                AreaState::unavailable(kind, reason)
            }
        }
    }

    /// Execute one run.
    pub fn run(&self, options: &RunOptions) -> Result<RunReport> {
        let mut warnings = Vec::new();

        let files = self
            .fixes
            .locate(&options.inputs, &options.input_dir, &options.pattern)?;
        info!(files = files.len(), "batch files located");

        let areas = Areas::new(
            self.load_area(AreaKind::Deployment, &options.deployment_csv, &mut warnings),
            self.load_area(AreaKind::Operational, &options.operational_csv, &mut warnings),
        );

        let batch = self.fixes.load(&files)?;
        info!(
            rows = batch.rows_read,
            kept = batch.fixes.len(),
            dropped = batch.rows_dropped,
            "batch loaded"
        );
        if batch.rows_dropped > 0 {
            warn!(count = batch.rows_dropped, "malformed batch rows dropped");
            warnings.push(RunWarning::RowsDropped {
                count: batch.rows_dropped,
            });
        }

        let (existing, outcome) = match self.store.load() {
            ArchiveLoad::Missing => (None, ArchiveOutcome::Created),
            ArchiveLoad::Loaded(archive) => (Some(archive), ArchiveOutcome::Appended),
            ArchiveLoad::Corrupt(e) => {
                warn!(error = %e, "discarding unreadable archive");
                warnings.push(RunWarning::ArchiveDiscarded {
                    path: e.path.clone(),
                    reason: e.to_string(),
                });
                (None, ArchiveOutcome::Discarded)
            }
        };

        let mut archive = merge(existing, batch.fixes);
        let in_area_records = classify_fixes(archive.fixes_mut(), &areas);

        let window = ActivityWindow::ending_at(options.now, options.active_days);
        let partition = activity::partition(&archive, window.cutoff());
        info!(
            records = archive.len(),
            in_area = in_area_records,
            active = partition.active_ids.len(),
            inactive = partition.inactive.len(),
            cutoff = %window.cutoff(),
            "archive classified"
        );

        self.store.persist(&archive)?;
        info!(path = %self.store.location().display(), outcome = outcome.as_str(), "archive written");

        let active = activity::active_fixes(&archive, &partition);
        let latest = activity::latest_per_entity(&active);
        let tracks = activity::tracks(&active);
        let snapshot = Snapshot {
            latest: &latest,
            active: &active,
            tracks: &tracks,
            inactive: &partition.inactive,
        };

        let mut outputs = Vec::new();
        for writer in &self.writers {
            match writer.write(&snapshot, &options.out_dir) {
                Ok(paths) => {
                    debug!(writer = writer.name(), files = paths.len(), "outputs written");
                    outputs.extend(paths);
                }
                Err(e) => {
                    warn!(writer = writer.name(), error = %e, "output writer failed");
                    warnings.push(RunWarning::WriterFailed {
                        writer: writer.name(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(RunReport {
            files,
            rows_read: batch.rows_read,
            rows_dropped: batch.rows_dropped,
            archive: outcome,
            archive_path: self.store.location().to_path_buf(),
            areas: vec![
                AreaReport {
                    kind: AreaKind::Deployment,
                    path: options.deployment_csv.clone(),
                    available: areas.deployment.is_available(),
                },
                AreaReport {
                    kind: AreaKind::Operational,
                    path: options.operational_csv.clone(),
                    available: areas.operational.is_available(),
                },
            ],
            total_records: archive.len(),
            in_area_records,
            cutoff: window.cutoff(),
            active: partition.active_ids.into_iter().collect(),
            inactive: partition.inactive,
            outputs,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Archive, Area, Fix};
    use crate::error::{ArchiveCorruptError, Error, PolygonProblem, PolygonUnavailableError};
    use crate::port::outbound::source::BatchLoad;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    struct FixedBatch(Vec<Fix>);

    impl FixSource for FixedBatch {
        fn locate(&self, _: &[PathBuf], dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
            if self.0.is_empty() {
                return Err(Error::NoInputFiles {
                    pattern: dir.join(pattern).display().to_string(),
                });
            }
            Ok(vec![dir.join("buoys_1.csv")])
        }

        fn load(&self, paths: &[PathBuf]) -> Result<BatchLoad> {
            Ok(BatchLoad {
                fixes: self.0.clone(),
                files: paths.to_vec(),
                rows_read: self.0.len() + 1,
                rows_dropped: 1,
            })
        }
    }

    /// Deployment is the unit square around the origin, operational is missing.
    struct SquareOnly;

    impl AreaSource for SquareOnly {
        fn load(
            &self,
            kind: AreaKind,
            path: &Path,
        ) -> std::result::Result<Area, PolygonUnavailableError> {
            match kind {
                AreaKind::Deployment => Ok(Area::from_vertices(
                    kind,
                    vec![(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
                )
                .unwrap()),
                AreaKind::Operational => Err(PolygonUnavailableError {
                    kind,
                    path: path.to_path_buf(),
                    problem: PolygonProblem::MissingLatitudeColumn,
                }),
            }
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        initial: Option<std::result::Result<Archive, String>>,
        persisted: Rc<RefCell<Option<Archive>>>,
    }

    impl ArchiveStore for MemoryStore {
        fn location(&self) -> &Path {
            Path::new("memory/all_points.csv")
        }

        fn load(&self) -> ArchiveLoad {
            match &self.initial {
                None => ArchiveLoad::Missing,
                Some(Ok(archive)) => ArchiveLoad::Loaded(archive.clone()),
                Some(Err(reason)) => ArchiveLoad::Corrupt(ArchiveCorruptError {
                    path: self.location().to_path_buf(),
                    reason: reason.clone(),
                }),
            }
        }

        fn persist(&self, archive: &Archive) -> Result<()> {
            *self.persisted.borrow_mut() = Some(archive.clone());
            Ok(())
        }
    }

    struct FailingWriter;

    impl SnapshotWriter for FailingWriter {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn write(&self, _: &Snapshot<'_>, _: &Path) -> Result<Vec<PathBuf>> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }
    }

    struct CountingWriter(Rc<RefCell<Option<(usize, usize)>>>);

    impl SnapshotWriter for CountingWriter {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn write(&self, snapshot: &Snapshot<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
            *self.0.borrow_mut() = Some((snapshot.latest.len(), snapshot.inactive.len()));
            Ok(vec![out_dir.join("counted")])
        }
    }

    fn options() -> RunOptions {
        RunOptions {
            inputs: Vec::new(),
            input_dir: PathBuf::from("in"),
            pattern: "buoys*.csv".to_string(),
            deployment_csv: PathBuf::from("in/deployment-area.csv"),
            operational_csv: PathBuf::from("in/operational-area.csv"),
            out_dir: PathBuf::from("out"),
            active_days: 7,
            geojson: false,
            now: day(20),
        }
    }

    #[test]
    fn run_merges_classifies_and_partitions() {
        let store = MemoryStore {
            initial: Some(Ok(Archive::from_fixes(vec![Fix::new("OLD", day(1), 0.0, 0.0)]))),
            ..MemoryStore::default()
        };
        let persisted = store.persisted.clone();
        let counted = Rc::new(RefCell::new(None));
        let pipeline = Pipeline::new(
            Box::new(FixedBatch(vec![
                Fix::new("FAD-1", day(18), 0.5, 0.5),
                Fix::new("FAD-1", day(19), 5.0, 5.0),
            ])),
            Box::new(SquareOnly),
            Box::new(store),
            vec![Box::new(FailingWriter), Box::new(CountingWriter(counted.clone()))],
        );

        let report = pipeline.run(&options()).unwrap();

        assert_eq!(report.archive, ArchiveOutcome::Appended);
        assert_eq!(report.total_records, 3);
        assert_eq!(report.in_area_records, 2);
        assert_eq!(report.active, vec![EntityId::new("FAD-1")]);
        assert_eq!(report.inactive.len(), 1);
        assert_eq!(report.inactive[0].entity_id.as_str(), "OLD");
        assert_eq!(report.cutoff, day(13));
        assert_eq!(report.outputs, vec![PathBuf::from("out/counted")]);
        assert!(report.areas[0].available);
        assert!(!report.areas[1].available);

        assert!(matches!(
            report.warnings[0],
            RunWarning::PolygonUnavailable { area: AreaKind::Operational, .. }
        ));
        assert_eq!(report.warnings[1], RunWarning::RowsDropped { count: 1 });
        assert!(matches!(
            &report.warnings[2],
            RunWarning::WriterFailed { writer: "broken", .. }
        ));

        let archive = persisted.borrow().clone().unwrap();
        assert_eq!(archive.fixes()[0].timestamp, day(19));
        assert!(!archive.fixes()[0].in_area);
        assert!(archive.fixes()[1].in_area);
        assert_eq!(*counted.borrow(), Some((1, 1)));
    }

    #[test]
    fn corrupt_archive_is_discarded() {
        let store = MemoryStore {
            initial: Some(Err("line 2: bad timestamp".to_string())),
            ..MemoryStore::default()
        };
        let pipeline = Pipeline::new(
            Box::new(FixedBatch(vec![Fix::new("FAD-1", day(19), 0.0, 0.0)])),
            Box::new(SquareOnly),
            Box::new(store),
            Vec::new(),
        );

        let report = pipeline.run(&options()).unwrap();

        assert_eq!(report.archive, ArchiveOutcome::Discarded);
        assert_eq!(report.total_records, 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, RunWarning::ArchiveDiscarded { .. })));
    }

    #[test]
    fn nothing_to_process_aborts_before_persisting() {
        let store = MemoryStore::default();
        let persisted = store.persisted.clone();
        let pipeline = Pipeline::new(
            Box::new(FixedBatch(Vec::new())),
            Box::new(SquareOnly),
            Box::new(store),
            Vec::new(),
        );

        let err = pipeline.run(&options()).unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(persisted.borrow().is_none());
    }

    #[test]
    fn standard_pipeline_includes_geojson_on_request() {
        let mut opts = options();
        assert_eq!(Pipeline::standard(&opts).writers.len(), 2);
        opts.geojson = true;
        let names: Vec<_> = Pipeline::standard(&opts)
            .writers
            .iter()
            .map(|w| w.name())
            .collect();
        assert_eq!(names, vec!["csv", "kml", "geojson"]);
    }

    #[test]
    fn warnings_render_for_humans() {
        let warning = RunWarning::RowsDropped { count: 3 };
        assert_eq!(warning.to_string(), "3 malformed batch rows dropped");
    }
}
