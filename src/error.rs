use std::path::PathBuf;

use thiserror::Error;

use crate::domain::error::{FormatError, RingError};
use crate::domain::AreaKind;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// The existing archive could not be read back.
///
/// Never fatal: the archive is discarded for the run and the batch alone
/// becomes the new archive.
#[derive(Error, Debug)]
#[error("archive {} is unreadable: {reason}", path.display())]
pub struct ArchiveCorruptError {
    pub path: PathBuf,
    pub reason: String,
}

/// Why an area polygon could not be loaded.
#[derive(Error, Debug)]
pub enum PolygonProblem {
    #[error("cannot read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[source] csv::Error),

    #[error("no latitude column (expected lat or latitude)")]
    MissingLatitudeColumn,

    #[error("no longitude column (expected long, lon or longitude)")]
    MissingLongitudeColumn,

    #[error("row {row}: {source}")]
    Vertex {
        row: usize,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Ring(#[from] RingError),
}

/// An area polygon is unavailable for this run.
///
/// Never fatal: the area contributes no matches to classification.
#[derive(Error, Debug)]
#[error("{kind} area {} unavailable: {problem}", path.display())]
pub struct PolygonUnavailableError {
    pub kind: AreaKind,
    pub path: PathBuf,
    #[source]
    pub problem: PolygonProblem,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no FAD CSV files match: {pattern}")]
    NoInputFiles { pattern: String },

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for a fatal error.
    ///
    /// Nothing-to-process exits with 2, everything else with 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoInputFiles { .. } => 2,
            _ => 1,
        }
    }

    /// Attach the output path a writer was producing.
    pub fn writing(path: impl Into<PathBuf>) -> impl FnOnce(Error) -> Error {
        let path = path.into();
        move |source| Error::Output {
            path,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
