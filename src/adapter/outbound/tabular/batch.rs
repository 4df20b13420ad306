//! Semicolon-delimited buoy batch exports.
//!
//! Exports look like:
//!
//! ```text
//! NAME;DATE;LATITUDE;LONGITUDE;SPEED;COURSE;
//! FAD-001;01/06/2025 06:00:00;-3.75;10.49;0.8;145;
//! ```
//!
//! The trailing semicolon yields an empty seventh field which is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::adapter::outbound::discovery::resolve_inputs;
use crate::adapter::outbound::fs::decode_text;
use crate::domain::{EntityId, Fix};
use crate::error::Result;
use crate::port::outbound::source::{BatchLoad, FixSource};

/// Timestamp layout used by the buoy exports.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const NAME: usize = 0;
const DATE: usize = 1;
const LATITUDE: usize = 2;
const LONGITUDE: usize = 3;
const SPEED: usize = 4;
const COURSE: usize = 5;

/// Reads `buoys*.csv` style exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemicolonBatchReader;

impl FixSource for SemicolonBatchReader {
    fn locate(&self, explicit: &[PathBuf], dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        resolve_inputs(explicit, dir, pattern)
    }

    fn load(&self, paths: &[PathBuf]) -> Result<BatchLoad> {
        let mut sorted = paths.to_vec();
        sorted.sort();

        let mut load = BatchLoad::default();
        for path in sorted {
            load.absorb(load_file(&path)?);
        }
        Ok(load)
    }
}

fn load_file(path: &Path) -> Result<BatchLoad> {
    let bytes = fs::read(path)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut load = parse_batch(&decode_text(&bytes), &source);
    load.files.push(path.to_path_buf());

    debug!(
        file = %source,
        rows = load.rows_read,
        dropped = load.rows_dropped,
        "batch file loaded"
    );
    Ok(load)
}

/// Parse one export. The first row is a header and is skipped.
#[must_use]
pub fn parse_batch(text: &str, source: &str) -> BatchLoad {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut load = BatchLoad::default();
    for (index, record) in reader.records().enumerate() {
        load.rows_read += 1;
        match record {
            Ok(record) => match parse_row(&record) {
                Some(fix) => load.fixes.push(fix.with_source(source)),
                None => load.rows_dropped += 1,
            },
            Err(e) => {
                warn!(file = %source, row = index + 2, error = %e, "unreadable batch row");
                load.rows_dropped += 1;
            }
        }
    }
    load
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

/// Finite number or nothing.
fn number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// A fix, or `None` when a required field is blank or unparseable.
fn parse_row(record: &StringRecord) -> Option<Fix> {
    let entity_id = EntityId::parse(field(record, NAME))?;
    let timestamp = NaiveDateTime::parse_from_str(field(record, DATE), TIMESTAMP_FORMAT).ok()?;
    let lat = number(field(record, LATITUDE))?;
    let lon = number(field(record, LONGITUDE))?;

    Some(
        Fix::new(entity_id, timestamp, lat, lon)
            .with_speed(number(field(record, SPEED)))
            .with_course(number(field(record, COURSE))),
    )
}
