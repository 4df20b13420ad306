//! CSV persistence for the cumulative archive (`all_points.csv`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::adapter::outbound::fs::{decode_text, write_atomic};
use crate::domain::{Archive, EntityId, Fix};
use crate::error::{ArchiveCorruptError, Result};
use crate::port::outbound::store::{ArchiveLoad, ArchiveStore};

/// Archive file name inside the output directory.
pub const ARCHIVE_FILE: &str = "all_points.csv";

/// Column order shared by the archive and the latest-positions table.
pub const FIX_COLUMNS: [&str; 7] = [
    "entity_id",
    "timestamp",
    "lat",
    "lon",
    "speed",
    "course",
    "in_area",
];

/// Timestamp layout written to CSV outputs.
const TIMESTAMP_WRITE: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layouts accepted when reading timestamps back.
const TIMESTAMP_READ: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Format a timestamp the way every CSV output writes it.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_WRITE).to_string()
}

/// Parse a timestamp written by [`format_timestamp`] or an ISO-like variant.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_READ
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}

mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
    }
}

/// Accept `true`/`True`/`1` style flags; blank means false.
fn deserialize_flag<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid flag {other:?}"))),
    }
}

/// One CSV row of the archive or the latest-positions table.
///
/// Aliases accept archives written with the older `buoy_id` /
/// `speed_kn` / `course_deg` headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    #[serde(alias = "buoy_id")]
    pub entity_id: String,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, alias = "speed_kn")]
    pub speed: Option<f64>,
    #[serde(default, alias = "course_deg")]
    pub course: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub in_area: bool,
}

impl From<&Fix> for FixRecord {
    fn from(fix: &Fix) -> Self {
        Self {
            entity_id: fix.entity_id.to_string(),
            timestamp: fix.timestamp,
            lat: fix.lat,
            lon: fix.lon,
            speed: fix.speed,
            course: fix.course,
            in_area: fix.in_area,
        }
    }
}

impl FixRecord {
    fn into_fix(self) -> std::result::Result<Fix, String> {
        let entity_id =
            EntityId::parse(&self.entity_id).ok_or_else(|| "blank entity_id".to_string())?;
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(format!("non-finite position for {entity_id}"));
        }

        let mut fix = Fix::new(entity_id, self.timestamp, self.lat, self.lon)
            .with_speed(self.speed.filter(|v| v.is_finite()))
            .with_course(self.course.filter(|v| v.is_finite()));
        fix.in_area = self.in_area;
        Ok(fix)
    }
}

/// Serialize fixes with the fixed column header, even when empty.
pub fn fixes_to_csv<'a>(fixes: impl IntoIterator<Item = &'a Fix>) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(FIX_COLUMNS)?;
    for fix in fixes {
        writer.serialize(FixRecord::from(fix))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Parse archive CSV text. Any bad row rejects the whole archive.
pub fn parse_archive(text: &str) -> std::result::Result<Archive, String> {
    if text.trim().is_empty() {
        return Err("file is empty".to_string());
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());
    let mut fixes = Vec::new();
    for (index, record) in reader.deserialize::<FixRecord>().enumerate() {
        let row = index + 2;
        let record = record.map_err(|e| format!("line {row}: {e}"))?;
        fixes.push(record.into_fix().map_err(|e| format!("line {row}: {e}"))?);
    }
    Ok(Archive::from_fixes(fixes))
}

/// The archive as a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvArchiveStore {
    path: PathBuf,
}

impl CsvArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<out_dir>/all_points.csv`.
    pub fn in_dir(out_dir: &Path) -> Self {
        Self::new(out_dir.join(ARCHIVE_FILE))
    }

    fn corrupt(&self, reason: impl Into<String>) -> ArchiveLoad {
        ArchiveLoad::Corrupt(ArchiveCorruptError {
            path: self.path.clone(),
            reason: reason.into(),
        })
    }
}

impl ArchiveStore for CsvArchiveStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ArchiveLoad {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return ArchiveLoad::Missing,
            Err(e) => return self.corrupt(e.to_string()),
        };

        match parse_archive(&decode_text(&bytes)) {
            Ok(archive) => {
                debug!(path = %self.path.display(), records = archive.len(), "archive loaded");
                ArchiveLoad::Loaded(archive)
            }
            Err(reason) => self.corrupt(reason),
        }
    }

    fn persist(&self, archive: &Archive) -> Result<()> {
        let bytes = fixes_to_csv(archive.fixes())?;
        write_atomic(&self.path, &bytes)?;
        debug!(path = %self.path.display(), records = archive.len(), "archive written");
        Ok(())
    }
}
