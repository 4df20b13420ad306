//! Tabular snapshot outputs: latest positions and inactive entities.

use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use super::archive::{fixes_to_csv, format_timestamp};
use crate::adapter::outbound::fs::write_atomic;
use crate::domain::LastSeen;
use crate::error::{Error, Result};
use crate::port::outbound::render::{Snapshot, SnapshotWriter};

pub const LATEST_FILE: &str = "latest_positions.csv";
pub const INACTIVE_FILE: &str = "inactive_buoys.csv";

/// Writes `latest_positions.csv` and `inactive_buoys.csv`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableWriter;

fn inactive_to_csv(inactive: &[LastSeen]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(["entity_id", "last_seen"])?;
    for entry in inactive {
        let last_seen = format_timestamp(&entry.last_seen);
        writer.write_record([entry.entity_id.as_str(), last_seen.as_str()])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

impl SnapshotWriter for CsvTableWriter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, snapshot: &Snapshot<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let latest = out_dir.join(LATEST_FILE);
        let bytes = fixes_to_csv(snapshot.latest).map_err(Error::writing(&latest))?;
        write_atomic(&latest, &bytes).map_err(Error::writing(&latest))?;

        let inactive = out_dir.join(INACTIVE_FILE);
        let bytes = inactive_to_csv(snapshot.inactive).map_err(Error::writing(&inactive))?;
        write_atomic(&inactive, &bytes).map_err(Error::writing(&inactive))?;

        Ok(vec![latest, inactive])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Fix};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::fs;

    #[test]
    fn writes_both_tables_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let day = |d| {
            NaiveDate::from_ymd_opt(2025, 6, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        let latest = vec![Fix::new("FAD-1", day(10), -3.5, 10.5).with_speed(Some(1.5))];
        let inactive = vec![LastSeen {
            entity_id: EntityId::new("FAD-9"),
            last_seen: day(1),
        }];
        let tracks = BTreeMap::new();
        let snapshot = Snapshot {
            latest: &latest,
            active: &latest,
            tracks: &tracks,
            inactive: &inactive,
        };

        let written = CsvTableWriter.write(&snapshot, dir.path()).unwrap();
        assert_eq!(written.len(), 2);

        let latest_text = fs::read_to_string(dir.path().join(LATEST_FILE)).unwrap();
        assert_eq!(
            latest_text,
            "entity_id,timestamp,lat,lon,speed,course,in_area\n\
             FAD-1,2025-06-10 12:00:00,-3.5,10.5,1.5,,false\n"
        );

        let inactive_text = fs::read_to_string(dir.path().join(INACTIVE_FILE)).unwrap();
        assert_eq!(inactive_text, "entity_id,last_seen\nFAD-9,2025-06-01 12:00:00\n");
    }

    #[test]
    fn empty_snapshot_still_writes_headers() {
        let dir = tempfile::tempdir().unwrap();
        let tracks = BTreeMap::new();
        let snapshot = Snapshot {
            latest: &[],
            active: &[],
            tracks: &tracks,
            inactive: &[],
        };

        CsvTableWriter.write(&snapshot, dir.path()).unwrap();

        let inactive_text = fs::read_to_string(dir.path().join(INACTIVE_FILE)).unwrap();
        assert_eq!(inactive_text, "entity_id,last_seen\n");
    }
}
