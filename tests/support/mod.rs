#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use fadtrack::application::RunOptions;

pub const BATCH_HEADER: &str = "NAME;DATE;LATITUDE;LONGITUDE;SPEED;COURSE;\n";

/// Deployment area: 3°S..4°S, 10°E..11°E.
pub const DEPLOYMENT_SHEET: &str = "Lat,Long\n\
    3°00'00\"S,10°00'00\"E\n\
    3°00'00\"S,11°00'00\"E\n\
    4°00'00\"S,11°00'00\"E\n\
    4°00'00\"S,10°00'00\"E\n";

/// Operational area: 5°S..6°S, 12°E..13°E, left unclosed on purpose.
pub const OPERATIONAL_SHEET: &str = "latitude,longitude\n\
    5°0'0\"S,12°0'0\"E\n\
    5°0'0\"S,13°0'0\"E\n\
    6°0'0\"S,13°0'0\"E\n";

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// One batch row in the export layout.
pub fn row(id: &str, ts: NaiveDateTime, lat: f64, lon: f64) -> String {
    format!("{id};{};{lat};{lon};0.5;90;\n", ts.format("%d/%m/%Y %H:%M:%S"))
}

pub fn batch(rows: &[String]) -> String {
    let mut text = BATCH_HEADER.to_string();
    for r in rows {
        text.push_str(r);
    }
    text
}

/// Input and output directories for one scenario.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("in")).expect("create input dir");
        Self { dir }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn out(&self, name: &str) -> PathBuf {
        self.out_dir().join(name)
    }

    pub fn write_input(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.input_dir().join(name);
        fs::write(&path, contents).expect("write input file");
        path
    }

    pub fn with_areas(self) -> Self {
        self.write_input("deployment-area.csv", DEPLOYMENT_SHEET);
        self.write_input("operational-area.csv", OPERATIONAL_SHEET);
        self
    }

    pub fn options(&self, now: NaiveDateTime) -> RunOptions {
        RunOptions {
            inputs: Vec::new(),
            input_dir: self.input_dir(),
            pattern: "buoys*.csv".to_string(),
            deployment_csv: self.input_dir().join("deployment-area.csv"),
            operational_csv: self.input_dir().join("operational-area.csv"),
            out_dir: self.out_dir(),
            active_days: 7,
            geojson: true,
            now,
        }
    }

    pub fn read_out(&self, name: &str) -> String {
        fs::read_to_string(self.out(name)).expect("read output file")
    }
}

/// Data lines of a CSV output (header skipped).
pub fn data_lines(text: &str) -> Vec<&str> {
    text.lines().skip(1).collect()
}

pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// Local wall-clock time `days` ago.
pub fn days_ago(days: i64) -> NaiveDateTime {
    chrono::Local::now().naive_local() - Duration::days(days)
}
