//! Area polygon sheets: comma-delimited with a latitude and a longitude column.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::adapter::outbound::fs::decode_text;
use crate::domain::coordinate::dms_to_dd;
use crate::domain::{Area, AreaKind};
use crate::error::{PolygonProblem, PolygonUnavailableError};
use crate::port::outbound::source::AreaSource;

const LATITUDE_COLUMNS: &[&str] = &["lat", "latitude"];
const LONGITUDE_COLUMNS: &[&str] = &["long", "lon", "longitude"];

/// Reads `deployment-area.csv` / `operational-area.csv` style sheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAreaSource;

impl AreaSource for CsvAreaSource {
    fn load(&self, kind: AreaKind, path: &Path) -> Result<Area, PolygonUnavailableError> {
        let unavailable = |problem| PolygonUnavailableError {
            kind,
            path: path.to_path_buf(),
            problem,
        };

        let bytes = fs::read(path).map_err(|e| unavailable(PolygonProblem::Read(e)))?;
        parse_area(kind, &decode_text(&bytes)).map_err(unavailable)
    }
}

/// Find the first candidate column, matching names case-insensitively.
fn resolve_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(candidate))
    })
}

/// Parse a polygon sheet into a closed ring.
pub fn parse_area(kind: AreaKind, text: &str) -> Result<Area, PolygonProblem> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(PolygonProblem::Csv)?.clone();
    let lat_column =
        resolve_column(&headers, LATITUDE_COLUMNS).ok_or(PolygonProblem::MissingLatitudeColumn)?;
    let lon_column =
        resolve_column(&headers, LONGITUDE_COLUMNS).ok_or(PolygonProblem::MissingLongitudeColumn)?;

    let mut vertices = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(PolygonProblem::Csv)?;
        let row = index + 1;
        let cell = |column: usize| record.get(column).unwrap_or("");

        let lon = dms_to_dd(cell(lon_column))
            .map_err(|source| PolygonProblem::Vertex { row, source })?;
        let lat = dms_to_dd(cell(lat_column))
            .map_err(|source| PolygonProblem::Vertex { row, source })?;
        vertices.push((lon, lat));
    }

    Ok(Area::from_vertices(kind, vertices)?)
}
