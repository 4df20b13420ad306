//! GeoJSON FeatureCollections for GIS tools.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::adapter::outbound::fs::write_atomic;
use crate::adapter::outbound::tabular::archive::format_timestamp;
use crate::domain::{EntityId, Fix};
use crate::error::{Error, Result};
use crate::port::outbound::render::{Snapshot, SnapshotWriter};

pub const POINTS_FILE: &str = "all_points.geojson";
pub const LATEST_FILE: &str = "latest_positions.geojson";
pub const TRACKS_FILE: &str = "tracks.geojson";

fn collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn point_feature(fix: &Fix) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [fix.lon, fix.lat],
        },
        "properties": {
            "entity_id": fix.entity_id.as_str(),
            "timestamp": format_timestamp(&fix.timestamp),
            "speed": fix.speed,
            "course": fix.course,
            "in_area": fix.in_area,
        },
    })
}

/// Point features in the given order.
#[must_use]
pub fn points(fixes: &[Fix]) -> Value {
    collection(fixes.iter().map(point_feature).collect())
}

/// LineString features for entities with at least two fixes.
#[must_use]
pub fn track_lines(tracks: &BTreeMap<EntityId, Vec<Fix>>) -> Value {
    let features = tracks
        .iter()
        .filter_map(|(entity_id, fixes)| {
            let (first, last) = match fixes.as_slice() {
                [first, .., last] => (first, last),
                _ => return None,
            };
            let coordinates: Vec<[f64; 2]> = fixes.iter().map(|f| [f.lon, f.lat]).collect();
            Some(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "entity_id": entity_id.as_str(),
                    "start_time": format_timestamp(&first.timestamp),
                    "end_time": format_timestamp(&last.timestamp),
                    "n_points": fixes.len(),
                },
            }))
        })
        .collect();
    collection(features)
}

/// Writes the three GeoJSON layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonWriter;

fn write_layer(path: PathBuf, layer: &Value) -> Result<PathBuf> {
    let bytes = serde_json::to_vec_pretty(layer)
        .map_err(Error::from)
        .map_err(Error::writing(&path))?;
    write_atomic(&path, &bytes).map_err(Error::writing(&path))?;
    Ok(path)
}

impl SnapshotWriter for GeoJsonWriter {
    fn name(&self) -> &'static str {
        "geojson"
    }

    fn write(&self, snapshot: &Snapshot<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(vec![
            write_layer(out_dir.join(POINTS_FILE), &points(snapshot.active))?,
            write_layer(out_dir.join(LATEST_FILE), &points(snapshot.latest))?,
            write_layer(out_dir.join(TRACKS_FILE), &track_lines(snapshot.tracks))?,
        ])
    }
}
