//! KML 2.2 map layers: latest-position pins and per-entity tracks.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::adapter::outbound::fs::write_atomic;
use crate::adapter::outbound::tabular::archive::format_timestamp;
use crate::domain::{EntityId, Fix};
use crate::error::{Error, Result};
use crate::port::outbound::render::{Snapshot, SnapshotWriter};

pub const LATEST_FILE: &str = "latest_positions.kml";
pub const TRACKS_FILE: &str = "tracks.kml";

const RED_PIN: &str = "http://maps.google.com/mapfiles/kml/pushpin/red-pushpin.png";
const YELLOW_PIN: &str = "http://maps.google.com/mapfiles/kml/pushpin/ylw-pushpin.png";

/// Escape `&`, `<` and `>` for element text.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_document(out: &mut String, name: &str) {
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n<Document>\n");
    let _ = writeln!(out, "<name>{}</name>", escape(name));
}

fn close_document(out: &mut String) {
    out.push_str("</Document>\n</kml>\n");
}

fn pin_style(out: &mut String, id: &str, scale: &str, href: &str) {
    let _ = writeln!(
        out,
        "  <Style id=\"{id}\"><IconStyle><scale>{scale}</scale><Icon><href>{href}</href></Icon></IconStyle></Style>"
    );
}

/// One pin per latest fix, red when inside an area.
#[must_use]
pub fn render_latest(latest: &[Fix]) -> String {
    let mut out = String::new();
    open_document(&mut out, "Latest FAD Positions");
    pin_style(&mut out, "redPin", "1.1", RED_PIN);
    pin_style(&mut out, "defPin", "1.0", YELLOW_PIN);

    for fix in latest {
        let style = if fix.in_area { "#redPin" } else { "#defPin" };

        let mut description = format!("timestamp: {}\n", format_timestamp(&fix.timestamp));
        if let Some(speed) = fix.speed {
            let _ = writeln!(description, "speed_kn: {speed}");
        }
        if let Some(course) = fix.course {
            let _ = writeln!(description, "course_deg: {course}");
        }

        out.push_str("<Placemark>\n");
        let _ = writeln!(out, "  <name>{}</name>", escape(fix.entity_id.as_str()));
        let _ = writeln!(out, "  <styleUrl>{style}</styleUrl>");
        let _ = writeln!(out, "  <description>{}</description>", escape(&description));
        let _ = writeln!(
            out,
            "  <Point><coordinates>{},{},0</coordinates></Point>",
            fix.lon, fix.lat
        );
        out.push_str("</Placemark>\n");
    }

    close_document(&mut out);
    out
}

/// One tessellated line per entity with at least two fixes.
#[must_use]
pub fn render_tracks<'a>(tracks: impl IntoIterator<Item = (&'a EntityId, &'a Vec<Fix>)>) -> String {
    let mut out = String::new();
    open_document(&mut out, "FAD Tracks");

    for (entity_id, fixes) in tracks {
        if fixes.len() < 2 {
            continue;
        }
        out.push_str("<Placemark>\n");
        let _ = writeln!(out, "  <name>{}</name>", escape(entity_id.as_str()));
        out.push_str("  <LineString>\n    <tessellate>1</tessellate>\n    <coordinates>\n");
        for fix in fixes {
            let _ = writeln!(out, "      {},{},0", fix.lon, fix.lat);
        }
        out.push_str("    </coordinates>\n  </LineString>\n");
        out.push_str("</Placemark>\n");
    }

    close_document(&mut out);
    out
}

/// Writes `latest_positions.kml` and `tracks.kml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmlWriter;

impl SnapshotWriter for KmlWriter {
    fn name(&self) -> &'static str {
        "kml"
    }

    fn write(&self, snapshot: &Snapshot<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let latest = out_dir.join(LATEST_FILE);
        write_atomic(&latest, render_latest(snapshot.latest).as_bytes())
            .map_err(Error::writing(&latest))?;

        let tracks = out_dir.join(TRACKS_FILE);
        write_atomic(&tracks, render_tracks(snapshot.tracks).as_bytes())
            .map_err(Error::writing(&tracks))?;

        Ok(vec![latest, tracks])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::tracks;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape("A&B <x>"), "A&amp;B &lt;x&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn latest_pins_use_area_style() {
        let mut inside = Fix::new("FAD<1>", at(6), -3.5, 10.5)
            .with_speed(Some(0.8))
            .with_course(Some(145.0));
        inside.in_area = true;
        let outside = Fix::new("FAD-2", at(7), -5.0, 12.25);

        let kml = render_latest(&[inside, outside]);

        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(kml.contains("<name>Latest FAD Positions</name>"));
        assert!(kml.contains("<name>FAD&lt;1&gt;</name>\n  <styleUrl>#redPin</styleUrl>"));
        assert!(kml.contains("<name>FAD-2</name>\n  <styleUrl>#defPin</styleUrl>"));
        assert!(kml.contains(
            "<description>timestamp: 2025-06-10 06:00:00\nspeed_kn: 0.8\ncourse_deg: 145\n</description>"
        ));
        assert!(kml.contains("<description>timestamp: 2025-06-10 07:00:00\n</description>"));
        assert!(kml.contains("<coordinates>12.25,-5,0</coordinates>"));
        assert_eq!(kml.matches("<Placemark>").count(), 2);
        assert!(kml.ends_with("</Document>\n</kml>\n"));
    }

    #[test]
    fn tracks_skip_single_fix_entities() {
        let fixes = vec![
            Fix::new("FAD-1", at(8), -3.0, 10.0),
            Fix::new("FAD-1", at(6), -3.2, 10.1),
            Fix::new("FAD-2", at(7), -4.0, 11.0),
        ];
        let grouped = tracks(&fixes);

        let kml = render_tracks(&grouped);

        assert!(kml.contains("<name>FAD Tracks</name>"));
        assert!(kml.contains("<name>FAD-1</name>"));
        assert!(!kml.contains("<name>FAD-2</name>"));
        assert!(kml.contains("<tessellate>1</tessellate>"));
        let first = kml.find("10.1,-3.2,0").unwrap();
        let second = kml.find("10,-3,0").unwrap();
        assert!(first < second, "track must be chronological");
    }

    #[test]
    fn writer_produces_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let latest = vec![Fix::new("FAD-1", at(6), -3.5, 10.5)];
        let grouped = tracks(&latest);
        let snapshot = Snapshot {
            latest: &latest,
            active: &latest,
            tracks: &grouped,
            inactive: &[],
        };

        let written = KmlWriter.write(&snapshot, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join(LATEST_FILE), dir.path().join(TRACKS_FILE)]
        );
        let tracks_kml = std::fs::read_to_string(dir.path().join(TRACKS_FILE)).unwrap();
        assert!(!tracks_kml.contains("<Placemark>"));
    }
}
