//! Outbound adapters (driven side).

pub mod discovery;
pub mod fs;
pub mod geojson;
pub mod kml;
pub mod tabular;
