//! Fadtrack - cumulative position archives and map layers for drifting FADs.
//!
//! Batch exports of buoy (fish aggregating device) positions are merged into
//! a deduplicated archive. Every archived fix is classified against two
//! operational areas, entities are split into active and inactive by the
//! recency of their last fix, and the active set is rendered as CSV, KML and
//! GeoJSON.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Fixes, coordinates, areas, the archive merge and the
//!   activity window. Pure and I/O free.
//! - **`port`** - Traits at the I/O seams (batch and area sources, archive
//!   store, snapshot writers).
//! - **`adapter`** - CSV, KML and GeoJSON implementations of the ports, plus
//!   the command line.
//! - **`application`** - The [`application::Pipeline`] that runs one batch.
//! - **`infrastructure`** - TOML configuration and logging setup.
//!
//! # Example
//!
//! ```no_run
//! use fadtrack::application::Pipeline;
//! use fadtrack::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("fadtrack.toml")?;
//!     let now = chrono::Local::now().naive_local();
//!     let options = config.run_options(Vec::new(), now);
//!     let report = Pipeline::standard(&options).run(&options)?;
//!     println!("{} records, {} active", report.total_records, report.active.len());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
