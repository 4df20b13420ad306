//! Application services (use cases).
//!
//! The pipeline orchestrates domain logic and coordinates the outbound
//! adapters through their ports.

pub mod pipeline;

pub use pipeline::{ArchiveOutcome, Pipeline, RunOptions, RunReport, RunWarning};
