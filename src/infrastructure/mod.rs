//! Infrastructure layer: configuration and process-wide setup.

pub mod config;
