//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the file-system dependencies of a run: batch
//! and area inputs, the archive, and the rendered outputs.

pub mod render;
pub mod source;
pub mod store;
