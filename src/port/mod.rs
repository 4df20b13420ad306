//! Trait definitions (hexagonal ports). Depend on domain types and crate errors.
//!
//! Ports define the I/O seams of the pipeline. Adapters implement them for
//! the concrete file formats; tests implement them in memory.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Batch + │            │   Archive   │              │ Snapshot  │
//! │  Area   │            │    Store    │              │  Writers  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`outbound::source::FixSource`], [`outbound::source::AreaSource`] - Input files
//! - [`outbound::store::ArchiveStore`] - Cumulative archive persistence
//! - [`outbound::render::SnapshotWriter`] - Map and tabular outputs

pub mod outbound;
