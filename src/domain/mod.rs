//! Source-agnostic domain logic: fixes, areas, archive merge and activity.

mod fix;
mod ids;

pub mod activity;
pub mod archive;
pub mod area;
pub mod coordinate;
pub mod error;

// Core domain types
pub use fix::{Fix, FixKey};
pub use ids::EntityId;

// Derived views and geometry
pub use activity::{ActivityPartition, ActivityWindow, LastSeen};
pub use archive::Archive;
pub use area::{Area, AreaKind, AreaState, Areas};
