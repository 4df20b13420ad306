//! Positional fixes reported by tracked buoys.

use chrono::NaiveDateTime;

use super::EntityId;

/// Key that identifies a fix in the archive: one row per entity and instant.
pub type FixKey = (EntityId, NaiveDateTime);

/// One timestamped position report for a tracked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub entity_id: EntityId,
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    /// Speed over ground in knots, when the export carried one.
    pub speed: Option<f64>,
    /// Course over ground in degrees, when the export carried one.
    pub course: Option<f64>,
    /// Inside or on the boundary of a configured area. Recomputed every run.
    pub in_area: bool,
    /// File name of the batch this fix was read from. Not persisted.
    pub source: Option<String>,
}

impl Fix {
    /// Create an unclassified fix with no optional attributes.
    pub fn new(
        entity_id: impl Into<EntityId>,
        timestamp: NaiveDateTime,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            lat,
            lon,
            speed: None,
            course: None,
            in_area: false,
            source: None,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_course(mut self, course: Option<f64>) -> Self {
        self.course = course;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The archive deduplication key.
    pub fn key(&self) -> FixKey {
        (self.entity_id.clone(), self.timestamp)
    }
}
