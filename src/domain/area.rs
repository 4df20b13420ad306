//! Operational area polygons and the boundary-inclusive containment test.
//!
//! Two areas are configured: the deployment area and the operational area.
//! Either may fail to load, so each is carried as an [`AreaState`] and an
//! unavailable area simply never matches.

use std::fmt;

use geo::{Intersects, LineString, Point, Polygon};
use serde::Serialize;

use super::error::RingError;
use super::Fix;

/// Which of the two configured areas a polygon describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Deployment,
    Operational,
}

impl AreaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Operational => "operational",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed polygon ring in decimal degrees, `(lon, lat)` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    kind: AreaKind,
    polygon: Polygon<f64>,
}

impl Area {
    /// Build an area from `(lon, lat)` vertices, closing the ring if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RingError`] when a vertex is not finite or the ring has
    /// fewer than three distinct vertices.
    pub fn from_vertices(kind: AreaKind, mut vertices: Vec<(f64, f64)>) -> Result<Self, RingError> {
        if let Some(index) = vertices
            .iter()
            .position(|(lon, lat)| !lon.is_finite() || !lat.is_finite())
        {
            return Err(RingError::NonFiniteVertex { index });
        }

        let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(vertices.len());
        for vertex in &vertices {
            if !distinct.contains(vertex) {
                distinct.push(*vertex);
            }
        }
        if distinct.len() < 3 {
            return Err(RingError::TooFewVertices {
                distinct: distinct.len(),
            });
        }

        if vertices.first() != vertices.last() {
            vertices.push(vertices[0]);
        }

        Ok(Self {
            kind,
            polygon: Polygon::new(LineString::from(vertices), vec![]),
        })
    }

    #[must_use]
    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    /// Closed ring vertices, first equal to last.
    pub fn ring(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.polygon.exterior().coords().map(|c| (c.x, c.y))
    }

    /// Inside or exactly on the boundary.
    #[must_use]
    pub fn covers(&self, point: Point<f64>) -> bool {
        self.polygon.intersects(&point.0)
    }
}

/// An area that may or may not have loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaState {
    Available(Area),
    Unavailable { kind: AreaKind, reason: String },
}

impl AreaState {
    pub fn unavailable(kind: AreaKind, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            kind,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> AreaKind {
        match self {
            Self::Available(area) => area.kind(),
            Self::Unavailable { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// An unavailable area covers nothing.
    #[must_use]
    pub fn covers(&self, point: Point<f64>) -> bool {
        match self {
            Self::Available(area) => area.covers(point),
            Self::Unavailable { .. } => false,
        }
    }
}

/// The pair of areas a run classifies against.
#[derive(Debug, Clone, PartialEq)]
pub struct Areas {
    pub deployment: AreaState,
    pub operational: AreaState,
}

impl Areas {
    #[must_use]
    pub fn new(deployment: AreaState, operational: AreaState) -> Self {
        Self {
            deployment,
            operational,
        }
    }

    /// Both areas unavailable for the same reason.
    pub fn none(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            deployment: AreaState::unavailable(AreaKind::Deployment, reason.clone()),
            operational: AreaState::unavailable(AreaKind::Operational, reason),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaState> {
        [&self.deployment, &self.operational].into_iter()
    }
}

/// True iff `point` lies inside or on the boundary of either area.
#[must_use]
pub fn classify(point: Point<f64>, deployment: &AreaState, operational: &AreaState) -> bool {
    deployment.covers(point) || operational.covers(point)
}

/// Recompute `in_area` for every fix. Returns how many fixes are in an area.
pub fn classify_fixes(fixes: &mut [Fix], areas: &Areas) -> usize {
    let mut inside = 0;
    for fix in fixes.iter_mut() {
        fix.in_area = classify(
            Point::new(fix.lon, fix.lat),
            &areas.deployment,
            &areas.operational,
        );
        if fix.in_area {
            inside += 1;
        }
    }
    inside
}
