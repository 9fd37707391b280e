//! Physical bodies and ellipse geometry
//!
//! Every body is approximated by an axis-aligned ellipse (in its own frame)
//! whose axes are the body's width and height, rotated by the heading angle.
//! Proximity is checked in two stages: a cheap bounding-circle test, then
//! the oriented ellipse separation along the line between centers.

use glam::DVec2;
use serde::Serialize;

use super::camera::Camera;
use super::cloud::Cloud;
use super::hoop::Hoop;
use super::pegasus::Pegasus;
use crate::direction;

/// Shared physical state of every entity
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    /// World-space center
    pub position: DVec2,
    /// Heading in radians, kept in (-π, π]
    pub angle: f64,
    /// World-space velocity
    pub velocity: DVec2,
    /// Full width/height, fixed after construction
    size: DVec2,
    /// (max(size) / 2)², cached for the proximity pre-test
    bounding_radius_sq: f64,
}

impl Body {
    pub fn new(position: DVec2, size: DVec2, angle: f64) -> Self {
        let radius = size.max_element() / 2.0;
        Self {
            position,
            angle,
            velocity: DVec2::ZERO,
            size,
            bounding_radius_sq: radius * radius,
        }
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.size
    }

    #[inline]
    pub fn bounding_radius_sq(&self) -> f64 {
        self.bounding_radius_sq
    }

    /// Distance from center to the silhouette along a world bearing
    #[inline]
    pub fn radius_toward(&self, bearing: f64) -> f64 {
        ellipse_radius(self.size / 2.0, bearing - self.angle)
    }
}

/// Radius of an ellipse with the given full extents along `angle`.
///
/// `size` is the full width/height; the semi-axes are half of it.
#[inline]
pub fn ellipse_radius_at_angle(size: DVec2, angle: f64) -> f64 {
    DVec2::new(angle.cos() * size.x / 2.0, angle.sin() * size.y / 2.0).length()
}

/// Radius of an ellipse with the given semi-axes along `angle`.
#[inline]
pub fn ellipse_radius(semi_axes: DVec2, angle: f64) -> f64 {
    DVec2::new(angle.cos() * semi_axes.x, angle.sin() * semi_axes.y).length()
}

/// Bounding-circle pre-filter.
///
/// Over-approximates: never misses a real overlap but may report pairs
/// whose ellipses are still apart. Absent bodies are never nearby.
pub fn are_nearby(a: Option<&Body>, b: Option<&Body>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            (b.position - a.position).length_squared()
                - a.bounding_radius_sq
                - b.bounding_radius_sq
                <= 0.0
        }
        _ => false,
    }
}

/// Signed separation between two oriented ellipses along the center line.
///
/// Negative means overlapping, zero touching, positive the gap. Absent
/// bodies are infinitely far apart.
pub fn distance(a: Option<&Body>, b: Option<&Body>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return f64::INFINITY;
    };
    let bearing = direction(b.position - a.position);
    let ra = a.radius_toward(bearing);
    let rb = b.radius_toward(bearing);
    (a.position - b.position).length() - ra - rb
}

/// Kind-specific state and behavior
#[derive(Debug, Clone, Serialize)]
pub enum EntityKind {
    Pegasus(Pegasus),
    Cloud(Cloud),
    Hoop(Hoop),
    Camera(Camera),
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Pegasus(_) => "pegasus",
            EntityKind::Cloud(_) => "cloud",
            EntityKind::Hoop(_) => "hoop",
            EntityKind::Camera(_) => "camera",
        }
    }
}

/// A placed entity: shared body plus kind-specific data
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub name: Option<String>,
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self {
            name: None,
            body,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn as_pegasus(&self) -> Option<&Pegasus> {
        match &self.kind {
            EntityKind::Pegasus(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hoop(&self) -> Option<&Hoop> {
        match &self.kind {
            EntityKind::Hoop(h) => Some(h),
            _ => None,
        }
    }
}
