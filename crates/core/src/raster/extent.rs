//! Georeferenced bounding rectangles

use serde::{Deserialize, Serialize};

/// Axis-aligned georeferenced bounding rectangle.
///
/// Overlap testing is strict: two extents that merely share an edge (zero-area
/// overlap) do NOT intersect. Compositing inherits this rule, so a raster that
/// only touches a block contributes nothing to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width in georeferenced units
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in georeferenced units
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest extent covering both `self` and `other`
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Strict overlap test: touching edges do not count as overlap.
    pub fn intersects(&self, other: &Extent) -> bool {
        !(self.min_x >= other.max_x
            || self.max_x <= other.min_x
            || self.min_y >= other.max_y
            || self.max_y <= other.min_y)
    }

    /// Overlapping region, or `None` when disjoint under the strict test
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        if !self.intersects(other) {
            return None;
        }
        Some(Extent {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }
}
