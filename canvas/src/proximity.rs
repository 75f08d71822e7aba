//! Endpoint proximity: is a point within `threshold` of a box?
//!
//! The test is an inflated containment check. The box is grown by
//! `threshold` on all four sides and the point must fall inside it, with
//! every comparison inclusive. At `threshold == 0` this is plain closed-box
//! containment.

#[cfg(test)]
#[path = "proximity_test.rs"]
mod proximity_test;

use crate::geometry::{BoundingBox, Point};

/// Per-side outcome of a proximity test. Each flag says the point has not
/// passed beyond that side of the inflated box.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sides {
    /// `point.x + threshold >= box.min_x`
    pub left: bool,
    /// `point.x <= box.max_x + threshold`
    pub right: bool,
    /// `point.y + threshold >= box.min_y`
    pub top: bool,
    /// `point.y <= box.max_y + threshold`
    pub bottom: bool,
}

impl Sides {
    #[must_use]
    pub fn all(self) -> bool {
        self.left && self.right && self.top && self.bottom
    }
}

/// Result of testing one point against one box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityResult {
    pub is_nearby: bool,
    /// `None` when the box was missing.
    pub sides: Option<Sides>,
}

impl ProximityResult {
    /// The answer for a missing operand: never nearby.
    #[must_use]
    pub fn missing() -> Self {
        Self { is_nearby: false, sides: None }
    }
}

/// Test whether `point` lies within `threshold` of `bbox`.
///
/// A missing box (shape not mounted yet, or already removed) is not an
/// error; it simply is not nearby.
#[must_use]
pub fn test_point(point: Point, bbox: Option<&BoundingBox>, threshold: f64) -> ProximityResult {
    let Some(bbox) = bbox else {
        return ProximityResult::missing();
    };

    let sides = Sides {
        left: point.x + threshold >= bbox.min_x(),
        right: point.x <= bbox.max_x() + threshold,
        top: point.y + threshold >= bbox.min_y(),
        bottom: point.y <= bbox.max_y() + threshold,
    };

    ProximityResult { is_nearby: sides.all(), sides: Some(sides) }
}
