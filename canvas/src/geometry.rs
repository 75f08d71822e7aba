//! Geometry primitives: points, axis-aligned bounding boxes, shape transforms,
//! and the two connector endpoints derived from a box.
//!
//! Every box handed to the proximity and adjacency layers comes out of this
//! module, so the `min <= max` ordering and the finiteness of all four edges
//! are established once, here, and relied on everywhere else.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// Invalid input rejected before it can reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A coordinate, size, scale or angle was `NaN` or infinite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    /// A connector point list was empty or had an odd number of values.
    #[error("point list must hold whole x/y pairs, got {0} values")]
    MalformedPoints(usize),
    /// A distance that must be zero or more was negative.
    #[error("{0} must not be negative")]
    Negative(&'static str),
}

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box in min/max form. Always satisfies `min_x <= max_x` and
/// `min_y <= max_y`; a zero-area box is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundingBox {
    /// Build a box from an origin and a size. Negative sizes extend left/up
    /// from the origin and are normalized.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if any input is `NaN` or infinite.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite("bounding box"));
        }
        Ok(Self::from_corners_unchecked(Point::new(x, y), Point::new(x + width, y + height)))
    }

    /// Build a box from explicit min/max edges, in either order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if any edge is `NaN` or infinite.
    pub fn from_min_max(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, GeometryError> {
        Self::enclosing([Point::new(min_x, min_y), Point::new(max_x, max_y)])
    }

    /// Smallest box enclosing every point.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedPoints`] for an empty input and
    /// [`GeometryError::NonFinite`] if any point is not finite.
    pub fn enclosing<I>(points: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Err(GeometryError::MalformedPoints(0));
        };
        if !first.is_finite() {
            return Err(GeometryError::NonFinite("point"));
        }

        let mut bbox = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        for p in iter {
            if !p.is_finite() {
                return Err(GeometryError::NonFinite("point"));
            }
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Ok(bbox)
    }

    fn from_corners_unchecked(a: Point, b: Point) -> Self {
        Self { min_x: a.x.min(b.x), min_y: a.y.min(b.y), max_x: a.x.max(b.x), max_y: a.y.max(b.y) }
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.min_x + self.width() / 2.0, self.min_y + self.height() / 2.0)
    }
}

/// Position, rotation and scale of a shape, as set by dragging and by the
/// transformer.
///
/// `rotation` is in degrees, clockwise on screen (y grows downward), and
/// pivots around `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, rotation: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }
}

impl Transform {
    /// Unrotated, unscaled transform with its origin at `(x, y)`.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, ..Self::default() }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.rotation, self.scale_x, self.scale_y]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Map a point from shape-local space to world space: scale, rotate, translate.
    #[must_use]
    pub fn apply(&self, local: Point) -> Point {
        let sx = local.x * self.scale_x;
        let sy = local.y * self.scale_y;
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Point::new(self.x + sx * cos - sy * sin, self.y + sx * sin + sy * cos)
    }

    /// World-space box enclosing the transformed local points.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the transform or a point is not
    /// finite, and [`GeometryError::MalformedPoints`] for an empty input.
    pub fn bounding_box<I>(&self, local: I) -> Result<BoundingBox, GeometryError>
    where
        I: IntoIterator<Item = Point>,
    {
        if !self.is_finite() {
            return Err(GeometryError::NonFinite("transform"));
        }
        BoundingBox::enclosing(local.into_iter().map(|p| self.apply(p)))
    }
}

/// The two ends of a connector under the bounding-box endpoint approximation.
///
/// `start` is the box's top-left corner and `tip` its bottom-right corner,
/// whatever direction the connector's polyline is actually drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorEndpoints {
    pub start: Point,
    pub tip: Point,
}

impl ConnectorEndpoints {
    #[must_use]
    pub fn from_box(bbox: &BoundingBox) -> Self {
        Self {
            start: Point::new(bbox.min_x(), bbox.min_y()),
            tip: Point::new(bbox.min_x() + bbox.width(), bbox.min_y() + bbox.height()),
        }
    }
}
