//! Document model: shapes on the canvas and the in-memory store that owns them.
//!
//! This module defines what is on the canvas (`Shape`, `ShapeKind`,
//! `ShapeGeometry`), the stable identifiers the UI layer refers to shapes by
//! (`ShapeId`), and the runtime store (`DocStore`) that assigns those
//! identifiers, applies drags and transforms, and answers the bounding-box
//! query the relation builder runs against.
//!
//! Identifiers are handed out per kind in creation order (`rect0`, `arrow0`,
//! `rect1`, `img0`, ...). A counter never goes backwards, so an id is never
//! reused after its shape is removed.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::{BoundingBox, GeometryError, Point, Transform};
use crate::relations::BoxSource;

/// Errors from store mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocError {
    #[error("unknown shape: {0}")]
    UnknownShape(ShapeId),
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
}

/// Stable identifier for a shape, e.g. `rect0` or `arrow3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle; origin at its top-left corner.
    Rect,
    /// Circle; origin at its centre.
    Circle,
    /// Directional connector drawn through a point list.
    Arrow,
    /// Bitmap image; origin at its top-left corner.
    Image,
}

impl ShapeKind {
    /// Prefix of the ids handed out for this kind.
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Arrow => "arrow",
            Self::Image => "img",
        }
    }

    /// Whether shapes of this kind are connectors rather than relation targets.
    #[must_use]
    pub fn is_connector(self) -> bool {
        matches!(self, Self::Arrow)
    }
}

/// Kind-specific geometry, in shape-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Flat `[x0, y0, x1, y1, ...]` list relative to the shape origin.
    Arrow { points: Vec<f64> },
    Image { width: f64, height: f64 },
}

impl ShapeGeometry {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Arrow { .. } => ShapeKind::Arrow,
            Self::Image { .. } => ShapeKind::Image,
        }
    }

    /// Points spanning the shape's local extent, before any transform.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedPoints`] for an arrow whose point
    /// list is empty or not made of whole pairs.
    pub fn local_extent(&self) -> Result<Vec<Point>, GeometryError> {
        match self {
            Self::Rect { width, height } | Self::Image { width, height } => Ok(vec![
                Point::new(0.0, 0.0),
                Point::new(*width, 0.0),
                Point::new(0.0, *height),
                Point::new(*width, *height),
            ]),
            Self::Circle { radius } => Ok(vec![
                Point::new(-radius, -radius),
                Point::new(*radius, -radius),
                Point::new(-radius, *radius),
                Point::new(*radius, *radius),
            ]),
            Self::Arrow { points } => {
                if points.is_empty() || points.len() % 2 != 0 {
                    return Err(GeometryError::MalformedPoints(points.len()));
                }
                Ok(points.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1])).collect())
            }
        }
    }
}

/// A shape as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// World-space bounding box under the current transform.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the geometry or transform is invalid.
    pub fn bounding_box(&self) -> Result<BoundingBox, GeometryError> {
        bounding_box_of(&self.geometry, &self.transform)
    }
}

fn bounding_box_of(geometry: &ShapeGeometry, transform: &Transform) -> Result<BoundingBox, GeometryError> {
    transform.bounding_box(geometry.local_extent()?)
}

/// In-memory store of shapes, kept in creation order.
#[derive(Debug)]
pub struct DocStore {
    shapes: HashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
    counters: HashMap<ShapeKind, u64>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: HashMap::new(), order: Vec::new(), counters: HashMap::new() }
    }

    /// Validate and insert a new shape, assigning it the next id for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Geometry`] if the shape has no valid bounding box;
    /// nothing is stored and no id is consumed in that case.
    pub fn add(&mut self, geometry: ShapeGeometry, transform: Transform) -> Result<ShapeId, DocError> {
        bounding_box_of(&geometry, &transform)?;

        let kind = geometry.kind();
        let counter = self.counters.entry(kind).or_insert(0);
        let id = ShapeId(format!("{}{}", kind.id_prefix(), counter));
        *counter += 1;

        self.order.push(id.clone());
        self.shapes.insert(id.clone(), Shape { id: id.clone(), transform, geometry });
        Ok(id)
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(id)?;
        self.order.retain(|other| other != id);
        Some(shape)
    }

    /// Return a reference to a shape by id.
    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Replace a shape's transform. The old transform is kept if the new one
    /// yields no valid box.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`].
    pub fn set_transform(&mut self, id: &ShapeId, transform: Transform) -> Result<BoundingBox, DocError> {
        let shape = self.shapes.get_mut(id).ok_or_else(|| DocError::UnknownShape(id.clone()))?;
        let bbox = bounding_box_of(&shape.geometry, &transform)?;
        shape.transform = transform;
        Ok(bbox)
    }

    /// Move a shape's origin to an absolute position.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`].
    pub fn move_to(&mut self, id: &ShapeId, x: f64, y: f64) -> Result<BoundingBox, DocError> {
        let current = self.transform_of(id)?;
        self.set_transform(id, Transform { x, y, ..current })
    }

    /// Shift a shape's origin by a delta.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`].
    pub fn translate(&mut self, id: &ShapeId, dx: f64, dy: f64) -> Result<BoundingBox, DocError> {
        let current = self.transform_of(id)?;
        self.set_transform(id, Transform { x: current.x + dx, y: current.y + dy, ..current })
    }

    fn transform_of(&self, id: &ShapeId) -> Result<Transform, DocError> {
        self.shapes
            .get(id)
            .map(|shape| shape.transform)
            .ok_or_else(|| DocError::UnknownShape(id.clone()))
    }

    /// All shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Ids of connector shapes in creation order.
    #[must_use]
    pub fn connectors(&self) -> Vec<ShapeId> {
        self.ids_where(ShapeKind::is_connector)
    }

    /// Ids of non-connector shapes in creation order.
    #[must_use]
    pub fn targets(&self) -> Vec<ShapeId> {
        self.ids_where(|kind| !kind.is_connector())
    }

    fn ids_where(&self, pred: impl Fn(ShapeKind) -> bool) -> Vec<ShapeId> {
        self.shapes()
            .filter(|shape| pred(shape.kind()))
            .map(|shape| shape.id.clone())
            .collect()
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxSource for DocStore {
    fn bounding_box(&self, id: &ShapeId) -> Option<BoundingBox> {
        let shape = self.shapes.get(id)?;
        match shape.bounding_box() {
            Ok(bbox) => Some(bbox),
            Err(e) => {
                warn!(error = %e, shape = %id, "shape has no bounding box");
                None
            }
        }
    }
}
