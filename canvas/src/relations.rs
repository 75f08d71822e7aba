//! Relation set builder.
//!
//! A rebuild is exhaustive: every connector is resolved against every
//! candidate shape (connectors outer, shapes inner) and the non-empty results
//! are collected in that iteration order. Nothing is carried over from a
//! previous rebuild, so relations of removed shapes vanish on their own.

#[cfg(test)]
#[path = "relations_test.rs"]
mod relations_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjacency::{Relation, resolve};
use crate::doc::ShapeId;
use crate::geometry::BoundingBox;

/// Live bounding-box query, answered by whoever owns shape geometry.
pub trait BoxSource {
    /// Current world-space box of a shape, or `None` if it is not mounted.
    fn bounding_box(&self, id: &ShapeId) -> Option<BoundingBox>;
}

impl BoxSource for HashMap<ShapeId, BoundingBox> {
    fn bounding_box(&self, id: &ShapeId) -> Option<BoundingBox> {
        self.get(id).copied()
    }
}

/// Ordered relations produced by one rebuild. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationSet(Vec<Relation>);

impl RelationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.0.iter()
    }

    /// Wire strings, `"source, target"`, in set order.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Body for submitting this set to the relation sink.
    #[must_use]
    pub fn to_payload(&self) -> RelationPayload {
        RelationPayload { items: self.items() }
    }
}

impl From<Vec<Relation>> for RelationSet {
    fn from(relations: Vec<Relation>) -> Self {
        Self(relations)
    }
}

impl<'a> IntoIterator for &'a RelationSet {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON body exchanged with the relation sink: `{ "items": ["a, b", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationPayload {
    #[serde(default)]
    pub items: Vec<String>,
}

/// Rebuild the full relation set from current geometry.
#[must_use]
pub fn rebuild<S>(connectors: &[ShapeId], shapes: &[ShapeId], source: &S, threshold: f64) -> RelationSet
where
    S: BoxSource + ?Sized,
{
    let mut relations = Vec::new();

    for connector in connectors {
        let connector_box = source.bounding_box(connector);
        for shape in shapes {
            let shape_box = source.bounding_box(shape);
            if let Some(relation) = resolve(connector, connector_box.as_ref(), shape, shape_box.as_ref(), threshold) {
                relations.push(relation);
            }
        }
    }

    debug!(
        connectors = connectors.len(),
        shapes = shapes.len(),
        relations = relations.len(),
        "relation set rebuilt"
    );
    RelationSet(relations)
}
