//! Adjacency resolver: turns one (connector, shape) pair into a directed
//! relation, or nothing.
//!
//! Both connector endpoints are tested against the shape box. Exactly one end
//! touching yields a relation whose direction follows which end it was:
//!
//! | tip near | start near | result |
//! |----------|------------|--------|
//! | yes | no  | `connector -> shape` |
//! | no  | yes | `shape -> connector` |
//! | yes | yes | none |
//! | no  | no  | none |
//!
//! When both ends touch (a connector lying inside or across the shape) no
//! relation is emitted.

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::doc::ShapeId;
use crate::geometry::{BoundingBox, ConnectorEndpoints};
use crate::proximity::test_point;

/// Wire separator between source and target ids.
const SEPARATOR: &str = ", ";

/// An ordered `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Relation {
    pub source: ShapeId,
    pub target: ShapeId,
}

impl Relation {
    #[must_use]
    pub fn new(source: ShapeId, target: ShapeId) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("relation must look like `source, target`, got {0:?}")]
pub struct RelationParseError(pub String);

impl FromStr for Relation {
    type Err = RelationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((source, target)) = s.split_once(SEPARATOR) else {
            return Err(RelationParseError(s.to_owned()));
        };
        if source.is_empty() || target.is_empty() || target.contains(SEPARATOR) {
            return Err(RelationParseError(s.to_owned()));
        }
        Ok(Self::new(ShapeId::from(source), ShapeId::from(target)))
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        relation.to_string()
    }
}

impl TryFrom<String> for Relation {
    type Error = RelationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resolve the relation between one connector and one shape.
///
/// Returns `None` when either box is missing, when neither end touches, and
/// when both ends touch.
#[must_use]
pub fn resolve(
    connector_id: &ShapeId,
    connector_box: Option<&BoundingBox>,
    shape_id: &ShapeId,
    shape_box: Option<&BoundingBox>,
    threshold: f64,
) -> Option<Relation> {
    let connector_box = connector_box?;
    let ends = ConnectorEndpoints::from_box(connector_box);

    let tip = test_point(ends.tip, shape_box, threshold);
    let start = test_point(ends.start, shape_box, threshold);

    match (tip.is_nearby, start.is_nearby) {
        (true, false) => Some(Relation::new(connector_id.clone(), shape_id.clone())),
        (false, true) => Some(Relation::new(shape_id.clone(), connector_id.clone())),
        _ => None,
    }
}
