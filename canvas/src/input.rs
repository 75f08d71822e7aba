//! Input model: the geometry-change notifications the engine reacts to, the
//! Idle/Dirty recompute state machine they drive, and the UI selection.
//!
//! Any event that can move a box (add, remove, drag, transform) flips the
//! tracker from `Idle` to `Dirty` synchronously. Only a completed rebuild
//! flips it back. Selection lives here too, held by id so nothing in the
//! engine depends on a live shape handle.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::trace;

use crate::doc::ShapeId;

/// A geometry-affecting event from the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A shape was added to the canvas.
    Added(ShapeId),
    /// A shape was removed from the canvas.
    Removed(ShapeId),
    /// A shape was dragged to a new position (one event per drag tick).
    Dragged(ShapeId),
    /// A shape was resized, rotated or rescaled by the transformer.
    Transformed(ShapeId),
}

impl ChangeEvent {
    /// The shape the event is about.
    #[must_use]
    pub fn shape(&self) -> &ShapeId {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::Dragged(id) | Self::Transformed(id) => id,
        }
    }
}

/// Whether the current relation set reflects current geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputeState {
    /// No geometry change since the last rebuild.
    #[default]
    Idle,
    /// Geometry changed; the relation set is stale until the next rebuild.
    Dirty,
}

/// Drives [`RecomputeState`] and counts what happened in between rebuilds.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    state: RecomputeState,
    pending: usize,
    rebuilds: u64,
}

impl ChangeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a geometry change. Idle becomes Dirty; Dirty stays Dirty.
    pub fn record(&mut self, event: &ChangeEvent) {
        trace!(?event, "geometry changed");
        self.state = RecomputeState::Dirty;
        self.pending += 1;
    }

    /// Note a completed rebuild. Returns how many events it absorbed.
    pub fn complete(&mut self) -> usize {
        let absorbed = self.pending;
        self.state = RecomputeState::Idle;
        self.pending = 0;
        self.rebuilds += 1;
        absorbed
    }

    #[must_use]
    pub fn state(&self) -> RecomputeState {
        self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == RecomputeState::Dirty
    }

    /// Events recorded since the last rebuild.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Rebuilds completed over the tracker's lifetime.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

/// Persistent UI state owned by the host, referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// The shape the transformer is attached to, if any.
    pub selected_id: Option<ShapeId>,
}
