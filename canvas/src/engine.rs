use tracing::debug;

use crate::consts::{
    DEFAULT_ARROW_POINTS, DEFAULT_CIRCLE_RADIUS, DEFAULT_IMAGE_SIZE, DEFAULT_RECT_SIZE, DEFAULT_THRESHOLD,
    MIN_SHAPE_SIZE,
};
use crate::doc::{DocError, DocStore, Shape, ShapeGeometry, ShapeId, ShapeKind};
use crate::geometry::{GeometryError, Transform};
use crate::input::{ChangeEvent, ChangeTracker, RecomputeState, UiState};
use crate::relations::{RelationPayload, RelationSet, rebuild};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from event handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated(ShapeId),
    ShapeUpdated(ShapeId),
    ShapeRemoved(ShapeId),
    /// A transform was refused because the result would be too small; the
    /// host should snap the shape back to its stored geometry.
    TransformRejected(ShapeId),
    SelectionChanged(Option<ShapeId>),
    RelationsRebuilt(RelationSet),
}

/// Tunables for an editor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Proximity tolerance in world units.
    pub threshold: f64,
    /// Smallest width/height a transform may leave a non-connector shape with.
    pub min_shape_size: f64,
    /// Rebuild after every geometry event. When off, the host calls
    /// [`EngineCore::settle`] on its own schedule.
    pub auto_rebuild: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, min_shape_size: MIN_SHAPE_SIZE, auto_rebuild: true }
    }
}

impl EngineConfig {
    /// Check that both distances are finite and non-negative. A NaN threshold
    /// would make every proximity comparison false.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] or [`GeometryError::Negative`]
    /// naming the offending field.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, value) in [("threshold", self.threshold), ("min_shape_size", self.min_shape_size)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite(name));
            }
            if value < 0.0 {
                return Err(GeometryError::Negative(name));
            }
        }
        Ok(())
    }
}

/// Core editor state: the document, the selection, the recompute tracker and
/// the current relation set.
///
/// Every geometry mutation goes through here so that the tracker sees it.
#[derive(Debug)]
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub tracker: ChangeTracker,
    config: EngineConfig,
    relations: RelationSet,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::from_checked(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with custom tunables.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if [`EngineConfig::validate`] rejects `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        Ok(Self::from_checked(config))
    }

    fn from_checked(config: EngineConfig) -> Self {
        Self {
            doc: DocStore::new(),
            ui: UiState::default(),
            tracker: ChangeTracker::new(),
            config,
            relations: RelationSet::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Switch between rebuilding on every event and host-driven
    /// [`settle`](Self::settle) calls. Turning rebuilds back on settles any
    /// change recorded while they were off.
    pub fn set_auto_rebuild(&mut self, auto_rebuild: bool) -> Vec<Action> {
        self.config.auto_rebuild = auto_rebuild;
        if auto_rebuild { self.settle() } else { Vec::new() }
    }

    // --- Shape creation ---

    /// Add a shape with explicit geometry and transform.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Geometry`] if the shape has no valid bounding box.
    pub fn add_shape(&mut self, geometry: ShapeGeometry, transform: Transform) -> Result<Vec<Action>, DocError> {
        let id = self.doc.add(geometry, transform)?;
        debug!(shape = %id, "shape added");
        Ok(self.changed(ChangeEvent::Added(id.clone()), vec![Action::ShapeCreated(id)]))
    }

    /// Add a shape of `kind` with the editor's default size, its origin at
    /// `(x, y)`. Arrows get the default point list relative to that origin.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Geometry`] if `x` or `y` is not finite.
    pub fn add_default(&mut self, kind: ShapeKind, x: f64, y: f64) -> Result<Vec<Action>, DocError> {
        let geometry = match kind {
            ShapeKind::Rect => ShapeGeometry::Rect { width: DEFAULT_RECT_SIZE, height: DEFAULT_RECT_SIZE },
            ShapeKind::Circle => ShapeGeometry::Circle { radius: DEFAULT_CIRCLE_RADIUS },
            ShapeKind::Arrow => ShapeGeometry::Arrow { points: DEFAULT_ARROW_POINTS.to_vec() },
            ShapeKind::Image => ShapeGeometry::Image { width: DEFAULT_IMAGE_SIZE, height: DEFAULT_IMAGE_SIZE },
        };
        self.add_shape(geometry, Transform::at(x, y))
    }

    // --- Geometry events ---

    /// Drag a shape so its origin sits at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`]; the shape is
    /// left where it was.
    pub fn drag_to(&mut self, id: &ShapeId, x: f64, y: f64) -> Result<Vec<Action>, DocError> {
        self.doc.move_to(id, x, y)?;
        Ok(self.changed(ChangeEvent::Dragged(id.clone()), vec![Action::ShapeUpdated(id.clone())]))
    }

    /// Drag a shape by a delta.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`].
    pub fn drag_by(&mut self, id: &ShapeId, dx: f64, dy: f64) -> Result<Vec<Action>, DocError> {
        self.doc.translate(id, dx, dy)?;
        Ok(self.changed(ChangeEvent::Dragged(id.clone()), vec![Action::ShapeUpdated(id.clone())]))
    }

    /// Apply a transformer result (position, rotation, scale).
    ///
    /// A non-connector whose new box would be narrower or shorter than
    /// `min_shape_size` keeps its old geometry and yields
    /// [`Action::TransformRejected`]; nothing is marked dirty.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] or [`DocError::Geometry`].
    pub fn transform(&mut self, id: &ShapeId, transform: Transform) -> Result<Vec<Action>, DocError> {
        let shape = self.doc.get(id).ok_or_else(|| DocError::UnknownShape(id.clone()))?;
        let candidate = Shape { transform, ..shape.clone() };
        let bbox = candidate.bounding_box()?;

        let min = self.config.min_shape_size;
        if !candidate.kind().is_connector() && (bbox.width() < min || bbox.height() < min) {
            debug!(shape = %id, width = bbox.width(), height = bbox.height(), "transform refused");
            return Ok(vec![Action::TransformRejected(id.clone())]);
        }

        self.doc.set_transform(id, transform)?;
        Ok(self.changed(ChangeEvent::Transformed(id.clone()), vec![Action::ShapeUpdated(id.clone())]))
    }

    /// Remove a shape. Clears the selection if it pointed at that shape.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] if no such shape exists.
    pub fn remove(&mut self, id: &ShapeId) -> Result<Vec<Action>, DocError> {
        if self.doc.remove(id).is_none() {
            return Err(DocError::UnknownShape(id.clone()));
        }
        debug!(shape = %id, "shape removed");

        let mut actions = vec![Action::ShapeRemoved(id.clone())];
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        Ok(self.changed(ChangeEvent::Removed(id.clone()), actions))
    }

    // --- Selection ---

    /// Attach the transformer to a shape.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownShape`] if no such shape exists.
    pub fn select(&mut self, id: &ShapeId) -> Result<Vec<Action>, DocError> {
        if self.doc.get(id).is_none() {
            return Err(DocError::UnknownShape(id.clone()));
        }
        if self.ui.selected_id.as_ref() == Some(id) {
            return Ok(Vec::new());
        }
        self.ui.selected_id = Some(id.clone());
        Ok(vec![Action::SelectionChanged(Some(id.clone()))])
    }

    /// Detach the transformer (a click on empty stage).
    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selected_id.take().is_some() { vec![Action::SelectionChanged(None)] } else { Vec::new() }
    }

    // --- Recompute ---

    /// Rebuild the relation set if geometry changed since the last rebuild.
    pub fn settle(&mut self) -> Vec<Action> {
        if !self.tracker.is_dirty() {
            return Vec::new();
        }
        vec![Action::RelationsRebuilt(self.rebuild_now().clone())]
    }

    /// Rebuild the relation set unconditionally.
    pub fn rebuild_now(&mut self) -> &RelationSet {
        let connectors = self.doc.connectors();
        let targets = self.doc.targets();
        self.relations = rebuild(&connectors, &targets, &self.doc, self.config.threshold);
        let absorbed = self.tracker.complete();
        debug!(events = absorbed, relations = self.relations.len(), "relations settled");
        &self.relations
    }

    fn changed(&mut self, event: ChangeEvent, mut actions: Vec<Action>) -> Vec<Action> {
        self.tracker.record(&event);
        if self.config.auto_rebuild {
            actions.extend(self.settle());
        }
        actions
    }

    // --- Queries ---

    /// The relation set as of the last rebuild.
    #[must_use]
    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    /// Body for submitting the current relation set.
    #[must_use]
    pub fn payload(&self) -> RelationPayload {
        self.relations.to_payload()
    }

    #[must_use]
    pub fn recompute_state(&self) -> RecomputeState {
        self.tracker.state()
    }

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ShapeId> {
        self.ui.selected_id.as_ref()
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.doc.get(id)
    }
}
