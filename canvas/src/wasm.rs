//! Browser bridge: exposes [`EngineCore`] to the host JavaScript layer.
//!
//! The host owns the stage and forwards drag, transform and selection events
//! here by shape id. Failures surface as thrown JS errors.

use wasm_bindgen::prelude::*;

use crate::doc::{ShapeGeometry, ShapeId};
use crate::engine::{Action, EngineConfig, EngineCore};
use crate::geometry::Transform;

/// Editor session handle held by the page.
#[wasm_bindgen]
pub struct CanvasEngine {
    core: EngineCore,
}

#[wasm_bindgen]
impl CanvasEngine {
    /// Create an empty session with the given proximity threshold.
    ///
    /// # Errors
    ///
    /// Throws if `threshold` is negative or not finite.
    #[wasm_bindgen(constructor)]
    pub fn new(threshold: f64) -> Result<CanvasEngine, JsError> {
        let core = EngineCore::with_config(EngineConfig { threshold, ..EngineConfig::default() })?;
        Ok(Self { core })
    }

    /// Add a rectangle with its top-left corner at `(x, y)`; returns its id.
    ///
    /// # Errors
    ///
    /// Throws if any value is not finite.
    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<String, JsError> {
        self.add(ShapeGeometry::Rect { width, height }, x, y)
    }

    /// Add a circle centred on `(x, y)`; returns its id.
    ///
    /// # Errors
    ///
    /// Throws if any value is not finite.
    pub fn add_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<String, JsError> {
        self.add(ShapeGeometry::Circle { radius }, x, y)
    }

    /// Add an arrow through a flat `[x0, y0, x1, y1, ...]` list; returns its id.
    ///
    /// # Errors
    ///
    /// Throws on an empty or odd-length list, or a non-finite value.
    pub fn add_arrow(&mut self, points: Vec<f64>) -> Result<String, JsError> {
        self.add(ShapeGeometry::Arrow { points }, 0.0, 0.0)
    }

    /// Add an image frame with its top-left corner at `(x, y)`; returns its id.
    ///
    /// # Errors
    ///
    /// Throws if any value is not finite.
    pub fn add_image(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<String, JsError> {
        self.add(ShapeGeometry::Image { width, height }, x, y)
    }

    /// Forward a `dragmove` position.
    ///
    /// # Errors
    ///
    /// Throws for an unknown id or a non-finite position.
    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsError> {
        self.core.drag_to(&ShapeId::from(id), x, y)?;
        Ok(())
    }

    /// Forward a transformer result. Returns `false` when the resize was
    /// refused and the host should restore the node's previous attributes.
    ///
    /// # Errors
    ///
    /// Throws for an unknown id or a non-finite transform.
    pub fn transform(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        rotation: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<bool, JsError> {
        let transform = Transform { x, y, rotation, scale_x, scale_y };
        let actions = self.core.transform(&ShapeId::from(id), transform)?;
        Ok(!actions.iter().any(|a| matches!(a, Action::TransformRejected(_))))
    }

    /// # Errors
    ///
    /// Throws for an unknown id.
    pub fn remove(&mut self, id: &str) -> Result<(), JsError> {
        self.core.remove(&ShapeId::from(id))?;
        Ok(())
    }

    /// Attach the transformer to a shape (double click).
    ///
    /// # Errors
    ///
    /// Throws for an unknown id.
    pub fn select(&mut self, id: &str) -> Result<(), JsError> {
        self.core.select(&ShapeId::from(id))?;
        Ok(())
    }

    /// Detach the transformer (click on empty stage).
    pub fn clear_selection(&mut self) {
        self.core.clear_selection();
    }

    #[must_use]
    pub fn selected(&self) -> Option<String> {
        self.core.selection().map(ToString::to_string)
    }

    /// Turn per-event rebuilds on or off. With them off the page calls
    /// [`settle`](Self::settle), e.g. once per animation frame. Returns
    /// whether switching them on rebuilt a stale set.
    pub fn set_auto_rebuild(&mut self, auto_rebuild: bool) -> bool {
        !self.core.set_auto_rebuild(auto_rebuild).is_empty()
    }

    /// Rebuild if anything moved since the last rebuild. Returns whether a
    /// rebuild ran.
    pub fn settle(&mut self) -> bool {
        !self.core.settle().is_empty()
    }

    /// Current relation set as the submission body, `{"items": [...]}`.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn relations_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.core.payload())?)
    }
}

impl CanvasEngine {
    fn add(&mut self, geometry: ShapeGeometry, x: f64, y: f64) -> Result<String, JsError> {
        let actions = self.core.add_shape(geometry, Transform::at(x, y))?;
        actions
            .iter()
            .find_map(|a| match a {
                Action::ShapeCreated(id) => Some(id.to_string()),
                _ => None,
            })
            .ok_or_else(|| JsError::new("shape was not created"))
    }
}
