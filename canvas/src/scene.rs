//! Scene files: a JSON list of shapes that can be loaded into an editor
//! session outside the browser.
//!
//! ```json
//! { "threshold": 0,
//!   "shapes": [ { "kind": "rect", "x": 250, "y": 50, "width": 100, "height": 100 },
//!               { "kind": "arrow", "x": 0, "y": 0, "points": [240, 40, 260, 60] } ] }
//! ```
//!
//! Shapes receive ids in file order, exactly as if they had been added one by
//! one in the editor.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};

use crate::doc::{DocError, ShapeGeometry};
use crate::engine::{EngineConfig, EngineCore};
use crate::geometry::{GeometryError, Transform};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shape #{index}: {source}")]
    Shape { index: usize, source: DocError },
    #[error("invalid session config: {0}")]
    Config(#[from] GeometryError),
}

/// One shape entry: kind-tagged geometry plus an optional transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneShape {
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    #[serde(flatten)]
    pub transform: Transform,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Overrides the session threshold when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub shapes: Vec<SceneShape>,
}

impl Scene {
    /// Parse a scene from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] if the text is not a valid scene.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build a settled editor session holding every shape of the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Config`] if the resulting threshold is negative or
    /// not finite, and [`SceneError::Shape`] naming the first shape with
    /// invalid geometry.
    pub fn into_engine(self, mut config: EngineConfig) -> Result<EngineCore, SceneError> {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        let mut core = EngineCore::with_config(EngineConfig { auto_rebuild: false, ..config })?;
        for (index, entry) in self.shapes.into_iter().enumerate() {
            core.add_shape(entry.geometry, entry.transform)
                .map_err(|source| SceneError::Shape { index, source })?;
        }
        core.rebuild_now();
        core.set_auto_rebuild(config.auto_rebuild);
        Ok(core)
    }
}
