//! Shared numeric constants for the canvas crate.

// ── Proximity ───────────────────────────────────────────────────

/// Default tolerance, in world units, within which a connector end touches a shape.
pub const DEFAULT_THRESHOLD: f64 = 0.0;

// ── Transformer ─────────────────────────────────────────────────

/// Smallest width or height a resize may produce; smaller boxes are refused.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

// ── New-shape defaults ──────────────────────────────────────────

/// Width and height of a freshly added rectangle.
pub const DEFAULT_RECT_SIZE: f64 = 100.0;

/// Width and height of a freshly added image.
pub const DEFAULT_IMAGE_SIZE: f64 = 100.0;

/// Radius of a freshly added circle.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 50.0;

/// Point list of a freshly added arrow: a short horizontal stroke.
pub const DEFAULT_ARROW_POINTS: [f64; 4] = [250.0, 50.0, 300.0, 50.0];
