#![allow(clippy::float_cmp)]

use super::*;
use crate::adjacency::Relation;

// =============================================================
// Helpers
// =============================================================

fn rect_at(core: &mut EngineCore, x: f64, y: f64, w: f64, h: f64) -> ShapeId {
    let actions = core.add_shape(ShapeGeometry::Rect { width: w, height: h }, Transform::at(x, y)).unwrap();
    created_id(&actions)
}

fn arrow_through(core: &mut EngineCore, points: &[f64]) -> ShapeId {
    let actions = core.add_shape(ShapeGeometry::Arrow { points: points.to_vec() }, Transform::default()).unwrap();
    created_id(&actions)
}

fn created_id(actions: &[Action]) -> ShapeId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ShapeCreated(id) => Some(id.clone()),
            _ => None,
        })
        .expect("no ShapeCreated action")
}

fn rebuilt(actions: &[Action]) -> Option<&RelationSet> {
    actions.iter().find_map(|a| match a {
        Action::RelationsRebuilt(set) => Some(set),
        _ => None,
    })
}

fn items(core: &EngineCore) -> Vec<String> {
    core.relations().items()
}

fn manual() -> EngineCore {
    EngineCore::with_config(EngineConfig { auto_rebuild: false, ..EngineConfig::default() }).unwrap()
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.doc.is_empty());
    assert!(core.relations().is_empty());
    assert!(core.selection().is_none());
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
}

#[test]
fn default_config_matches_editor_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.threshold, 0.0);
    assert_eq!(config.min_shape_size, 5.0);
    assert!(config.auto_rebuild);
    assert_eq!(EngineCore::new().config(), config);
}

// =============================================================
// Creation
// =============================================================

#[test]
fn add_default_uses_editor_sizes() {
    let mut core = EngineCore::new();
    let rect = created_id(&core.add_default(ShapeKind::Rect, 10.0, 20.0).unwrap());
    let circle = created_id(&core.add_default(ShapeKind::Circle, 200.0, 100.0).unwrap());
    let arrow = created_id(&core.add_default(ShapeKind::Arrow, 0.0, 0.0).unwrap());
    let img = created_id(&core.add_default(ShapeKind::Image, 0.0, 0.0).unwrap());

    assert_eq!(core.shape(&rect).unwrap().geometry, ShapeGeometry::Rect { width: 100.0, height: 100.0 });
    assert_eq!(core.shape(&circle).unwrap().geometry, ShapeGeometry::Circle { radius: 50.0 });
    assert_eq!(
        core.shape(&arrow).unwrap().geometry,
        ShapeGeometry::Arrow { points: vec![250.0, 50.0, 300.0, 50.0] }
    );
    assert_eq!(core.shape(&img).unwrap().geometry, ShapeGeometry::Image { width: 100.0, height: 100.0 });
    assert_eq!(img.as_str(), "img0");
}

#[test]
fn add_rebuilds_immediately() {
    let mut core = EngineCore::new();
    let actions = core.add_default(ShapeKind::Rect, 0.0, 0.0).unwrap();
    assert!(matches!(actions[0], Action::ShapeCreated(_)));
    assert!(rebuilt(&actions).is_some());
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
    assert_eq!(core.tracker.rebuilds(), 1);
}

#[test]
fn add_invalid_shape_errors_and_stays_idle() {
    let mut core = EngineCore::new();
    let err = core.add_default(ShapeKind::Rect, f64::NAN, 0.0).unwrap_err();
    assert!(matches!(err, DocError::Geometry(_)));
    assert!(core.doc.is_empty());
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
}

// =============================================================
// Relations
// =============================================================

#[test]
fn end_to_end_tip_touching_shape() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    let arrow = arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(core.relations().iter().collect::<Vec<_>>(), vec![&Relation::new(arrow, rect)]);
    assert_eq!(items(&core), vec!["arrow0, rect0"]);
}

#[test]
fn start_touching_shape_points_back_at_arrow() {
    let mut core = EngineCore::new();
    rect_at(&mut core, 0.0, 0.0, 100.0, 100.0);
    arrow_through(&mut core, &[90.0, 90.0, 200.0, 200.0]);
    assert_eq!(items(&core), vec!["rect0, arrow0"]);
}

#[test]
fn arrow_inside_shape_has_no_relation() {
    let mut core = EngineCore::new();
    rect_at(&mut core, 0.0, 0.0, 100.0, 100.0);
    arrow_through(&mut core, &[10.0, 10.0, 50.0, 50.0]);
    assert!(core.relations().is_empty());
}

#[test]
fn dragging_arrow_away_drops_relation() {
    let mut core = EngineCore::new();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    let arrow = arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(core.relations().len(), 1);

    let actions = core.drag_by(&arrow, -500.0, 0.0).unwrap();
    assert_eq!(actions[0], Action::ShapeUpdated(arrow));
    assert!(rebuilt(&actions).unwrap().is_empty());
    assert!(core.relations().is_empty());
}

#[test]
fn dragging_shape_onto_arrow_tip_creates_relation() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 1000.0, 1000.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert!(core.relations().is_empty());

    core.drag_to(&rect, 250.0, 50.0).unwrap();
    assert_eq!(items(&core), vec!["arrow0, rect0"]);
}

#[test]
fn connectors_outer_shapes_inner_order() {
    let mut core = EngineCore::new();
    // Two rects both touched by two arrows' tips.
    rect_at(&mut core, 100.0, 100.0, 50.0, 50.0);
    rect_at(&mut core, 100.0, 100.0, 60.0, 60.0);
    arrow_through(&mut core, &[0.0, 0.0, 120.0, 120.0]);
    arrow_through(&mut core, &[10.0, 10.0, 110.0, 110.0]);
    assert_eq!(items(&core), vec!["arrow0, rect0", "arrow0, rect1", "arrow1, rect0", "arrow1, rect1"]);
}

#[test]
fn arrows_are_never_targets() {
    let mut core = EngineCore::new();
    arrow_through(&mut core, &[0.0, 0.0, 100.0, 100.0]);
    arrow_through(&mut core, &[100.0, 100.0, 200.0, 200.0]);
    assert!(core.relations().is_empty());
}

#[test]
fn images_and_circles_are_targets() {
    let mut core = EngineCore::new();
    core.add_shape(ShapeGeometry::Image { width: 100.0, height: 100.0 }, Transform::at(250.0, 50.0)).unwrap();
    core.add_shape(ShapeGeometry::Circle { radius: 10.0 }, Transform::at(240.0, 40.0)).unwrap();
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(items(&core), vec!["arrow0, img0", "circle0, arrow0"]);
}

#[test]
fn removing_target_drops_its_relations() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(core.relations().len(), 1);

    let actions = core.remove(&rect).unwrap();
    assert_eq!(actions[0], Action::ShapeRemoved(rect));
    assert!(core.relations().is_empty());
}

#[test]
fn rebuild_is_idempotent() {
    let mut core = EngineCore::new();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    rect_at(&mut core, 0.0, 0.0, 245.0, 45.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    let first = core.rebuild_now().clone();
    let second = core.rebuild_now().clone();
    assert_eq!(first, second);
}

#[test]
fn threshold_from_config_is_used() {
    let mut core = EngineCore::with_config(EngineConfig { threshold: 10.0, ..EngineConfig::default() }).unwrap();
    rect_at(&mut core, 100.0, 0.0, 100.0, 100.0);
    arrow_through(&mut core, &[0.0, 50.0, 92.0, 50.0]);
    assert_eq!(items(&core), vec!["arrow0, rect0"]);
}

#[test]
fn payload_carries_items() {
    let mut core = EngineCore::new();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(core.payload(), RelationPayload { items: vec!["arrow0, rect0".to_owned()] });
}

// =============================================================
// Deferred rebuilds
// =============================================================

#[test]
fn manual_mode_marks_dirty_without_rebuilding() {
    let mut core = manual();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    let actions = core.add_shape(ShapeGeometry::Arrow { points: vec![240.0, 40.0, 260.0, 60.0] }, Transform::default()).unwrap();
    assert!(rebuilt(&actions).is_none());
    assert_eq!(core.recompute_state(), RecomputeState::Dirty);
    assert_eq!(core.tracker.pending(), 2);
    assert!(core.relations().is_empty());
}

#[test]
fn settle_rebuilds_once_and_goes_idle() {
    let mut core = manual();
    let rect = rect_at(&mut core, 0.0, 0.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    for _ in 0..10 {
        core.drag_by(&rect, 25.0, 5.0).unwrap();
    }

    let actions = core.settle();
    assert_eq!(actions.len(), 1);
    assert_eq!(rebuilt(&actions).unwrap().items(), vec!["arrow0, rect0"]);
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
    assert_eq!(core.tracker.rebuilds(), 1);
    assert!(core.settle().is_empty());
}

#[test]
fn settled_set_matches_unthrottled_rebuild() {
    let mut eager = EngineCore::new();
    let mut lazy = manual();
    for core in [&mut eager, &mut lazy] {
        let rect = rect_at(core, 0.0, 0.0, 100.0, 100.0);
        arrow_through(core, &[240.0, 40.0, 260.0, 60.0]);
        core.drag_to(&rect, 250.0, 50.0).unwrap();
        core.drag_by(&rect, 3.0, 3.0).unwrap();
    }
    lazy.settle();
    assert_eq!(eager.relations(), lazy.relations());
}

// =============================================================
// Transform
// =============================================================

#[test]
fn transform_updates_geometry_and_rebuilds() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 255.0, 55.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert!(!core.relations().is_empty());

    let t = Transform { scale_x: 3.0, scale_y: 3.0, ..Transform::at(300.0, 300.0) };
    let actions = core.transform(&rect, t).unwrap();
    assert_eq!(actions[0], Action::ShapeUpdated(rect.clone()));
    assert_eq!(core.shape(&rect).unwrap().transform, t);
    assert!(core.relations().is_empty());
}

#[test]
fn transform_below_min_size_is_rejected() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 0.0, 0.0, 100.0, 100.0);
    let before = core.tracker.rebuilds();

    let squashed = Transform { scale_y: 0.04, ..Transform::at(0.0, 0.0) };
    let actions = core.transform(&rect, squashed).unwrap();
    assert_eq!(actions, vec![Action::TransformRejected(rect.clone())]);
    assert_eq!(core.shape(&rect).unwrap().transform, Transform::at(0.0, 0.0));
    assert_eq!(core.tracker.rebuilds(), before);
}

#[test]
fn transform_at_exact_min_size_is_allowed() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 0.0, 0.0, 100.0, 100.0);
    let t = Transform { scale_x: 0.05, ..Transform::at(0.0, 0.0) };
    let actions = core.transform(&rect, t).unwrap();
    assert_eq!(actions[0], Action::ShapeUpdated(rect));
}

#[test]
fn connectors_are_exempt_from_min_size() {
    let mut core = EngineCore::new();
    let arrow = arrow_through(&mut core, &[0.0, 0.0, 100.0, 0.0]);
    let actions = core.transform(&arrow, Transform { scale_x: 0.01, ..Transform::default() }).unwrap();
    assert_eq!(actions[0], Action::ShapeUpdated(arrow));
}

#[test]
fn transform_with_nan_errors_and_keeps_geometry() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 1.0, 2.0, 100.0, 100.0);
    let err = core.transform(&rect, Transform { rotation: f64::NAN, ..Transform::at(1.0, 2.0) }).unwrap_err();
    assert!(matches!(err, DocError::Geometry(_)));
    assert_eq!(core.shape(&rect).unwrap().transform, Transform::at(1.0, 2.0));
}

// =============================================================
// Unknown shapes
// =============================================================

#[test]
fn events_on_unknown_shape_error_and_stay_idle() {
    let mut core = EngineCore::new();
    let ghost = ShapeId::from("rect42");
    assert_eq!(core.drag_to(&ghost, 0.0, 0.0).unwrap_err(), DocError::UnknownShape(ghost.clone()));
    assert_eq!(core.drag_by(&ghost, 1.0, 1.0).unwrap_err(), DocError::UnknownShape(ghost.clone()));
    assert_eq!(core.transform(&ghost, Transform::default()).unwrap_err(), DocError::UnknownShape(ghost.clone()));
    assert_eq!(core.remove(&ghost).unwrap_err(), DocError::UnknownShape(ghost.clone()));
    assert_eq!(core.select(&ghost).unwrap_err(), DocError::UnknownShape(ghost));
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn select_and_clear() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 0.0, 0.0, 10.0, 10.0);
    assert_eq!(core.select(&rect).unwrap(), vec![Action::SelectionChanged(Some(rect.clone()))]);
    assert_eq!(core.selection(), Some(&rect));
    assert!(core.select(&rect).unwrap().is_empty());
    assert_eq!(core.clear_selection(), vec![Action::SelectionChanged(None)]);
    assert!(core.clear_selection().is_empty());
}

#[test]
fn selection_is_not_a_geometry_event() {
    let mut core = manual();
    let rect = rect_at(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.settle();
    core.select(&rect).unwrap();
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
}

#[test]
fn removing_selected_shape_clears_selection() {
    let mut core = EngineCore::new();
    let rect = rect_at(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select(&rect).unwrap();
    let actions = core.remove(&rect).unwrap();
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

#[test]
fn removing_other_shape_keeps_selection() {
    let mut core = EngineCore::new();
    let a = rect_at(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = rect_at(&mut core, 20.0, 0.0, 10.0, 10.0);
    core.select(&a).unwrap();
    core.remove(&b).unwrap();
    assert_eq!(core.selection(), Some(&a));
}

// =============================================================
// Config validation
// =============================================================

fn with_threshold(threshold: f64) -> Result<EngineCore, GeometryError> {
    EngineCore::with_config(EngineConfig { threshold, ..EngineConfig::default() })
}

#[test]
fn nan_threshold_is_rejected() {
    assert_eq!(with_threshold(f64::NAN).unwrap_err(), GeometryError::NonFinite("threshold"));
}

#[test]
fn infinite_threshold_is_rejected() {
    assert_eq!(with_threshold(f64::INFINITY).unwrap_err(), GeometryError::NonFinite("threshold"));
    assert_eq!(with_threshold(f64::NEG_INFINITY).unwrap_err(), GeometryError::NonFinite("threshold"));
}

#[test]
fn negative_threshold_is_rejected() {
    assert_eq!(with_threshold(-1.0).unwrap_err(), GeometryError::Negative("threshold"));
}

#[test]
fn negative_min_size_is_rejected() {
    let config = EngineConfig { min_shape_size: -5.0, ..EngineConfig::default() };
    assert_eq!(EngineCore::with_config(config).unwrap_err(), GeometryError::Negative("min_shape_size"));
}

#[test]
fn zero_threshold_is_accepted() {
    let mut core = with_threshold(0.0).unwrap();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(items(&core), vec!["arrow0, rect0"]);
}

// =============================================================
// Toggling auto rebuild
// =============================================================

#[test]
fn enabling_auto_rebuild_settles_pending_changes() {
    let mut core = manual();
    rect_at(&mut core, 250.0, 50.0, 100.0, 100.0);
    arrow_through(&mut core, &[240.0, 40.0, 260.0, 60.0]);
    assert_eq!(core.recompute_state(), RecomputeState::Dirty);

    let actions = core.set_auto_rebuild(true);
    assert_eq!(rebuilt(&actions).map(RelationSet::items), Some(vec!["arrow0, rect0".to_owned()]));
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
    assert!(core.config().auto_rebuild);
}

#[test]
fn enabling_auto_rebuild_when_idle_does_nothing() {
    let mut core = manual();
    assert!(core.set_auto_rebuild(true).is_empty());
}

#[test]
fn disabling_auto_rebuild_leaves_changes_pending() {
    let mut core = EngineCore::new();
    assert!(core.set_auto_rebuild(false).is_empty());
    rect_at(&mut core, 0.0, 0.0, 10.0, 10.0);
    assert_eq!(core.recompute_state(), RecomputeState::Dirty);
    assert!(!core.config().auto_rebuild);
}
