#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ShapeKind;
use crate::input::RecomputeState;

const TOUCHING: &str = r#"{
    "threshold": 0,
    "shapes": [
        { "kind": "rect", "x": 250, "y": 50, "width": 100, "height": 100 },
        { "kind": "arrow", "points": [240, 40, 260, 60] }
    ]
}"#;

// =============================================================
// Parsing
// =============================================================

#[test]
fn parses_kinds_and_transforms() {
    let scene = Scene::from_json(TOUCHING).unwrap();
    assert_eq!(scene.threshold, Some(0.0));
    assert_eq!(scene.shapes.len(), 2);
    assert_eq!(scene.shapes[0].geometry, ShapeGeometry::Rect { width: 100.0, height: 100.0 });
    assert_eq!(scene.shapes[0].transform, Transform::at(250.0, 50.0));
    assert_eq!(scene.shapes[1].geometry.kind(), ShapeKind::Arrow);
    assert_eq!(scene.shapes[1].transform, Transform::default());
}

#[test]
fn parses_rotation_and_scale() {
    let scene = Scene::from_json(
        r#"{"shapes": [{"kind": "image", "x": 1.5, "y": 2.5, "rotation": 90.0, "scale_x": 2.0, "width": 10.0, "height": 20.0}]}"#,
    )
    .unwrap();
    let t = scene.shapes[0].transform;
    assert_eq!(t.rotation, 90.0);
    assert_eq!(t.scale_x, 2.0);
    assert_eq!(t.scale_y, 1.0);
    assert!(scene.threshold.is_none());
}

#[test]
fn empty_object_is_empty_scene() {
    assert_eq!(Scene::from_json("{}").unwrap(), Scene::default());
}

#[test]
fn unknown_kind_is_a_json_error() {
    let err = Scene::from_json(r#"{"shapes": [{"kind": "star", "x": 0, "y": 0}]}"#).unwrap_err();
    assert!(matches!(err, SceneError::Json(_)));
}

#[test]
fn garbage_is_a_json_error() {
    assert!(matches!(Scene::from_json("not json").unwrap_err(), SceneError::Json(_)));
}

// =============================================================
// into_engine
// =============================================================

#[test]
fn engine_is_settled_with_relations() {
    let core = Scene::from_json(TOUCHING).unwrap().into_engine(EngineConfig::default()).unwrap();
    assert_eq!(core.recompute_state(), RecomputeState::Idle);
    assert_eq!(core.relations().items(), vec!["arrow0, rect0"]);
    assert!(core.config().auto_rebuild);
}

#[test]
fn scene_threshold_overrides_config() {
    let scene = Scene::from_json(
        r#"{"threshold": 10, "shapes": [
            {"kind": "rect", "x": 100, "y": 0, "width": 100, "height": 100},
            {"kind": "arrow", "points": [0, 50, 92, 50]}
        ]}"#,
    )
    .unwrap();
    let core = scene.into_engine(EngineConfig::default()).unwrap();
    assert_eq!(core.config().threshold, 10.0);
    assert_eq!(core.relations().len(), 1);
}

#[test]
fn config_threshold_used_when_scene_has_none() {
    let scene = Scene::from_json(
        r#"{"shapes": [
            {"kind": "rect", "x": 100, "y": 0, "width": 100, "height": 100},
            {"kind": "arrow", "points": [0, 50, 92, 50]}
        ]}"#,
    )
    .unwrap();
    let config = EngineConfig { threshold: 8.0, ..EngineConfig::default() };
    let core = scene.into_engine(config).unwrap();
    assert_eq!(core.relations().items(), vec!["arrow0, rect0"]);
}

#[test]
fn invalid_shape_names_its_index() {
    let scene = Scene::from_json(r#"{"shapes": [{"kind": "rect", "width": 1, "height": 1}, {"kind": "arrow", "points": [1, 2, 3]}]}"#)
        .unwrap();
    let err = scene.into_engine(EngineConfig::default()).unwrap_err();
    match err {
        SceneError::Shape { index, .. } => assert_eq!(index, 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn manual_config_is_kept_after_load() {
    let config = EngineConfig { auto_rebuild: false, ..EngineConfig::default() };
    let core = Scene::from_json(TOUCHING).unwrap().into_engine(config).unwrap();
    assert!(!core.config().auto_rebuild);
    assert_eq!(core.relations().len(), 1);
}

#[test]
fn negative_scene_threshold_is_rejected() {
    let scene = Scene::from_json(r#"{"threshold": -1000, "shapes": []}"#).unwrap();
    let err = scene.into_engine(EngineConfig::default()).unwrap_err();
    assert!(matches!(err, SceneError::Config(GeometryError::Negative("threshold"))));
}

#[test]
fn scene_threshold_is_checked_after_override() {
    let config = EngineConfig { threshold: f64::NAN, ..EngineConfig::default() };
    let core = Scene::from_json(TOUCHING).unwrap().into_engine(config).unwrap();
    assert_eq!(core.config().threshold, 0.0);
    assert_eq!(core.relations().items(), vec!["arrow0, rect0"]);
}

#[test]
fn invalid_config_threshold_without_override_is_rejected() {
    let config = EngineConfig { threshold: f64::INFINITY, ..EngineConfig::default() };
    let err = Scene::default().into_engine(config).unwrap_err();
    assert!(matches!(err, SceneError::Config(GeometryError::NonFinite("threshold"))));
}
