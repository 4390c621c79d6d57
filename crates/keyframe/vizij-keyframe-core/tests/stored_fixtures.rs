use std::sync::Arc;

use vizij_keyframe_core::{
    parse_keyframes_json, to_keyframes_json, Direction, InterpRegistry, KeyframeAnimation,
    KeyframeDocument, RectF, Value,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load_fixture(name: &str) -> KeyframeDocument {
    let json = vizij_test_fixtures::keyframes::json(name).expect("load keyframe fixture");
    parse_keyframes_json(&json).expect("parse keyframe fixture")
}

fn build(name: &str) -> KeyframeAnimation {
    load_fixture(name)
        .build_with_registry(Arc::new(InterpRegistry::new()))
        .expect("build engine")
}

/// it should list every fixture in the manifest
#[test]
fn manifest_lists_keyframe_fixtures() {
    let mut keys = vizij_test_fixtures::keyframes::keys();
    keys.sort();
    assert_eq!(keys, vec!["default-fill", "int-ramp", "mixed-kinds", "rect-grow"]);
}

/// it should sort an unsorted fixture and interpolate the int ramp
#[test]
fn int_ramp_fixture() {
    assert_eq!(
        vizij_test_fixtures::keyframes::progresses("int-ramp").unwrap(),
        vec![1.0, 0.0]
    );
    let mut anim = build("int-ramp");
    assert_eq!(anim.duration(), 1000);
    let progresses: Vec<f64> = anim.key_values().iter().map(|k| k.progress).collect();
    assert_eq!(progresses, vec![0.0, 1.0]);

    anim.on_time_advanced(250);
    assert_eq!(anim.current_value(), Some(Value::Int(25)));
    anim.on_time_advanced(1000);
    assert_eq!(anim.current_value(), Some(Value::Int(100)));
}

/// it should honor timing overrides layered onto a stored fixture
#[test]
fn int_ramp_with_overrides() {
    let json = vizij_test_fixtures::keyframes::json_with(
        "int-ramp",
        serde_json::json!({ "duration_ms": 2000, "direction": "backward" }),
    )
    .unwrap();
    let doc = parse_keyframes_json(&json).unwrap();
    assert_eq!(doc.direction(), Direction::Backward);

    let mut anim = doc
        .build_with_registry(Arc::new(InterpRegistry::new()))
        .unwrap();
    assert_eq!(anim.duration(), 2000);
    anim.on_time_advanced(500);
    assert_eq!(anim.current_value(), Some(Value::Int(75)));
}

/// it should blend RectF component-wise across the second interval
#[test]
fn rect_grow_fixture() {
    let mut anim = build("rect-grow");
    anim.on_time_advanced(300);
    match anim.current_value() {
        Some(Value::RectF(r)) => {
            approx(r.x, 15.0, 1e-9);
            approx(r.y, 20.0, 1e-9);
            approx(r.width, 40.0, 1e-9);
            approx(r.height, 20.0, 1e-9);
        }
        other => panic!("expected RectF, got {other:?}"),
    }
    assert_eq!(
        anim.key_value_at(0.5),
        Some(&Value::RectF(RectF::new(10.0, 20.0, 30.0, 30.0)))
    );
}

/// it should fill the open end from the default value and honor backward direction
#[test]
fn default_fill_fixture() {
    let mut anim = build("default-fill");
    assert_eq!(anim.direction(), Direction::Backward);
    assert_eq!(anim.default_start_end_value(), Some(&Value::Double(1.0)));

    anim.on_time_advanced(50);
    match anim.current_value() {
        Some(Value::Double(v)) => approx(v, 2.0, 1e-9),
        other => panic!("expected Double, got {other:?}"),
    }
    anim.on_time_advanced(200);
    assert_eq!(anim.current_value(), Some(Value::Double(1.0)));
}

/// it should yield an absent value between mismatched kinds
#[test]
fn mixed_kinds_fixture() {
    let mut anim = build("mixed-kinds");
    anim.on_time_advanced(50);
    assert_eq!(anim.current_value(), None);
    assert_eq!(anim.key_values().len(), 2);
}

/// it should reproduce the same document after serializing an engine
#[test]
fn document_survives_engine_round_trip() {
    let doc = load_fixture("default-fill");
    let anim = doc
        .build_with_registry(Arc::new(InterpRegistry::new()))
        .unwrap();
    let json = to_keyframes_json(&anim).unwrap();
    assert_eq!(parse_keyframes_json(&json).unwrap(), doc);
}
