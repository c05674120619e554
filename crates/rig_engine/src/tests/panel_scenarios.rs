use approx::assert_relative_eq;

use super::support::RecordingBackend;
use crate::config::RigConfig;
use crate::foundation::math::constants;
use crate::panel::{FieldAccess, NumericField, ParamValue};
use crate::render::helpers::HelperGeometry;
use crate::Engine;

fn engine() -> Engine<RecordingBackend> {
    Engine::new(&RigConfig::default(), RecordingBackend::new()).unwrap()
}

fn spot_helper_revision(engine: &Engine<RecordingBackend>) -> u64 {
    let helper = engine.scene.helper_of(engine.rig.spot).unwrap();
    engine.scene.helper(helper).unwrap().revision()
}

#[test]
fn test_spot_cone_edits_refresh_helper_once_each() {
    let mut engine = engine();
    let angle = engine.panel.find("spotLight", "angle").unwrap();
    let distance = engine.panel.find("spotLight", "distance").unwrap();

    engine.panel.set_number(&mut engine.scene, angle, 0.8).unwrap();
    assert_eq!(spot_helper_revision(&engine), 1);

    engine.panel.set_number(&mut engine.scene, distance, 4.0).unwrap();
    assert_eq!(spot_helper_revision(&engine), 2);

    let helper = engine.scene.helper_of(engine.rig.spot).unwrap();
    match engine.scene.helper(helper).unwrap().geometry() {
        HelperGeometry::Cone { length, radius, .. } => {
            assert_relative_eq!(*length, 4.0);
            assert_relative_eq!(*radius, 4.0 * 0.8_f32.tan(), epsilon = 1e-4);
        }
        other => panic!("expected a cone, got {other:?}"),
    }
}

#[test]
fn test_other_edits_do_not_refresh() {
    let mut engine = engine();
    for label in ["intensity", "penumbra"] {
        let id = engine.panel.find("spotLight", label).unwrap();
        engine.panel.set_number(&mut engine.scene, id, 0.7).unwrap();
    }
    let enable = engine.panel.find("spotLight", "enable").unwrap();
    engine.panel.set_flag(&mut engine.scene, enable, false).unwrap();
    assert_eq!(spot_helper_revision(&engine), 0);

    let point_distance = engine.panel.find("point", "distance").unwrap();
    engine.panel.set_number(&mut engine.scene, point_distance, 1.0).unwrap();
    let point_helper = engine.scene.helper_of(engine.rig.point).unwrap();
    assert_eq!(engine.scene.helper(point_helper).unwrap().revision(), 0);
}

#[test]
fn test_direct_write_leaves_helper_stale() {
    let mut engine = engine();
    let spot = engine.rig.spot;
    *engine
        .scene
        .light_mut(spot)
        .unwrap()
        .numeric_mut(NumericField::Angle)
        .unwrap() = 1.0;

    let helper_key = engine.scene.helper_of(spot).unwrap();
    let helper = engine.scene.helper(helper_key).unwrap();
    assert_eq!(helper.revision(), 0);
    assert!(helper.is_stale(engine.scene.light(spot).unwrap()));
}

#[test]
fn test_out_of_range_writes_store_boundary() {
    let mut engine = engine();
    let angle = engine.panel.find("spotLight", "angle").unwrap();
    let stored = engine.panel.set_number(&mut engine.scene, angle, 5.0).unwrap();
    assert_relative_eq!(stored, constants::HALF_PI);
    assert_eq!(
        engine.panel.value(&engine.scene, angle).unwrap(),
        ParamValue::Number(constants::HALF_PI)
    );

    let decay = engine.panel.find("point", "decay").unwrap();
    assert_eq!(engine.panel.set_number(&mut engine.scene, decay, -2.0).unwrap(), 0.0);
    let point = engine.scene.light(engine.rig.point).unwrap();
    assert_eq!(point.numeric(NumericField::Decay), Some(0.0));
}

#[test]
fn test_spot_angle_at_maximum_keeps_cone_open() {
    let mut engine = engine();
    let angle = engine.panel.find("spotLight", "angle").unwrap();
    engine.panel.set_number(&mut engine.scene, angle, 99.0).unwrap();
    assert_eq!(spot_helper_revision(&engine), 1);

    let helper = engine.scene.helper_of(engine.rig.spot).unwrap();
    match engine.scene.helper(helper).unwrap().geometry() {
        HelperGeometry::Cone { radius, .. } => {
            assert!(radius.is_finite());
            assert!(*radius >= 0.0);
        }
        other => panic!("expected a cone, got {other:?}"),
    }
}

#[test]
fn test_helper_toggles_are_independent_of_lights() {
    let mut engine = engine();
    let gizmo = engine.panel.find("directional", "directionalLightHelper").unwrap();
    engine.panel.toggle(&mut engine.scene, gizmo).unwrap();

    let helper = engine.scene.helper_of(engine.rig.directional).unwrap();
    assert!(engine.scene.helper(helper).unwrap().visible);
    assert!(engine.scene.light(engine.rig.directional).unwrap().visible);

    let enable = engine.panel.find("directional", "enable").unwrap();
    engine.panel.toggle(&mut engine.scene, enable).unwrap();
    assert!(!engine.scene.light(engine.rig.directional).unwrap().visible);
    assert!(engine.scene.helper(helper).unwrap().visible);
}

#[test]
fn test_resize_twice_matches_resize_once() {
    let mut engine = engine();
    engine.resize(1280, 720, 1.5).unwrap();
    engine.frame(0.0).unwrap();
    let viewport = engine.viewport;
    let projection = *engine.camera().unwrap().projection_matrix();

    engine.resize(1280, 720, 1.5).unwrap();
    engine.frame(0.0).unwrap();
    assert_eq!(engine.viewport, viewport);
    assert_eq!(*engine.camera().unwrap().projection_matrix(), projection);
    assert_eq!(engine.backend().sizes.last(), Some(&(1280, 720)));
    assert_eq!(engine.backend().pixel_ratios.last(), Some(&1.5));
}
