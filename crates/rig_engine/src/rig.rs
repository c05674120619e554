//! # Light Rig
//!
//! Builds the demo scene: six lights of different kinds, one helper per
//! light, four primitives sharing one material, and the camera. Every light
//! gets a panel folder with an intensity slider, an `enable` checkbox for the
//! light and a checkbox for its helper, plus sliders for the kind-specific
//! parameters worth playing with.
//!
//! Lights start visible and helpers start hidden.

use crate::foundation::collections::NodeKey;
use crate::foundation::math::{constants, Vec3};
use crate::panel::{
    wire_derived_effects, DebugPanel, FlagField, FolderId, NumericField, PanelError,
};
use crate::render::camera::Camera;
use crate::render::helpers::LightHelper;
use crate::render::lighting::{color_from_hex, Light};
use crate::render::mesh::{Mesh, Primitive, StandardMaterial};
use crate::scene::SceneGraph;

/// Roughness of the material shared by every mesh
pub const MATERIAL_ROUGHNESS: f32 = 0.4;

/// Keys of everything the rig adds to the scene
#[derive(Debug, Clone, Copy)]
pub struct RigHandles {
    /// Ambient light
    pub ambient: NodeKey,
    /// Directional light
    pub directional: NodeKey,
    /// Hemisphere light
    pub hemisphere: NodeKey,
    /// Point light
    pub point: NodeKey,
    /// Rectangular area light
    pub rect_area: NodeKey,
    /// Spot light
    pub spot: NodeKey,
    /// Sphere mesh
    pub sphere: NodeKey,
    /// Cube mesh
    pub cube: NodeKey,
    /// Torus mesh
    pub torus: NodeKey,
    /// Floor plane
    pub plane: NodeKey,
    /// Viewing camera
    pub camera: NodeKey,
}

impl RigHandles {
    /// Light keys in rig order
    pub fn lights(&self) -> [NodeKey; 6] {
        [
            self.ambient,
            self.directional,
            self.hemisphere,
            self.point,
            self.rect_area,
            self.spot,
        ]
    }

    /// Meshes the animation driver rotates
    pub fn animated(&self) -> [NodeKey; 3] {
        [self.sphere, self.cube, self.torus]
    }
}

/// Light with its helper already registered
fn add_light_with_helper(scene: &mut SceneGraph, light: Light) -> NodeKey {
    let key = scene.add_light(light);
    if let Some(light) = scene.light(key) {
        let helper = LightHelper::new(key, light);
        scene.add_helper(helper);
    }
    key
}

/// Add the rig's lights, helpers, meshes and `camera` to `scene`
pub fn build_scene(scene: &mut SceneGraph, camera: Camera) -> RigHandles {
    let ambient = add_light_with_helper(
        scene,
        Light::ambient("ambient", color_from_hex(0xffffff), 0.5),
    );
    let directional = add_light_with_helper(
        scene,
        Light::directional(
            "directional",
            color_from_hex(0x00fffc),
            0.3,
            Vec3::new(1.0, 0.5, 0.0),
        ),
    );
    let hemisphere = add_light_with_helper(
        scene,
        Light::hemisphere(
            "hemisphere",
            color_from_hex(0xff0000),
            color_from_hex(0x0000ff),
            0.3,
        ),
    );
    let point = add_light_with_helper(
        scene,
        Light::point(
            "point",
            color_from_hex(0xff9000),
            0.5,
            Vec3::new(1.0, -0.5, 1.0),
            3.0,
            2.0,
        ),
    );
    let rect_area = add_light_with_helper(
        scene,
        Light::rect_area(
            "rectArea",
            color_from_hex(0x4e00ff),
            2.0,
            (1.0, 1.0),
            Vec3::new(-1.5, 0.5, 1.5),
            Vec3::zeros(),
        ),
    );
    let spot = add_light_with_helper(
        scene,
        Light::spot(
            "spotLight",
            color_from_hex(0x78ff00),
            0.5,
            10.0,
            constants::PI * 0.1,
            0.25,
            1.0,
        )
        .with_position(Vec3::new(0.0, 2.0, 3.0))
        .with_target(Vec3::new(-0.75, 0.0, 0.0)),
    );

    let material = scene.add_material(StandardMaterial {
        roughness: MATERIAL_ROUGHNESS,
        ..StandardMaterial::default()
    });

    let sphere = scene.add_mesh(
        Mesh::new(
            "sphere",
            Primitive::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            material.clone(),
        )
        .at(Vec3::new(-1.5, 0.0, 0.0)),
    );
    let cube = scene.add_mesh(Mesh::new(
        "cube",
        Primitive::Box {
            width: 0.75,
            height: 0.75,
            depth: 0.75,
        },
        material.clone(),
    ));
    let torus = scene.add_mesh(
        Mesh::new(
            "torus",
            Primitive::Torus {
                radius: 0.3,
                tube: 0.2,
                radial_segments: 32,
                tubular_segments: 64,
            },
            material.clone(),
        )
        .at(Vec3::new(1.5, 0.0, 0.0)),
    );
    let plane = scene.add_mesh(
        Mesh::new(
            "plane",
            Primitive::Plane {
                width: 5.0,
                height: 5.0,
            },
            material,
        )
        .at(Vec3::new(0.0, -0.65, 0.0))
        .rotated(Vec3::new(-constants::HALF_PI, 0.0, 0.0)),
    );

    let camera = scene.add_camera(camera);

    log::info!("Light rig built: {} scene nodes", scene.len());
    RigHandles {
        ambient,
        directional,
        hemisphere,
        point,
        rect_area,
        spot,
        sphere,
        cube,
        torus,
        plane,
        camera,
    }
}

/// Intensity slider plus the light and helper checkboxes shared by every folder
fn bind_common(
    panel: &mut DebugPanel,
    scene: &SceneGraph,
    folder: FolderId,
    light: NodeKey,
    intensity_max: f32,
) -> Result<(), PanelError> {
    panel.bind_numeric(
        scene,
        folder,
        light,
        NumericField::Intensity,
        (0.0, intensity_max),
        0.01,
        "intensity",
    )?;
    panel.bind_boolean(scene, folder, light, FlagField::Visible, "enable")?;
    Ok(())
}

fn bind_helper_toggle(
    panel: &mut DebugPanel,
    scene: &SceneGraph,
    folder: FolderId,
    light: NodeKey,
    label: &str,
) -> Result<(), PanelError> {
    let helper = scene
        .helper_of(light)
        .ok_or_else(|| PanelError::OwnerMissing(label.to_string()))?;
    panel.bind_boolean(scene, folder, helper, FlagField::Visible, label)?;
    Ok(())
}

/// Create one folder per light and hook up the derived updates
///
/// Returns the number of derived-update hooks attached.
pub fn wire_panel(
    panel: &mut DebugPanel,
    scene: &SceneGraph,
    rig: &RigHandles,
) -> Result<usize, PanelError> {
    let folder = panel.add_folder("ambient");
    bind_common(panel, scene, folder, rig.ambient, 1.0)?;
    bind_helper_toggle(panel, scene, folder, rig.ambient, "ambientLightHelper")?;

    let folder = panel.add_folder("directional");
    bind_common(panel, scene, folder, rig.directional, 1.0)?;
    bind_helper_toggle(panel, scene, folder, rig.directional, "directionalLightHelper")?;

    let folder = panel.add_folder("hemisphere");
    bind_common(panel, scene, folder, rig.hemisphere, 1.0)?;
    bind_helper_toggle(panel, scene, folder, rig.hemisphere, "hemisphereLightHelper")?;

    let folder = panel.add_folder("point");
    bind_common(panel, scene, folder, rig.point, 1.0)?;
    panel.bind_numeric(scene, folder, rig.point, NumericField::Distance, (0.0, 5.0), 0.1, "distance")?;
    panel.bind_numeric(scene, folder, rig.point, NumericField::Decay, (0.0, 10.0), 0.1, "decay")?;
    bind_helper_toggle(panel, scene, folder, rig.point, "pointLightHelper")?;

    let folder = panel.add_folder("rectArea");
    bind_common(panel, scene, folder, rig.rect_area, 5.0)?;
    bind_helper_toggle(panel, scene, folder, rig.rect_area, "rectAreaLightHelper")?;

    let folder = panel.add_folder("spotLight");
    panel.bind_numeric(
        scene,
        folder,
        rig.spot,
        NumericField::Intensity,
        (0.0, 1.0),
        0.01,
        "intensity",
    )?;
    panel.bind_numeric(scene, folder, rig.spot, NumericField::Distance, (0.0, 15.0), 0.01, "distance")?;
    panel.bind_numeric(
        scene,
        folder,
        rig.spot,
        NumericField::Angle,
        (0.0, constants::HALF_PI),
        0.1,
        "angle",
    )?;
    panel.bind_numeric(scene, folder, rig.spot, NumericField::Penumbra, (0.0, 1.0), 0.1, "penumbra")?;
    panel.bind_boolean(scene, folder, rig.spot, FlagField::Visible, "enable")?;
    bind_helper_toggle(panel, scene, folder, rig.spot, "spotLightHelper")?;

    let hooks = wire_derived_effects(panel, scene);
    log::info!(
        "Debug panel ready: {} folders, {} controls",
        panel.folders().len(),
        panel.bindings().count()
    );
    Ok(hooks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{FieldAccess, ParamValue};
    use crate::render::lighting::{LightKind, LightShape};
    use approx::assert_relative_eq;

    fn rig() -> (SceneGraph, DebugPanel, RigHandles, usize) {
        let mut scene = SceneGraph::new();
        let mut panel = DebugPanel::new();
        let handles = build_scene(&mut scene, Camera::default());
        let hooks = wire_panel(&mut panel, &scene, &handles).unwrap();
        (scene, panel, handles, hooks)
    }

    #[test]
    fn test_six_lights_one_of_each_kind() {
        let (scene, _, handles, _) = rig();
        let kinds: Vec<_> = scene.lights().map(|(_, light)| light.kind()).collect();
        assert_eq!(kinds, LightKind::ALL.to_vec());
        for key in handles.lights() {
            assert!(scene.light(key).unwrap().visible);
            let helper = scene.helper_of(key).unwrap();
            assert!(!scene.helper(helper).unwrap().visible);
        }
        assert_eq!(scene.helpers().count(), 6);
    }

    #[test]
    fn test_light_literals() {
        let (scene, _, handles, _) = rig();

        let ambient = scene.light(handles.ambient).unwrap();
        assert_relative_eq!(ambient.intensity, 0.5);
        assert_relative_eq!(ambient.color, Vec3::new(1.0, 1.0, 1.0));

        let directional = scene.light(handles.directional).unwrap();
        assert_relative_eq!(directional.intensity, 0.3);
        assert_eq!(directional.position(), Some(Vec3::new(1.0, 0.5, 0.0)));
        assert_relative_eq!(directional.color, color_from_hex(0x00fffc));

        let hemisphere = scene.light(handles.hemisphere).unwrap();
        assert_relative_eq!(hemisphere.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hemisphere.ground_color(), Some(Vec3::new(0.0, 0.0, 1.0)));

        let point = scene.light(handles.point).unwrap();
        assert_eq!(point.position(), Some(Vec3::new(1.0, -0.5, 1.0)));
        assert_eq!(point.numeric(NumericField::Distance), Some(3.0));
        assert_eq!(point.numeric(NumericField::Decay), Some(2.0));

        let rect = scene.light(handles.rect_area).unwrap();
        assert_relative_eq!(rect.intensity, 2.0);
        assert_eq!(rect.target(), Some(Vec3::zeros()));
        assert_eq!(rect.numeric(NumericField::Width), Some(1.0));

        let spot = scene.light(handles.spot).unwrap();
        match spot.shape {
            LightShape::Spot {
                position,
                target,
                distance,
                angle,
                penumbra,
                decay,
            } => {
                assert_eq!(position, Vec3::new(0.0, 2.0, 3.0));
                assert_eq!(target, Vec3::new(-0.75, 0.0, 0.0));
                assert_relative_eq!(distance, 10.0);
                assert_relative_eq!(angle, constants::PI * 0.1);
                assert_relative_eq!(penumbra, 0.25);
                assert_relative_eq!(decay, 1.0);
            }
            ref other => panic!("expected a spot light, got {other:?}"),
        }
    }

    #[test]
    fn test_meshes_share_one_material() {
        let (scene, _, handles, _) = rig();
        assert_eq!(scene.materials().len(), 1);
        let shared = &scene.materials()[0];
        assert_relative_eq!(shared.roughness, MATERIAL_ROUGHNESS);
        for (_, mesh) in scene.meshes() {
            assert!(std::rc::Rc::ptr_eq(mesh.material(), shared));
        }

        let plane = scene.mesh(handles.plane).unwrap();
        assert_relative_eq!(plane.transform.position.y, -0.65);
        assert_relative_eq!(plane.transform.rotation.x, -constants::HALF_PI);
        assert!(!handles.animated().contains(&handles.plane));
    }

    #[test]
    fn test_panel_folders_and_labels() {
        let (_, panel, _, _) = rig();
        let names: Vec<_> = panel.folders().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(
            names,
            ["ambient", "directional", "hemisphere", "point", "rectArea", "spotLight"]
        );
        assert!(panel.folders().iter().all(|f| f.is_collapsed()));
        assert!(panel.find("point", "decay").is_ok());
        assert!(panel.find("spotLight", "penumbra").is_ok());
        assert!(panel.find("rectArea", "rectAreaLightHelper").is_ok());
        assert!(panel.find("ambient", "distance").is_err());
    }

    #[test]
    fn test_exactly_two_refresh_hooks() {
        let (_, panel, _, hooks) = rig();
        assert_eq!(hooks, 2);
        let hooked: usize = panel.bindings().map(|(_, b)| b.handler_count()).sum();
        assert_eq!(hooked, 2);
        let angle = panel.find("spotLight", "angle").unwrap();
        let distance = panel.find("spotLight", "distance").unwrap();
        assert_eq!(panel.binding(angle).unwrap().handler_count(), 1);
        assert_eq!(panel.binding(distance).unwrap().handler_count(), 1);
    }

    #[test]
    fn test_rect_area_intensity_goes_to_five() {
        let (mut scene, mut panel, handles, _) = rig();
        let id = panel.find("rectArea", "intensity").unwrap();
        assert_eq!(panel.set_number(&mut scene, id, 9.0).unwrap(), 5.0);
        assert_relative_eq!(scene.light(handles.rect_area).unwrap().intensity, 5.0);
    }

    #[test]
    fn test_helper_toggle_shows_gizmo() {
        let (mut scene, mut panel, handles, _) = rig();
        let id = panel.find("spotLight", "spotLightHelper").unwrap();
        panel.edit(&mut scene, id, ParamValue::Flag(true)).unwrap();
        let helper = scene.helper_of(handles.spot).unwrap();
        assert!(scene.helper(helper).unwrap().visible);
        assert_eq!(scene.helper(helper).unwrap().revision(), 0);
    }
}
