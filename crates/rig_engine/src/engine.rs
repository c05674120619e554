//! Core engine implementation

use thiserror::Error;

use crate::animation::AnimationDriver;
use crate::config::{ConfigError, RigConfig};
use crate::controls::{CameraController, OrbitControls};
use crate::panel::{DebugPanel, PanelError};
use crate::render::backend::{FrameStats, RenderBackend, RenderError};
use crate::render::camera::Camera;
use crate::render_loop::LoopEvent;
use crate::rig::{self, RigHandles};
use crate::scene::SceneGraph;
use crate::viewport::Viewport;

/// Main engine struct
///
/// Owns every piece of state the render loop, the panel and the resize path
/// touch. Nothing lives in globals; the loop borrows the engine for one tick
/// at a time.
pub struct Engine<B: RenderBackend> {
    /// Everything that gets drawn
    pub scene: SceneGraph,

    /// Live parameter controls
    pub panel: DebugPanel,

    /// Keys of the rig's scene nodes
    pub rig: RigHandles,

    /// Surface size and pixel ratio
    pub viewport: Viewport,

    /// Camera orbit controls
    pub controls: OrbitControls,

    /// Mesh rotation
    pub animation: AnimationDriver,

    backend: B,
}

impl<B: RenderBackend> Engine<B> {
    /// Build the rig described by `config` and size `backend` to the window
    pub fn new(config: &RigConfig, mut backend: B) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");

        let window = &config.window;
        let viewport = Viewport::new(window.width, window.height, window.pixel_ratio);
        let aspect = viewport.aspect().unwrap_or(1.0);
        let camera = Camera::perspective(
            config.camera.position(),
            config.camera.fov,
            aspect,
            config.camera.near,
            config.camera.far,
        );

        let mut scene = SceneGraph::new();
        let handles = rig::build_scene(&mut scene, camera);
        let mut panel = DebugPanel::new();
        rig::wire_panel(&mut panel, &scene, &handles)?;

        let controls = OrbitControls::with_settings(
            config.controls.enable_damping,
            config.controls.damping_factor,
            config.controls.rotate_speed,
        );

        backend.set_size(viewport.width, viewport.height);
        backend.set_pixel_ratio(viewport.pixel_ratio);

        Ok(Self {
            scene,
            panel,
            animation: AnimationDriver::new(handles.animated()),
            rig: handles,
            viewport,
            controls,
            backend,
        })
    }

    /// Rendering backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable rendering backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The viewing camera
    pub fn camera(&self) -> Result<&Camera, EngineError> {
        self.scene
            .camera(self.rig.camera)
            .ok_or(EngineError::MissingCamera)
    }

    /// Apply a resize signal
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<(), EngineError> {
        let camera = self
            .scene
            .camera_mut(self.rig.camera)
            .ok_or(EngineError::MissingCamera)?;
        self.viewport
            .resize(width, height, pixel_ratio, camera, &mut self.backend);
        Ok(())
    }

    /// Apply one host event
    pub fn handle_event(&mut self, event: LoopEvent) -> Result<(), EngineError> {
        match event {
            LoopEvent::Resize {
                width,
                height,
                pixel_ratio,
            } => self.resize(width, height, pixel_ratio)?,
            LoopEvent::SetNumber {
                folder,
                label,
                value,
            } => {
                let id = self.panel.find(&folder, &label)?;
                self.panel.set_number(&mut self.scene, id, value)?;
            }
            LoopEvent::Toggle {
                folder,
                label,
                value,
            } => {
                let id = self.panel.find(&folder, &label)?;
                match value {
                    Some(value) => self.panel.set_flag(&mut self.scene, id, value)?,
                    None => self.panel.toggle(&mut self.scene, id)?,
                };
            }
            LoopEvent::OpenFolder(name) => self.panel.open_folder(&name)?,
            LoopEvent::CloseFolder(name) => self.panel.close_folder(&name)?,
            LoopEvent::Orbit { dx, dy } => self.controls.rotate(dx, dy),
            LoopEvent::DescribePanel => {
                log::info!("Debug panel:\n{}", self.panel.describe(&self.scene));
            }
            LoopEvent::Cancel => {}
        }
        Ok(())
    }

    /// Animate, update the camera and draw the frame for elapsed time `t`
    pub fn frame(&mut self, t: f32) -> Result<FrameStats, RenderError> {
        self.animation.apply(&mut self.scene, t);

        let camera = self
            .scene
            .camera_mut(self.rig.camera)
            .ok_or(RenderError::SurfaceLost)?;
        self.controls.update(camera);
        if camera.needs_projection_update() {
            camera.update_projection_matrix();
        }

        let camera = self
            .scene
            .camera(self.rig.camera)
            .ok_or(RenderError::SurfaceLost)?;
        self.backend.render(&self.scene, camera)
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A panel operation failed
    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    /// The backend failed outside of a frame
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The scene has no camera
    #[error("Scene has no camera")]
    MissingCamera,

    /// The render loop was cancelled and cannot run again
    #[error("Render loop was cancelled")]
    LoopCancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessBackend;
    use approx::assert_relative_eq;

    fn engine() -> Engine<HeadlessBackend> {
        Engine::new(&RigConfig::default(), HeadlessBackend::new(1, 1)).unwrap()
    }

    #[test]
    fn test_new_sizes_backend_from_config() {
        let engine = engine();
        assert_eq!(engine.backend().size(), (800, 600));
        assert_relative_eq!(engine.camera().unwrap().aspect(), 800.0 / 600.0);
        assert_eq!(engine.scene.lights().count(), 6);
    }

    #[test]
    fn test_controls_follow_config() {
        let mut config = RigConfig::default();
        config.controls.enable_damping = false;
        config.controls.rotate_speed = 0.5;
        let engine = Engine::new(&config, HeadlessBackend::new(1, 1)).unwrap();
        assert!(!engine.controls.damping_enabled());
        assert_relative_eq!(engine.controls.rotate_speed, 0.5);
    }

    #[test]
    fn test_panel_events_reach_scene() {
        let mut engine = engine();
        engine
            .handle_event(LoopEvent::SetNumber {
                folder: "point".into(),
                label: "distance".into(),
                value: 9.0,
            })
            .unwrap();
        let point = engine.scene.light(engine.rig.point).unwrap();
        assert_eq!(
            crate::panel::FieldAccess::numeric(point, crate::panel::NumericField::Distance),
            Some(5.0)
        );

        engine
            .handle_event(LoopEvent::Toggle {
                folder: "point".into(),
                label: "enable".into(),
                value: None,
            })
            .unwrap();
        assert!(!engine.scene.light(engine.rig.point).unwrap().visible);
    }

    #[test]
    fn test_unknown_control_is_an_error() {
        let mut engine = engine();
        let err = engine
            .handle_event(LoopEvent::SetNumber {
                folder: "point".into(),
                label: "angle".into(),
                value: 1.0,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Panel(PanelError::UnknownBinding(_))));
    }

    #[test]
    fn test_frame_clears_projection_dirty_flag() {
        let mut engine = engine();
        engine.resize(1000, 500, 1.0).unwrap();
        assert!(engine.camera().unwrap().needs_projection_update());

        let stats = engine.frame(0.0).unwrap();
        assert_eq!(stats.frame, 1);
        let camera = engine.camera().unwrap();
        assert!(!camera.needs_projection_update());
        assert_relative_eq!(camera.aspect(), 2.0);
    }
}
