//! Camera controllers
//!
//! A controller is polled once per frame and moves the camera from input it
//! has accumulated since the last poll.

use crate::foundation::math::{constants, Vec3};
use crate::render::camera::Camera;

/// Below this much pending rotation the orbit is considered at rest
const REST_EPSILON: f32 = 1e-5;

/// Keeps the orbit away from the poles where the up vector degenerates
const POLE_MARGIN: f32 = 1e-3;

/// Per-frame camera update hook
pub trait CameraController {
    /// Move the camera; returns whether it changed
    fn update(&mut self, camera: &mut Camera) -> bool;

    /// Whether motion eases out over several frames
    fn damping_enabled(&self) -> bool;
}

/// Orbit around a target point, with optional damping
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Whether pending rotation decays gradually instead of applying at once
    pub enable_damping: bool,
    /// Fraction of pending rotation consumed per frame when damping
    pub damping_factor: f32,
    /// Radians per unit of input
    pub rotate_speed: f32,
    delta_theta: f32,
    delta_phi: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::zeros(),
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
        }
    }
}

impl OrbitControls {
    /// Controls orbiting `target`
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Controls orbiting the origin with the given damping and speed
    pub fn with_settings(enable_damping: bool, damping_factor: f32, rotate_speed: f32) -> Self {
        Self {
            enable_damping,
            damping_factor,
            rotate_speed,
            ..Self::default()
        }
    }

    /// Queue a rotation; `dx` turns around the up axis, `dy` tilts
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.delta_theta -= dx * self.rotate_speed;
        self.delta_phi -= dy * self.rotate_speed;
    }

    /// Rotation not yet applied to the camera
    pub fn pending(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }
}

impl CameraController for OrbitControls {
    fn update(&mut self, camera: &mut Camera) -> bool {
        if self.delta_theta.abs() < REST_EPSILON && self.delta_phi.abs() < REST_EPSILON {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            return false;
        }

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let offset = camera.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return false;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.delta_theta * share;
        phi = (phi + self.delta_phi * share).clamp(POLE_MARGIN, constants::PI - POLE_MARGIN);

        camera.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.target = self.target;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        true
    }

    fn damping_enabled(&self) -> bool {
        self.enable_damping
    }
}
