//! GPU uniform layouts
//!
//! `#[repr(C)]` blocks laid out in vec4 slots so they match std140 without
//! hidden padding. Every block is `Pod`, so uploading is a byte cast.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec3;
use crate::render::camera::Camera;
use crate::render::lighting::{Light, LightKind, LightShape};
use crate::scene::SceneGraph;

/// Lights a single lighting block can carry
pub const MAX_LIGHTS: usize = 8;

/// Kind code stored in `position.w`
fn kind_code(kind: LightKind) -> f32 {
    match kind {
        LightKind::Ambient => 0.0,
        LightKind::Directional => 1.0,
        LightKind::Hemisphere => 2.0,
        LightKind::Point => 3.0,
        LightKind::RectArea => 4.0,
        LightKind::Spot => 5.0,
    }
}

/// One light as the shader sees it
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// World position (xyz) and kind code (w)
    pub position: [f32; 4],
    /// Normalized direction (xyz) and range cutoff (w, 0 = unlimited)
    pub direction: [f32; 4],
    /// Color (rgb) and intensity (a)
    pub color: [f32; 4],
    /// Cosine of the spot angle, spot penumbra, decay, unused
    pub params: [f32; 4],
    /// Ground color for hemisphere lights, or area width/height in xy
    pub extra: [f32; 4],
}

impl LightUniform {
    /// Pack a light into shader layout
    pub fn from_light(light: &Light) -> Self {
        let position = light.position().unwrap_or_else(Vec3::zeros);
        let direction = light.direction().unwrap_or_else(Vec3::zeros);
        let mut uniform = Self {
            position: [position.x, position.y, position.z, kind_code(light.kind())],
            direction: [direction.x, direction.y, direction.z, 0.0],
            color: [light.color.x, light.color.y, light.color.z, light.intensity],
            ..Self::zeroed()
        };

        match light.shape {
            LightShape::Hemisphere { ground_color, .. } => {
                uniform.extra = [ground_color.x, ground_color.y, ground_color.z, 0.0];
            }
            LightShape::Point {
                distance, decay, ..
            } => {
                uniform.direction[3] = distance;
                uniform.params[2] = decay;
            }
            LightShape::RectArea { width, height, .. } => {
                uniform.extra = [width, height, 0.0, 0.0];
            }
            LightShape::Spot {
                distance,
                angle,
                penumbra,
                decay,
                ..
            } => {
                uniform.direction[3] = distance;
                uniform.params = [angle.cos(), penumbra, decay, 0.0];
            }
            LightShape::Ambient | LightShape::Directional { .. } => {}
        }
        uniform
    }
}

/// All visible lights of a frame
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightingBlock {
    /// Packed lights; only the first `count` are meaningful
    pub lights: [LightUniform; MAX_LIGHTS],
    /// Number of packed lights
    pub count: u32,
    /// Padding to a 16-byte boundary
    pub _padding: [u32; 3],
}

impl Default for LightingBlock {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl LightingBlock {
    /// Pack the visible lights of `scene` in scene order
    ///
    /// Lights past [`MAX_LIGHTS`] are dropped with a warning.
    pub fn pack(scene: &SceneGraph) -> Self {
        let mut block = Self::zeroed();
        let mut count = 0;
        for (_, light) in scene.lights().filter(|(_, light)| light.visible) {
            if count == MAX_LIGHTS {
                log::warn!("Lighting block full, '{}' not uploaded", light.name);
                continue;
            }
            block.lights[count] = LightUniform::from_light(light);
            count += 1;
        }
        block.count = count as u32;
        block
    }

    /// Packed lights
    pub fn active(&self) -> &[LightUniform] {
        &self.lights[..self.count as usize]
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-frame camera data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection × view, column major
    pub view_projection: [[f32; 4]; 4],
    /// Camera position (xyz), w unused
    pub position: [f32; 4],
    /// Surface width, height and pixel ratio, w unused
    pub viewport: [f32; 4],
}

impl CameraUniform {
    /// Pack camera matrices and surface size
    pub fn new(camera: &Camera, size: (u32, u32), pixel_ratio: f32) -> Self {
        Self {
            view_projection: camera.view_projection_matrix().into(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            viewport: [size.0 as f32, size.1 as f32, pixel_ratio, 0.0],
        }
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::lighting::Color;
    use approx::assert_relative_eq;

    #[test]
    fn test_block_sizes_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightingBlock>() % 16, 0);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 96);
    }

    #[test]
    fn test_pack_skips_hidden_lights() {
        let mut scene = SceneGraph::new();
        scene.add_light(Light::ambient("a", Color::new(1.0, 1.0, 1.0), 0.5));
        let hidden = scene.add_light(Light::point("p", Color::zeros(), 0.5, Vec3::zeros(), 3.0, 2.0));
        scene.light_mut(hidden).unwrap().visible = false;

        let block = LightingBlock::pack(&scene);
        assert_eq!(block.count, 1);
        assert_eq!(block.active()[0].color, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(block.as_bytes().len(), std::mem::size_of::<LightingBlock>());
    }

    #[test]
    fn test_spot_packs_cone() {
        let spot = Light::spot("s", Color::zeros(), 0.5, 10.0, 0.3, 0.25, 1.0)
            .with_position(Vec3::new(0.0, 2.0, 0.0))
            .with_target(Vec3::zeros());
        let uniform = LightUniform::from_light(&spot);
        assert_relative_eq!(uniform.position[3], 5.0);
        assert_relative_eq!(uniform.direction[1], -1.0);
        assert_relative_eq!(uniform.direction[3], 10.0);
        assert_relative_eq!(uniform.params[0], 0.3_f32.cos());
        assert_relative_eq!(uniform.params[1], 0.25);
    }

    #[test]
    fn test_block_caps_light_count() {
        let mut scene = SceneGraph::new();
        for i in 0..MAX_LIGHTS + 2 {
            scene.add_light(Light::ambient(&format!("a{i}"), Color::zeros(), 0.1));
        }
        assert_eq!(LightingBlock::pack(&scene).count as usize, MAX_LIGHTS);
    }
}
