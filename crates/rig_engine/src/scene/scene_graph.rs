//! Scene graph
//!
//! Insertion-ordered store of everything the renderer draws: lights, their
//! helpers, meshes and the camera. Participants are addressed by stable
//! [`NodeKey`]s so bindings, helpers and the render loop can refer to them
//! without holding borrows across frames.

use std::rc::Rc;

use crate::foundation::collections::{NodeKey, SecondaryMap, SlotMap};
use crate::render::camera::Camera;
use crate::render::helpers::LightHelper;
use crate::render::lighting::Light;
use crate::render::mesh::{Mesh, StandardMaterial};

/// One render participant
#[derive(Debug, Clone)]
pub enum SceneNode {
    /// A light source
    Light(Light),
    /// Debug gizmo of a light
    Helper(LightHelper),
    /// A primitive mesh
    Mesh(Mesh),
    /// The viewing camera
    Camera(Camera),
}

impl SceneNode {
    /// Whether the renderer should draw this participant this frame
    ///
    /// The camera always participates: it is the viewpoint, not a drawable.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Light(light) => light.visible,
            Self::Helper(helper) => helper.visible,
            Self::Mesh(mesh) => mesh.visible,
            Self::Camera(_) => true,
        }
    }

    /// Short label for logging
    pub fn label(&self) -> &str {
        match self {
            Self::Light(light) => &light.name,
            Self::Helper(_) => "helper",
            Self::Mesh(mesh) => &mesh.name,
            Self::Camera(_) => "camera",
        }
    }
}

/// Container of all render participants
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    order: Vec<NodeKey>,
    helpers: SecondaryMap<NodeKey, NodeKey>,
    materials: Vec<Rc<StandardMaterial>>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: SceneNode) -> NodeKey {
        log::trace!("Scene add: {}", node.label());
        let key = self.nodes.insert(node);
        self.order.push(key);
        key
    }

    /// Add a light
    pub fn add_light(&mut self, light: Light) -> NodeKey {
        self.insert(SceneNode::Light(light))
    }

    /// Add a helper; it becomes the helper of the light it references
    pub fn add_helper(&mut self, helper: LightHelper) -> NodeKey {
        let light = helper.light();
        let key = self.insert(SceneNode::Helper(helper));
        if self.nodes.contains_key(light) {
            self.helpers.insert(light, key);
        }
        key
    }

    /// Add a mesh
    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeKey {
        self.insert(SceneNode::Mesh(mesh))
    }

    /// Add a camera
    pub fn add_camera(&mut self, camera: Camera) -> NodeKey {
        self.insert(SceneNode::Camera(camera))
    }

    /// Register a material owned by the scene and return a shared handle
    pub fn add_material(&mut self, material: StandardMaterial) -> Rc<StandardMaterial> {
        let material = Rc::new(material);
        self.materials.push(Rc::clone(&material));
        material
    }

    /// Materials owned by the scene
    pub fn materials(&self) -> &[Rc<StandardMaterial>] {
        &self.materials
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Participant by key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable participant by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Light by key
    pub fn light(&self, key: NodeKey) -> Option<&Light> {
        match self.nodes.get(key)? {
            SceneNode::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light by key
    pub fn light_mut(&mut self, key: NodeKey) -> Option<&mut Light> {
        match self.nodes.get_mut(key)? {
            SceneNode::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Helper by key
    pub fn helper(&self, key: NodeKey) -> Option<&LightHelper> {
        match self.nodes.get(key)? {
            SceneNode::Helper(helper) => Some(helper),
            _ => None,
        }
    }

    /// Mutable helper by key
    pub fn helper_mut(&mut self, key: NodeKey) -> Option<&mut LightHelper> {
        match self.nodes.get_mut(key)? {
            SceneNode::Helper(helper) => Some(helper),
            _ => None,
        }
    }

    /// Key of the helper attached to `light`
    pub fn helper_of(&self, light: NodeKey) -> Option<NodeKey> {
        self.helpers.get(light).copied()
    }

    /// Mesh by key
    pub fn mesh(&self, key: NodeKey) -> Option<&Mesh> {
        match self.nodes.get(key)? {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Mutable mesh by key
    pub fn mesh_mut(&mut self, key: NodeKey) -> Option<&mut Mesh> {
        match self.nodes.get_mut(key)? {
            SceneNode::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Camera by key
    pub fn camera(&self, key: NodeKey) -> Option<&Camera> {
        match self.nodes.get(key)? {
            SceneNode::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera by key
    pub fn camera_mut(&mut self, key: NodeKey) -> Option<&mut Camera> {
        match self.nodes.get_mut(key)? {
            SceneNode::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Re-derive the helper geometry of `light` from its current parameters
    ///
    /// Returns `false` when the light has no helper.
    pub fn refresh_helper(&mut self, light: NodeKey) -> bool {
        let Some(helper_key) = self.helper_of(light) else {
            return false;
        };
        let Some(snapshot) = self.light(light).cloned() else {
            return false;
        };
        match self.helper_mut(helper_key) {
            Some(helper) => {
                helper.refresh(&snapshot);
                true
            }
            None => false,
        }
    }

    /// All participants in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.nodes.get(key).map(|node| (key, node)))
    }

    /// Visible participants in insertion order
    pub fn visible(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> + '_ {
        self.iter().filter(|(_, node)| node.is_visible())
    }

    /// All lights in insertion order
    pub fn lights(&self) -> impl Iterator<Item = (NodeKey, &Light)> + '_ {
        self.iter().filter_map(|(key, node)| match node {
            SceneNode::Light(light) => Some((key, light)),
            _ => None,
        })
    }

    /// All meshes in insertion order
    pub fn meshes(&self) -> impl Iterator<Item = (NodeKey, &Mesh)> + '_ {
        self.iter().filter_map(|(key, node)| match node {
            SceneNode::Mesh(mesh) => Some((key, mesh)),
            _ => None,
        })
    }

    /// All helpers in insertion order
    pub fn helpers(&self) -> impl Iterator<Item = (NodeKey, &LightHelper)> + '_ {
        self.iter().filter_map(|(key, node)| match node {
            SceneNode::Helper(helper) => Some((key, helper)),
            _ => None,
        })
    }

    /// Find a light by name
    pub fn find_light(&self, name: &str) -> Option<NodeKey> {
        self.lights()
            .find(|(_, light)| light.name == name)
            .map(|(key, _)| key)
    }

    /// Find a mesh by name
    pub fn find_mesh(&self, name: &str) -> Option<NodeKey> {
        self.meshes()
            .find(|(_, mesh)| mesh.name == name)
            .map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::lighting::Color;
    use crate::render::mesh::Primitive;

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut scene = SceneGraph::new();
        let a = scene.add_light(Light::ambient("a", Color::zeros(), 0.1));
        let material = scene.add_material(StandardMaterial::default());
        let m = scene.add_mesh(Mesh::new(
            "cube",
            Primitive::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            material,
        ));
        let c = scene.add_camera(Camera::default());

        let keys: Vec<_> = scene.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![a, m, c]);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_visible_skips_hidden_participants() {
        let mut scene = SceneGraph::new();
        let light = scene.add_light(Light::ambient("a", Color::zeros(), 0.1));
        let helper = LightHelper::new(light, scene.light(light).unwrap());
        let helper = scene.add_helper(helper);

        let visible: Vec<_> = scene.visible().map(|(key, _)| key).collect();
        assert_eq!(visible, vec![light]);

        scene.helper_mut(helper).unwrap().visible = true;
        scene.light_mut(light).unwrap().visible = false;
        let visible: Vec<_> = scene.visible().map(|(key, _)| key).collect();
        assert_eq!(visible, vec![helper]);
    }

    #[test]
    fn test_refresh_helper_uses_current_light() {
        let mut scene = SceneGraph::new();
        let light = scene.add_light(Light::point(
            "point",
            Color::zeros(),
            0.5,
            Vec3::zeros(),
            3.0,
            2.0,
        ));
        let helper = scene.add_helper(LightHelper::new(light, scene.light(light).unwrap()));
        assert_eq!(scene.helper_of(light), Some(helper));

        *scene.light_mut(light).unwrap().position_mut().unwrap() = Vec3::new(1.0, 0.0, 0.0);
        assert!(scene.helper(helper).unwrap().is_stale(scene.light(light).unwrap()));

        assert!(scene.refresh_helper(light));
        assert!(!scene.helper(helper).unwrap().is_stale(scene.light(light).unwrap()));
        assert_eq!(scene.helper(helper).unwrap().revision(), 1);
    }

    #[test]
    fn test_refresh_without_helper_is_noop() {
        let mut scene = SceneGraph::new();
        let light = scene.add_light(Light::ambient("a", Color::zeros(), 0.1));
        assert!(!scene.refresh_helper(light));
    }
}
