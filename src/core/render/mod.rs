//=========================================================================
// Render Boundary
//=========================================================================
//
// Opaque rendering types shared by every scene.
//
// The scene manager never inspects what a scene draws. It hands the
// scene's root and the shared camera to a `Renderer` once per frame and
// otherwise passes these types through untouched.
//
// Architecture:
//   SceneContext
//     ├─ renderer: Box<dyn Renderer>   (process-wide render target)
//     └─ camera: Camera                (process-wide camera)
//   Scene::root() → SceneRoot ──draw()──► Renderer
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use glam::{Mat4, Vec3};

//=== Module Declarations =================================================

mod headless;

//=== Public API ==========================================================

pub use headless::{HeadlessRenderer, RenderOp};

//=== Color ===============================================================

/// Linear RGBA color used for clear colors and the fade overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Creates an opaque color from float channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    ///
    /// ```rust
    /// # use ballot_engine::core::render::Color;
    /// let booth = Color::from_hex(0x222233);
    /// assert_eq!(booth.a, 1.0);
    /// ```
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

//=== Camera ==============================================================

/// Perspective camera shared by all scenes.
///
/// Scenes reposition it in `on_enter` (each scene frames its own shot);
/// the manager never resets it between scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Creates a camera at eye height looking down -Z.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 5.0),
            target: Vec3::new(0.0, 1.6, 0.0),
            up: Vec3::Y,
            fov_y: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn look_at(&mut self, x: f32, y: f32, z: f32) {
        self.target = Vec3::new(x, y, z);
    }

    /// Updates the aspect ratio from a surface size.
    ///
    /// Zero-sized surfaces (minimized windows) leave the aspect unchanged.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

//=== Scene Root ==========================================================

/// A named element of a scene's renderable content.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub position: Vec3,
    pub visible: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            visible: true,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

/// Renderable root owned by a scene.
///
/// The manager only passes this to [`Renderer::draw`]; what it contains is
/// up to the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneRoot {
    label: String,
    nodes: Vec<Node>,
}

impl SceneRoot {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            nodes: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visible).count()
    }

    /// Removes every node (typical `on_exit` teardown).
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

//=== Renderer Trait ======================================================

/// Process-wide render target shared by every scene.
///
/// Render state such as the clear color persists across scenes; a scene
/// that depends on it re-asserts it in its `render` hook each frame.
pub trait Renderer {
    fn set_clear_color(&mut self, color: Color);

    fn clear_color(&self) -> Color;

    /// Clears the frame to the current clear color without drawing content.
    fn clear(&mut self);

    /// Draws a scene root through the given camera.
    fn draw(&mut self, root: &SceneRoot, camera: &Camera);

    /// Draws the full-screen transition overlay.
    fn draw_overlay(&mut self, color: Color, opacity: f32);

    /// Resizes the output surface.
    fn resize(&mut self, width: u32, height: u32);

    /// Downcasts to `&dyn Any` for backend-specific queries.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for backend-specific queries.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_unpacks_channels() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn color_alpha_is_clamped() {
        assert_eq!(Color::WHITE.with_alpha(2.0).a, 1.0);
        assert_eq!(Color::WHITE.with_alpha(-1.0).a, 0.0);
    }

    #[test]
    fn camera_ignores_zero_sized_surface() {
        let mut camera = Camera::new();
        let before = camera.aspect;
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, before);

        camera.set_aspect(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn camera_view_maps_target_onto_negative_z() {
        let mut camera = Camera::new();
        camera.set_position(0.0, 2.0, 5.0);
        camera.look_at(0.0, 2.0, 0.0);

        let target_in_view = camera.view().transform_point3(camera.target);
        assert!(target_in_view.x.abs() < 1e-5);
        assert!(target_in_view.y.abs() < 1e-5);
        assert!((target_in_view.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn scene_root_tracks_visible_nodes() {
        let mut root = SceneRoot::new("booth");
        root.add(Node::new("floor")).add(Node::new("ballot").at(Vec3::Y));
        assert_eq!(root.len(), 2);

        root.node_mut("ballot").unwrap().visible = false;
        assert_eq!(root.visible_count(), 1);

        root.clear();
        assert!(root.is_empty());
    }
}
