//=========================================================================
// Headless Renderer
//=========================================================================
//
// Renderer backend that records operations instead of producing pixels.
//
// Used by tests to observe what the frame loop drew, and by the demo host
// which has no GPU pipeline. History is bounded so a long-running loop
// does not grow without limit.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::VecDeque;

use glam::Vec3;
use log::trace;

//=== Internal Dependencies ===============================================

use super::{Camera, Color, Renderer, SceneRoot};

//=== RenderOp ============================================================

/// A single recorded renderer operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Frame cleared without scene content.
    Clear(Color),

    /// Scene root drawn through the shared camera.
    Draw {
        root: String,
        visible_nodes: usize,
        camera_position: Vec3,
        clear: Color,
    },

    /// Transition overlay drawn on top of the frame.
    Overlay { color: Color, opacity: f32 },

    /// Output surface resized.
    Resize { width: u32, height: u32 },
}

//=== HeadlessRenderer ====================================================

/// Recording renderer with a bounded operation history.
pub struct HeadlessRenderer {
    clear_color: Color,
    size: (u32, u32),
    ops: VecDeque<RenderOp>,
    history_limit: usize,
}

impl HeadlessRenderer {
    const DEFAULT_HISTORY: usize = 1024;

    pub fn new() -> Self {
        Self::with_history(Self::DEFAULT_HISTORY)
    }

    /// Creates a renderer that keeps at most `limit` recorded operations.
    ///
    /// # Panics
    ///
    /// Panics if `limit == 0`.
    pub fn with_history(limit: usize) -> Self {
        assert!(limit > 0, "History limit must be positive");
        Self {
            clear_color: Color::BLACK,
            size: (0, 0),
            ops: VecDeque::with_capacity(limit.min(Self::DEFAULT_HISTORY)),
            history_limit: limit,
        }
    }

    pub fn ops(&self) -> impl Iterator<Item = &RenderOp> {
        self.ops.iter()
    }

    pub fn last_op(&self) -> Option<&RenderOp> {
        self.ops.back()
    }

    /// Number of recorded draws of the root with the given label.
    pub fn draw_count(&self, label: &str) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RenderOp::Draw { root, .. } if root == label))
            .count()
    }

    /// Takes all recorded operations, leaving the history empty.
    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        self.ops.drain(..).collect()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn record(&mut self, op: RenderOp) {
        trace!("render op: {:?}", op);
        if self.ops.len() == self.history_limit {
            self.ops.pop_front();
        }
        self.ops.push_back(op);
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn clear(&mut self) {
        self.record(RenderOp::Clear(self.clear_color));
    }

    fn draw(&mut self, root: &SceneRoot, camera: &Camera) {
        self.record(RenderOp::Draw {
            root: root.label().to_owned(),
            visible_nodes: root.visible_count(),
            camera_position: camera.position,
            clear: self.clear_color,
        });
    }

    fn draw_overlay(&mut self, color: Color, opacity: f32) {
        self.record(RenderOp::Overlay { color, opacity });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.record(RenderOp::Resize { width, height });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Node;

    #[test]
    fn draw_records_clear_color_and_camera() {
        let mut renderer = HeadlessRenderer::new();
        let mut root = SceneRoot::new("tv");
        root.add(Node::new("screen"));
        let camera = Camera::new();

        renderer.set_clear_color(Color::from_hex(0x111122));
        renderer.draw(&root, &camera);

        match renderer.last_op() {
            Some(RenderOp::Draw { root, visible_nodes, camera_position, clear }) => {
                assert_eq!(root, "tv");
                assert_eq!(*visible_nodes, 1);
                assert_eq!(*camera_position, camera.position);
                assert_eq!(*clear, Color::from_hex(0x111122));
            }
            other => panic!("Expected Draw, got {:?}", other),
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut renderer = HeadlessRenderer::with_history(3);
        for _ in 0..5 {
            renderer.clear();
        }
        renderer.resize(640, 480);

        assert_eq!(renderer.ops().count(), 3);
        assert_eq!(renderer.last_op(), Some(&RenderOp::Resize { width: 640, height: 480 }));
        assert_eq!(renderer.size(), (640, 480));
    }

    #[test]
    #[should_panic(expected = "History limit must be positive")]
    fn zero_history_panics() {
        HeadlessRenderer::with_history(0);
    }

    #[test]
    fn take_ops_drains_history() {
        let mut renderer = HeadlessRenderer::new();
        renderer.clear();
        assert_eq!(renderer.take_ops().len(), 1);
        assert!(renderer.last_op().is_none());
    }

    #[test]
    fn downcast_through_trait_object() {
        let mut boxed: Box<dyn Renderer> = Box::new(HeadlessRenderer::new());
        boxed.clear();

        let headless = boxed.as_any().downcast_ref::<HeadlessRenderer>();
        assert!(headless.is_some());
        assert_eq!(headless.unwrap().ops().count(), 1);
    }
}
