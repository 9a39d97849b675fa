use glam::{Mat4, Vec2};

use crate::paint::Color;

/// Evaluation inputs for one frame of the host's document.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EvalContext {
    /// Timestamp in seconds on the document timeline.
    pub time: f64,
    pub frame_rate: f32,
    /// Output size in physical pixels.
    pub width: u32,
    pub height: u32,
}

/// One glyph of a shaped text run, positioned relative to the run origin.
///
/// UVs address the glyph-mask atlas; shaping and rasterization happen on the
/// host side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphInstance {
    pub offset: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Reference to a region of the image atlas.
///
/// The generation pins the handle to one atlas lifetime: after the atlas is
/// recreated, handles from older generations are stale and must be reloaded
/// by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageHandle {
    pub generation: u64,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Visual content of an evaluated node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Rectangle { fill: Color },
    Circle { fill: Color },
    GlyphRun { glyphs: Vec<GlyphInstance> },
    Image { handle: ImageHandle },
}

/// One node of the host document, fully evaluated at a timestamp.
///
/// `transform` is the node's local transform applied around its unit
/// geometry; `position` and `size` place that geometry in document space.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedNode {
    pub id: u64,
    pub transform: Mat4,
    pub position: Vec2,
    pub size: Vec2,
    pub kind: NodeKind,
}

impl EvaluatedNode {
    pub fn new(id: u64, position: Vec2, size: Vec2, kind: NodeKind) -> Self {
        Self {
            id,
            transform: Mat4::IDENTITY,
            position,
            size,
            kind,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// The host's side of the contract: evaluate the document at a timestamp.
///
/// Evaluation order is paint order; the renderer preserves it. Errors abort
/// the frame rather than drawing a partial scene.
pub trait SceneSource {
    fn evaluate(&mut self, ctx: &EvalContext) -> anyhow::Result<Vec<EvaluatedNode>>;
}
