use glam::{Mat4, Vec3};

use crate::coords::Bounds;
use crate::paint::Color;

use super::{EvaluatedNode, GlyphInstance, ImageHandle, NodeKind};

/// Geometry-free restatement of [`NodeKind`] for the batcher.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    Rect { fill: Color },
    Circle { fill: Color },
    Glyphs { glyphs: Vec<GlyphInstance> },
    Image { handle: ImageHandle },
}

/// A batchable unit of rendering.
///
/// `transform` maps the unit quad [0,1]² into document space; `bounds` is
/// the axis-aligned box of the transformed quad, used only for viewport
/// culling.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: u64,
    pub transform: Mat4,
    pub bounds: Bounds,
    pub kind: DrawableKind,
}

impl Drawable {
    /// Flattens an evaluated node: placement, local transform, and unit-quad
    /// scale compose into a single instance matrix.
    ///
    /// Glyph runs keep their glyphs in run-space pixels, so the size scale is
    /// left out of their transform; the node size still defines the layout
    /// box used for culling.
    pub fn from_node(node: &EvaluatedNode) -> Self {
        let placement = Mat4::from_translation(Vec3::new(node.position.x, node.position.y, 0.0))
            * node.transform;
        let scaled = placement * Mat4::from_scale(Vec3::new(node.size.x, node.size.y, 1.0));

        let transform = match &node.kind {
            NodeKind::GlyphRun { .. } => placement,
            _ => scaled,
        };

        let kind = match &node.kind {
            NodeKind::Rectangle { fill } => DrawableKind::Rect { fill: *fill },
            NodeKind::Circle { fill } => DrawableKind::Circle { fill: *fill },
            NodeKind::GlyphRun { glyphs } => DrawableKind::Glyphs { glyphs: glyphs.clone() },
            NodeKind::Image { handle } => DrawableKind::Image { handle: *handle },
        };

        Self {
            id: node.id,
            transform,
            bounds: aabb_of_unit_quad(&scaled),
            kind,
        }
    }
}

/// Axis-aligned box of the unit quad under `transform`.
///
/// Exact for the affine transforms node evaluation produces; rotations
/// yield a conservative (larger) cull box, which is the safe direction.
fn aabb_of_unit_quad(transform: &Mat4) -> Bounds {
    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
    ];

    let mut bounds = Bounds::EMPTY;
    for corner in corners {
        bounds.enclose(transform.transform_point3(corner).truncate());
    }
    bounds
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn rect_node(position: Vec2, size: Vec2) -> EvaluatedNode {
        EvaluatedNode::new(7, position, size, NodeKind::Rectangle { fill: Color::white() })
    }

    #[test]
    fn identity_node_bounds_match_position_and_size() {
        let node = rect_node(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0));
        let d = Drawable::from_node(&node);
        assert_eq!(d.bounds, Bounds::new(Vec2::new(10.0, 20.0), Vec2::new(110.0, 70.0)));
        assert_eq!(d.id, 7);
    }

    #[test]
    fn local_translation_shifts_bounds() {
        let node = rect_node(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0))
            .with_transform(Mat4::from_translation(Vec3::new(5.0, -5.0, 0.0)));
        let d = Drawable::from_node(&node);
        assert_eq!(d.bounds, Bounds::new(Vec2::new(5.0, -5.0), Vec2::new(15.0, 5.0)));
    }

    #[test]
    fn rotation_yields_conservative_bounds() {
        // A 100×10 rect rotated 90° spans 10×100.
        let node = rect_node(Vec2::new(0.0, 0.0), Vec2::new(100.0, 10.0))
            .with_transform(Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let d = Drawable::from_node(&node);
        assert!((d.bounds.size().x - 10.0).abs() < 1e-3);
        assert!((d.bounds.size().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn glyph_run_transform_excludes_size_scale() {
        let node = EvaluatedNode::new(
            3,
            Vec2::new(10.0, 10.0),
            Vec2::new(200.0, 40.0),
            NodeKind::GlyphRun { glyphs: vec![] },
        );
        let d = Drawable::from_node(&node);
        // Bounds follow the layout box.
        assert_eq!(d.bounds, Bounds::new(Vec2::new(10.0, 10.0), Vec2::new(210.0, 50.0)));
        // The transform maps run-space pixels, not the unit quad.
        let p = d.transform.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.x, 11.0);
    }

    #[test]
    fn kind_carries_through_flattening() {
        let node = EvaluatedNode::new(
            1,
            Vec2::ZERO,
            Vec2::new(1.0, 1.0),
            NodeKind::Circle { fill: Color::black() },
        );
        let d = Drawable::from_node(&node);
        assert!(matches!(d.kind, DrawableKind::Circle { .. }));
    }
}
