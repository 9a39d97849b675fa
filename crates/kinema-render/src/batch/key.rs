use crate::scene::DrawableKind;

/// Grouping key: two drawables land in the same batch iff their keys match.
///
/// Shape keys carry the fill color as bit patterns so the color can live in
/// a per-batch uniform instead of every instance record. Images group by
/// atlas generation (one atlas, one texture bind). Glyph runs draw per run;
/// their key is the owning node.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BatchKey {
    Rect { color: [u32; 4] },
    Circle { color: [u32; 4] },
    Image { generation: u64 },
    GlyphRun { node: u64 },
    /// Batching disabled: every drawable draws alone.
    Solo { node: u64 },
}

impl BatchKey {
    pub fn of(kind: &DrawableKind, node: u64, batching: bool) -> Self {
        if !batching {
            return Self::Solo { node };
        }
        match kind {
            DrawableKind::Rect { fill } => Self::Rect { color: fill.key_bits() },
            DrawableKind::Circle { fill } => Self::Circle { color: fill.key_bits() },
            DrawableKind::Image { handle } => Self::Image { generation: handle.generation },
            DrawableKind::Glyphs { .. } => Self::GlyphRun { node },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::ImageHandle;

    #[test]
    fn same_color_rects_share_a_key() {
        let a = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 1, true);
        let b = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 2, true);
        assert_eq!(a, b);
    }

    #[test]
    fn different_colors_split() {
        let a = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 1, true);
        let b = BatchKey::of(&DrawableKind::Rect { fill: Color::black() }, 1, true);
        assert_ne!(a, b);
    }

    #[test]
    fn rect_and_circle_never_share_a_key() {
        let a = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 1, true);
        let b = BatchKey::of(&DrawableKind::Circle { fill: Color::white() }, 1, true);
        assert_ne!(a, b);
    }

    #[test]
    fn images_group_by_atlas_generation() {
        let h0 = ImageHandle { generation: 0, uv_min: [0.0, 0.0], uv_max: [0.5, 0.5] };
        let h1 = ImageHandle { generation: 0, uv_min: [0.5, 0.5], uv_max: [1.0, 1.0] };
        let a = BatchKey::of(&DrawableKind::Image { handle: h0 }, 1, true);
        let b = BatchKey::of(&DrawableKind::Image { handle: h1 }, 2, true);
        assert_eq!(a, b);
    }

    #[test]
    fn solo_keys_are_per_node() {
        let a = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 1, false);
        let b = BatchKey::of(&DrawableKind::Rect { fill: Color::white() }, 2, false);
        assert_ne!(a, b);
    }
}
