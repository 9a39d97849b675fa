use glam::Vec2;

/// Min/max-corner box in logical pixels.
///
/// This is the cull volume of one drawable: built by folding transformed
/// quad corners through [`enclose`](Self::enclose), then tested against the
/// viewport with [`intersects`](Self::intersects). Corners are stored
/// directly because those two operations are the only consumers.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// The identity for [`enclose`](Self::enclose): contains no point and
    /// intersects nothing.
    pub const EMPTY: Self = Self {
        min: Vec2::INFINITY,
        max: Vec2::NEG_INFINITY,
    };

    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Grows the box to cover `p`.
    #[inline]
    pub fn enclose(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap predicate for viewport culling.
    ///
    /// Strict: boxes that only touch along an edge do not overlap, so a
    /// drawable grazing the viewport border without covering a pixel is
    /// still dropped.
    #[inline]
    pub fn intersects(self, other: Bounds) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> Bounds {
        Bounds::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    // ── enclose ───────────────────────────────────────────────────────────

    #[test]
    fn enclose_folds_points_into_a_box() {
        let mut bounds = Bounds::EMPTY;
        bounds.enclose(Vec2::new(10.0, -5.0));
        bounds.enclose(Vec2::new(-2.0, 8.0));
        assert_eq!(bounds, b(-2.0, -5.0, 10.0, 8.0));
        assert_eq!(bounds.size(), Vec2::new(12.0, 13.0));
    }

    #[test]
    fn empty_encloses_nothing_and_overlaps_nothing() {
        assert!(!Bounds::EMPTY.intersects(b(-1000.0, -1000.0, 1000.0, 1000.0)));
    }

    // ── intersects (cull predicate) ───────────────────────────────────────

    #[test]
    fn overlapping_boxes_intersect() {
        let viewport = b(0.0, 0.0, 1920.0, 1080.0);
        assert!(viewport.intersects(b(-50.0, -50.0, 50.0, 50.0)));
        assert!(viewport.intersects(b(100.0, 100.0, 200.0, 200.0)));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let viewport = b(0.0, 0.0, 1920.0, 1080.0);
        assert!(!viewport.intersects(b(2000.0, 0.0, 2100.0, 100.0)));
        assert!(!viewport.intersects(b(0.0, -200.0, 100.0, -100.0)));
    }

    #[test]
    fn edge_touching_boxes_do_not_intersect() {
        // Shared edge, zero covered pixels.
        let viewport = b(0.0, 0.0, 1920.0, 1080.0);
        assert!(!viewport.intersects(b(1920.0, 0.0, 2000.0, 100.0)));
    }
}
