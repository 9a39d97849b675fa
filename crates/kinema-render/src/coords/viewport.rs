use glam::Vec2;

use super::Bounds;

/// Viewport size in logical pixels.
///
/// The batch renderer treats this as both the NDC conversion basis and the
/// cull volume for drawable bounds.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The viewport as a cull box anchored at the origin.
    #[inline]
    pub fn bounds(self) -> Bounds {
        Bounds::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}
