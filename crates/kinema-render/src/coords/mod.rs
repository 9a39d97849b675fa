//! Coordinate and geometry types shared across the rendering core.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Vector math comes from `glam`; this module only adds the cull-box and
//! viewport types the batcher needs on top of it. Shaders convert to NDC
//! using a viewport uniform.

mod bounds;
mod viewport;

pub use bounds::Bounds;
pub use viewport::Viewport;
