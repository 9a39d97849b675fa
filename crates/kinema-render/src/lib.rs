//! Kinema rendering crate.
//!
//! Real-time GPU backend for timeline-driven motion graphics: device
//! ownership, shader/pipeline caching, pooled buffers, shared atlases, and
//! an instanced batch renderer, wired together by [`render::Renderer`].

pub mod atlas;
pub mod batch;
pub mod coords;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod perf;
pub mod pool;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;

pub use error::{RenderError, RenderResult};
pub use render::{Renderer, RendererConfig};
