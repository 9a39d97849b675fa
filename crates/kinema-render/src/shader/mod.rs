//! Shader-module caching and pipeline composition.
//!
//! Compiling WGSL every frame is pure waste: the built-in shader vocabulary
//! is tiny and static. The cache keys compiled modules by a 128-bit content
//! fingerprint of the source; pipelines composed from those modules are
//! memoized downstream by the batch renderer, not here.

mod cache;
mod fingerprint;

pub use cache::{PipelineDesc, ShaderCache};
pub use fingerprint::Fingerprint;
