//! Frame orchestration.
//!
//! [`Renderer`] wires the whole pipeline: scene evaluation, frame
//! acquisition, batching, submission, and performance accounting. Hosts talk
//! to this type; the component modules underneath stay composable for tests.

mod output;
mod renderer;

pub use output::RenderOutput;
pub use renderer::{Renderer, RendererConfig};
