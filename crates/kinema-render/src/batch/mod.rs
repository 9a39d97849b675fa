//! Instanced batch renderer.
//!
//! Drawables sharing a [`BatchKey`] collapse into one instanced draw call
//! over a unit quad. Per frame the caller runs
//! `clear → add* → optimize → submit → finish_frame`; `optimize` culls
//! against the viewport and groups what survives, `submit` encodes one draw
//! per non-empty group in insertion order (which is paint order).

mod instances;
mod key;
mod pipelines;
mod renderer;

pub use key::BatchKey;
pub use renderer::{BatchConfig, BatchRenderer};
