//! Evaluated scene model.
//!
//! The renderer does not understand compositions, keyframes, or effects. A
//! host evaluates its document at a timestamp and hands over a flat list of
//! [`EvaluatedNode`]s; this module converts them into [`Drawable`]s the batch
//! renderer can group.

mod drawable;
mod node;

pub use drawable::{Drawable, DrawableKind};
pub use node::{EvalContext, EvaluatedNode, GlyphInstance, ImageHandle, NodeKind, SceneSource};
