//! Shared texture atlases.
//!
//! Many small images (icons, glyph bitmaps) packed into one texture keep
//! texture-bind switches off the hot path. Packing is a simple shelf
//! allocator; a full atlas starts a fresh generation rather than repacking.

mod packer;
mod texture;

pub use packer::{AtlasError, ShelfPacker};
pub use texture::{AtlasConfig, AtlasEntry, ImageSource, TextureAtlas};
