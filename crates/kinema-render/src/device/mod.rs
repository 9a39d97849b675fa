//! GPU device + output-target management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the output target (window surface or offscreen texture)
//! - raw resource factories used by every other component
//! - command submission with completion fences

mod context;
mod fence;
mod init;
mod support;
mod surface;

pub use context::{GpuContext, GpuFrame};
pub use fence::GpuFence;
pub use init::GpuInit;
pub use support::{is_supported, support_info, SupportInfo};
pub use surface::RenderSurface;
