/// Descriptor for a completed frame.
///
/// An in-process handle, not a persisted artifact; export and encoding are
/// external collaborators.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Resolved color texture for offscreen targets. `None` when the frame
    /// went to a window surface (the swapchain owns that texture).
    pub texture: Option<wgpu::Texture>,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}
