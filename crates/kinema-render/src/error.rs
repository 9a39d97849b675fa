/// Crate-wide result alias.
pub type RenderResult<T> = Result<T, RenderError>;

/// Error taxonomy for the rendering core.
///
/// Environment errors (`DeviceNotSupported`, `AdapterNotFound`,
/// `DeviceRequestFailed`, `SurfaceConfiguration`) are fatal to
/// initialization and surfaced once. Resource errors (`AtlasFull`) are
/// recoverable by creating a new resource generation. State errors
/// (`NotInitialized`, `CommandEncoderFailed`) indicate the caller skipped a
/// lifecycle step; they never manifest as a null-dereference fault.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The platform offers no compatible GPU backend at all.
    #[error("gpu not supported: no graphics backend is available on this platform")]
    DeviceNotSupported,

    /// A backend exists but no adapter satisfies the high-performance request.
    #[error("gpu adapter not found: no adapter satisfies the requested preferences")]
    AdapterNotFound,

    /// An adapter was found but logical device creation failed.
    #[error("gpu device request failed: {0}")]
    DeviceRequestFailed(String),

    /// The output surface could not be created or configured.
    #[error("surface configuration failed: {0}")]
    SurfaceConfiguration(String),

    /// A frame operation was attempted before `initialize` succeeded.
    #[error("renderer not initialized")]
    NotInitialized,

    /// The device refused to create a command encoder.
    #[error("failed to create command encoder")]
    CommandEncoderFailed,

    /// The atlas has no room for the requested placement.
    ///
    /// Callers recover by starting a new atlas generation; no data is
    /// silently dropped.
    #[error("atlas full: {width}x{height} does not fit in the current generation")]
    AtlasFull { width: u32, height: u32 },

    /// Scene evaluation failed. Forwarded verbatim from the collaborator.
    #[error(transparent)]
    Evaluation(anyhow::Error),

    /// Any other render-path failure, with causal context.
    #[error("render error: {0}")]
    Render(String),
}

impl RenderError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
