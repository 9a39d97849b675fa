use std::sync::atomic::Ordering;

use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};

use super::surface::{self, OFFSCREEN_FORMAT};
use super::{GpuFence, GpuInit, RenderSurface};

/// Output target state. `None` until `initialize` succeeds.
enum Target {
    None,
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
}

/// A single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the
/// surface texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub view: wgpu::TextureView,
    /// Present handle for window targets. `None` for offscreen targets.
    pub surface_texture: Option<wgpu::SurfaceTexture>,
    /// Resolved color texture for offscreen targets. `None` for window targets.
    pub texture: Option<wgpu::Texture>,
}

/// Single owner of the logical device, output configuration, and raw
/// resource creation. No batching or scene logic lives here.
///
/// The context is constructed empty and becomes usable after
/// [`initialize`](Self::initialize). Every factory method degrades to a
/// `None` return (with a warning log) while the device is absent, so calling
/// code treats GPU access as fallible at every use site and can skip a frame
/// instead of crashing.
pub struct GpuContext {
    instance: Option<wgpu::Instance>,
    adapter: Option<wgpu::Adapter>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    target: Target,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl Default for GpuContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuContext {
    /// Creates an uninitialized context with no device.
    pub fn new() -> Self {
        Self {
            instance: None,
            adapter: None,
            device: None,
            queue: None,
            target: Target::None,
            format: OFFSCREEN_FORMAT,
            width: 0,
            height: 0,
        }
    }

    /// Requests an adapter and device, then binds the output target.
    ///
    /// Error mapping:
    /// - no backend/adapters at all → [`RenderError::DeviceNotSupported`]
    /// - adapter request refused → [`RenderError::AdapterNotFound`]
    /// - device creation failure → [`RenderError::DeviceRequestFailed`]
    /// - surface create/configure failure → [`RenderError::SurfaceConfiguration`]
    pub async fn initialize(&mut self, target: RenderSurface, init: GpuInit) -> RenderResult<()> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        if instance.enumerate_adapters(wgpu::Backends::all()).await.is_empty() {
            return Err(RenderError::DeviceNotSupported);
        }

        let (surface, width, height) = match &target {
            RenderSurface::Window(window) => {
                let size = window.inner_size();
                let surface = instance
                    .create_surface(window.clone())
                    .map_err(|e| RenderError::SurfaceConfiguration(e.to_string()))?;
                (Some(surface), size.width.max(1), size.height.max(1))
            }
            RenderSurface::Offscreen { width, height } => {
                (None, (*width).max(1), (*height).max(1))
            }
        };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface.as_ref(),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterNotFound)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("kinema device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceRequestFailed(e.to_string()))?;

        let target_state = match surface {
            Some(surface) => {
                let caps = surface.get_capabilities(&adapter);
                let format = surface::choose_surface_format(&caps, init.prefer_srgb)
                    .ok_or_else(|| {
                        RenderError::SurfaceConfiguration("no supported surface formats".into())
                    })?;
                let alpha_mode = surface::choose_alpha_mode(&caps, init.alpha_mode);

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format,
                    width,
                    height,
                    present_mode: init.present_mode,
                    alpha_mode,
                    view_formats: vec![],
                    desired_maximum_frame_latency: init.desired_maximum_frame_latency,
                };
                surface.configure(&device, &config);

                self.format = format;
                Target::Surface { surface, config }
            }
            None => {
                let (texture, view) = surface::create_offscreen_target(&device, width, height);
                self.format = OFFSCREEN_FORMAT;
                Target::Offscreen { texture, view }
            }
        };

        let info = adapter.get_info();
        log::info!("gpu initialized: {} ({:?})", info.name, info.backend);

        self.instance = Some(instance);
        self.adapter = Some(adapter);
        self.device = Some(device);
        self.queue = Some(queue);
        self.target = target_state;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Blocking wrapper around [`initialize`](Self::initialize) for hosts
    /// without an async runtime.
    pub fn initialize_blocking(&mut self, target: RenderSurface, init: GpuInit) -> RenderResult<()> {
        pollster::block_on(self.initialize(target, init))
    }

    pub fn is_initialized(&self) -> bool {
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&wgpu::Device> {
        self.device.as_ref()
    }

    pub fn queue(&self) -> Option<&wgpu::Queue> {
        self.queue.as_ref()
    }

    /// The preferred output pixel format recorded at initialization.
    pub fn output_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Current output size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // ── factories ─────────────────────────────────────────────────────────

    /// Allocates a buffer and uploads `data` immediately.
    pub fn create_buffer(
        &self,
        usage: wgpu::BufferUsages,
        data: &[u8],
        label: &str,
    ) -> Option<wgpu::Buffer> {
        let device = self.device_or_warn("buffer")?;
        Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: data,
            usage,
        }))
    }

    /// Allocates an uninitialized buffer of `size` bytes.
    pub fn create_uninit_buffer(
        &self,
        size: u64,
        usage: wgpu::BufferUsages,
        label: &str,
    ) -> Option<wgpu::Buffer> {
        let device = self.device_or_warn("buffer")?;
        Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        }))
    }

    pub fn create_texture(&self, desc: &wgpu::TextureDescriptor<'_>) -> Option<wgpu::Texture> {
        Some(self.device_or_warn("texture")?.create_texture(desc))
    }

    pub fn create_sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> Option<wgpu::Sampler> {
        Some(self.device_or_warn("sampler")?.create_sampler(desc))
    }

    pub fn create_bind_group_layout(
        &self,
        desc: &wgpu::BindGroupLayoutDescriptor<'_>,
    ) -> Option<wgpu::BindGroupLayout> {
        Some(self.device_or_warn("bind group layout")?.create_bind_group_layout(desc))
    }

    pub fn create_pipeline_layout(
        &self,
        desc: &wgpu::PipelineLayoutDescriptor<'_>,
    ) -> Option<wgpu::PipelineLayout> {
        Some(self.device_or_warn("pipeline layout")?.create_pipeline_layout(desc))
    }

    pub fn create_render_pipeline(
        &self,
        desc: &wgpu::RenderPipelineDescriptor<'_>,
    ) -> Option<wgpu::RenderPipeline> {
        Some(self.device_or_warn("render pipeline")?.create_render_pipeline(desc))
    }

    pub fn create_bind_group(&self, desc: &wgpu::BindGroupDescriptor<'_>) -> Option<wgpu::BindGroup> {
        Some(self.device_or_warn("bind group")?.create_bind_group(desc))
    }

    pub fn create_command_encoder(&self, label: &str) -> Option<wgpu::CommandEncoder> {
        let device = self.device_or_warn("command encoder")?;
        Some(device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) }))
    }

    // ── submission ────────────────────────────────────────────────────────

    /// Enqueues finished command buffers and returns a completion fence.
    ///
    /// Submission does not block. The fence signals once the GPU has drained
    /// the submitted work; the buffer pool uses it to gate reuse of buffers
    /// referenced by these command buffers.
    pub fn submit_commands(
        &self,
        buffers: impl IntoIterator<Item = wgpu::CommandBuffer>,
    ) -> Option<GpuFence> {
        let queue = self.queue.as_ref()?;
        queue.submit(buffers);

        let fence = GpuFence::new();
        let flag = fence.signal_handle();
        queue.on_submitted_work_done(move || {
            flag.store(true, Ordering::Release);
        });
        Some(fence)
    }

    /// Drives fence-callback delivery without blocking.
    pub fn poll(&self) {
        if let Some(device) = self.device.as_ref() {
            let _ = device.poll(wgpu::PollType::Poll);
        }
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Acquires the next output texture and its view.
    ///
    /// Lost/outdated surfaces are reconfigured and retried once; other
    /// surface errors surface as [`RenderError::Render`] and the caller
    /// skips the frame.
    pub fn begin_frame(&mut self) -> RenderResult<GpuFrame> {
        let device = self.device.clone().ok_or(RenderError::NotInitialized)?;

        match &mut self.target {
            Target::None => Err(RenderError::NotInitialized),
            Target::Offscreen { texture, view } => Ok(GpuFrame {
                view: view.clone(),
                surface_texture: None,
                texture: Some(texture.clone()),
            }),
            Target::Surface { surface, config } => {
                let surface_texture = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        surface.configure(&device, config);
                        surface.get_current_texture().map_err(|e| {
                            RenderError::Render(format!("surface acquire failed after reconfigure: {e}"))
                        })?
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        return Err(RenderError::Render("surface out of memory".into()));
                    }
                    Err(e) => {
                        return Err(RenderError::Render(format!("surface acquire failed: {e}")));
                    }
                };
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Ok(GpuFrame {
                    view,
                    surface_texture: Some(surface_texture),
                    texture: None,
                })
            }
        }
    }

    /// Presents a finished frame (no-op for offscreen targets).
    pub fn present(&self, frame: GpuFrame) {
        if let Some(surface_texture) = frame.surface_texture {
            surface_texture.present();
        }
    }

    /// Reconfigures the output target after a resize.
    ///
    /// Safe between frames only, never mid-render-pass. A 0×0 surface size
    /// defers reconfiguration (wgpu rejects zero-sized surfaces).
    pub fn resize(&mut self, width: u32, height: u32) {
        match &mut self.target {
            Target::None => {}
            Target::Surface { surface, config } => {
                self.width = width;
                self.height = height;
                if width == 0 || height == 0 {
                    return;
                }
                config.width = width;
                config.height = height;
                if let Some(device) = self.device.as_ref() {
                    surface.configure(device, config);
                }
            }
            Target::Offscreen { texture, view } => {
                let Some(device) = self.device.as_ref() else { return };
                self.width = width.max(1);
                self.height = height.max(1);
                let (t, v) = surface::create_offscreen_target(device, self.width, self.height);
                *texture = t;
                *view = v;
            }
        }
    }

    /// Releases the device and all target state.
    pub fn destroy(&mut self) {
        self.target = Target::None;
        self.queue = None;
        self.device = None;
        self.adapter = None;
        self.instance = None;
        self.width = 0;
        self.height = 0;
    }

    fn device_or_warn(&self, what: &str) -> Option<&wgpu::Device> {
        let device = self.device.as_ref();
        if device.is_none() {
            log::warn!("GpuContext: no device; cannot create {what}");
        }
        device
    }
}
