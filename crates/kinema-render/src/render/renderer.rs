use std::time::Instant;

use crate::atlas::{AtlasConfig, AtlasEntry, ImageSource, TextureAtlas};
use crate::batch::{BatchConfig, BatchRenderer};
use crate::coords::Viewport;
use crate::device::{GpuContext, GpuInit, RenderSurface};
use crate::error::{RenderError, RenderResult};
use crate::paint::Color;
use crate::perf::{PerfHistory, PerformanceSample};
use crate::pool::{BufferPool, PoolConfig};
use crate::scene::{Drawable, EvalContext, ImageHandle, SceneSource};
use crate::shader::ShaderCache;
use crate::time::FrameClock;

use super::RenderOutput;

/// Top-level renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Render-pass clear color.
    pub background: Color,
    pub batching: bool,
    /// Performance mode trades pool retention for memory: every frame runs
    /// the pool's feedback `optimize` pass and eager cleanup.
    pub performance_mode: bool,
    pub frame_rate: f32,
    pub gpu: GpuInit,
    pub pool: PoolConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background: Color::transparent(),
            batching: true,
            performance_mode: false,
            frame_rate: 60.0,
            gpu: GpuInit::default(),
            pool: PoolConfig::default(),
        }
    }
}

/// Per-frame driver owning every rendering component.
///
/// All methods run on the rendering thread; nothing here is safe for
/// concurrent mutation. Construction is cheap and GPU-free; `initialize`
/// acquires the device.
pub struct Renderer {
    config: RendererConfig,
    gpu: GpuContext,
    shaders: ShaderCache,
    pool: BufferPool,
    image_atlas: TextureAtlas,
    glyph_atlas: TextureAtlas,
    batches: BatchRenderer,
    clock: FrameClock,
    history: PerfHistory,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            gpu: GpuContext::new(),
            shaders: ShaderCache::new(),
            pool: BufferPool::new(config.pool.clone()),
            image_atlas: TextureAtlas::new(AtlasConfig::image()),
            glyph_atlas: TextureAtlas::new(AtlasConfig::glyph()),
            batches: BatchRenderer::new(BatchConfig { enabled: config.batching }),
            clock: FrameClock::new(),
            history: PerfHistory::new(),
            config,
        }
    }

    /// Acquires the GPU device and binds the output target.
    pub async fn initialize(&mut self, target: RenderSurface) -> RenderResult<()> {
        self.gpu.initialize(target, self.config.gpu.clone()).await?;
        self.clock.reset();
        Ok(())
    }

    /// Blocking wrapper around [`initialize`](Self::initialize).
    pub fn initialize_blocking(&mut self, target: RenderSurface) -> RenderResult<()> {
        self.gpu
            .initialize_blocking(target, self.config.gpu.clone())?;
        self.clock.reset();
        Ok(())
    }

    /// Renders one frame of `scene` at `time` seconds.
    ///
    /// Evaluation happens before any GPU work, so an evaluation error leaves
    /// the frame untouched; submission happens exactly once at the end, or
    /// not at all.
    pub fn render_frame(
        &mut self,
        scene: &mut dyn SceneSource,
        time: f64,
    ) -> RenderResult<RenderOutput> {
        let started = Instant::now();
        let ft = self.clock.tick();

        let (width, height) = self.gpu.size();
        let ctx = EvalContext {
            time,
            frame_rate: self.config.frame_rate,
            width,
            height,
        };
        let nodes = scene.evaluate(&ctx).map_err(RenderError::Evaluation)?;

        let frame = self.gpu.begin_frame()?;
        let output_texture = frame.texture.clone();
        let mut encoder = self
            .gpu
            .create_command_encoder("kinema frame")
            .ok_or(RenderError::CommandEncoderFailed)?;

        self.batches.clear();
        for node in &nodes {
            self.batches.add(Drawable::from_node(node));
        }
        self.batches
            .optimize(Viewport::new(width as f32, height as f32));

        let mut sample = {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("kinema frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(self.config.background)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.batches.submit(
                &mut rpass,
                &self.gpu,
                &mut self.pool,
                &mut self.shaders,
                &self.image_atlas,
                &self.glyph_atlas,
            )
        };

        let fence = self.gpu.submit_commands([encoder.finish()]);
        self.batches.finish_frame(&mut self.pool, fence);
        self.gpu.present(frame);

        if self.pool.needs_cleanup() {
            self.pool.cleanup();
        }
        // Feedback maintenance once a second at 60 fps, or every frame in
        // performance mode.
        if self.config.performance_mode || ft.frame_index % 60 == 0 {
            self.pool.optimize();
            self.pool.cleanup();
        }

        sample.frame_time_ms = started.elapsed().as_secs_f32() * 1000.0;
        sample.memory_mb = self.pool.total_bytes() as f32 / (1024.0 * 1024.0);
        self.history.push(sample);

        Ok(RenderOutput {
            texture: output_texture,
            width,
            height,
            format: self.gpu.output_format(),
        })
    }

    // ── assets ────────────────────────────────────────────────────────────

    /// Uploads premultiplied RGBA pixels into the shared image atlas.
    ///
    /// A full atlas starts a fresh generation and retries once; handles from
    /// earlier generations become stale and must be reloaded.
    pub fn load_image(&mut self, source: ImageSource<'_>) -> RenderResult<ImageHandle> {
        let entry = match self.image_atlas.load_image(&self.gpu, source) {
            Ok(entry) => entry,
            Err(RenderError::AtlasFull { .. }) => {
                log::info!("image atlas full; recreating");
                self.image_atlas.recreate();
                self.image_atlas.load_image(&self.gpu, source)?
            }
            Err(e) => return Err(e),
        };

        Ok(ImageHandle {
            generation: self.image_atlas.generation(),
            uv_min: entry.uv_min,
            uv_max: entry.uv_max,
        })
    }

    /// Uploads a glyph coverage mask into the glyph atlas.
    pub fn load_glyph_mask(&mut self, source: ImageSource<'_>) -> RenderResult<AtlasEntry> {
        self.glyph_atlas.load_image(&self.gpu, source)
    }

    pub fn glyph_atlas_generation(&self) -> u64 {
        self.glyph_atlas.generation()
    }

    // ── host surface ──────────────────────────────────────────────────────

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    pub fn performance_metrics(&self) -> Option<&PerformanceSample> {
        self.history.latest()
    }

    /// Retained frame samples, oldest first. Holds at most one second of
    /// history at 60 fps; older frames fall off the front.
    pub fn performance_history(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.history.iter()
    }

    pub fn is_performance_within_budget(&self) -> bool {
        self.history.is_within_budget()
    }

    pub fn optimization_recommendations(&self) -> Vec<String> {
        self.history.recommendations()
    }

    pub fn set_performance_mode(&mut self, enabled: bool) {
        self.config.performance_mode = enabled;
    }

    pub fn set_batching_enabled(&mut self, enabled: bool) {
        self.config.batching = enabled;
        self.batches.set_enabled(enabled);
    }

    pub fn is_batching_enabled(&self) -> bool {
        self.batches.is_enabled()
    }

    /// Releases every GPU resource. The renderer is unusable afterwards
    /// until re-initialized.
    pub fn destroy(&mut self) {
        self.batches.destroy();
        self.pool.drain();
        self.shaders.clear();
        self.image_atlas.recreate();
        self.glyph_atlas.recreate();
        self.gpu.destroy();
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::perf::HISTORY_LEN;
    use crate::scene::{EvaluatedNode, NodeKind};

    struct OneRect;

    impl SceneSource for OneRect {
        fn evaluate(&mut self, _ctx: &EvalContext) -> anyhow::Result<Vec<EvaluatedNode>> {
            Ok(vec![EvaluatedNode::new(
                1,
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 10.0),
                NodeKind::Rectangle { fill: Color::white() },
            )])
        }
    }

    struct FailingScene;

    impl SceneSource for FailingScene {
        fn evaluate(&mut self, _ctx: &EvalContext) -> anyhow::Result<Vec<EvaluatedNode>> {
            anyhow::bail!("keyframe graph cycle")
        }
    }

    #[test]
    fn render_frame_without_device_fails_fast() {
        let mut r = Renderer::new(RendererConfig::default());
        let err = r.render_frame(&mut OneRect, 0.0).unwrap_err();
        assert!(matches!(err, RenderError::NotInitialized));
    }

    #[test]
    fn evaluation_errors_propagate_verbatim() {
        let mut r = Renderer::new(RendererConfig::default());
        let err = r.render_frame(&mut FailingScene, 0.0).unwrap_err();
        assert!(matches!(err, RenderError::Evaluation(_)));
        assert!(err.to_string().contains("keyframe graph cycle"));
    }

    #[test]
    fn batching_toggle_round_trips() {
        let mut r = Renderer::new(RendererConfig::default());
        assert!(r.is_batching_enabled());
        r.set_batching_enabled(false);
        assert!(!r.is_batching_enabled());
        assert!(!r.config.batching);
        r.set_batching_enabled(true);
        assert!(r.config.batching);
        assert!(r.batches.is_enabled());
    }

    #[test]
    fn history_keeps_at_most_one_second_of_frames() {
        let mut r = Renderer::new(RendererConfig::default());
        for i in 0..100 {
            r.history.push(PerformanceSample {
                frame_time_ms: i as f32,
                ..Default::default()
            });
        }
        assert_eq!(r.performance_history().count(), HISTORY_LEN);
        // Oldest first; the first 40 frames fell off the front.
        let first = r.performance_history().next().unwrap();
        assert_eq!(first.frame_time_ms, 40.0);
        let last = r.performance_history().last().unwrap();
        assert_eq!(last.frame_time_ms, 99.0);
    }

    #[test]
    fn no_metrics_before_first_frame() {
        let r = Renderer::new(RendererConfig::default());
        assert!(r.performance_metrics().is_none());
        assert!(r.is_performance_within_budget());
        assert!(r.optimization_recommendations().is_empty());
    }
}
