use std::collections::HashMap;

use glam::Mat4;

use crate::atlas::TextureAtlas;
use crate::coords::Viewport;
use crate::device::{GpuContext, GpuFence};
use crate::paint::Color;
use crate::perf::PerformanceSample;
use crate::pool::BufferPool;
use crate::scene::{Drawable, DrawableKind};
use crate::shader::ShaderCache;

use super::instances::{
    FillUniform, GlyphGpuInstance, ImageInstance, RunUniform, ShapeInstance, ViewportUniform,
    QUAD_INDICES, QUAD_VERTICES,
};
use super::key::BatchKey;
use super::pipelines::{PipelineKind, PipelineSet};

/// Batcher tuning.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// When false, every drawable becomes its own single-instance draw.
    pub enabled: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Instance payload of one batch.
enum GroupData {
    Shapes {
        kind: PipelineKind,
        fill: Color,
        instances: Vec<ShapeInstance>,
    },
    Images {
        instances: Vec<ImageInstance>,
    },
    Glyphs {
        transform: Mat4,
        glyphs: Vec<GlyphGpuInstance>,
    },
}

struct BatchGroup {
    key: BatchKey,
    data: GroupData,
}

impl BatchGroup {
    fn instance_count(&self) -> u32 {
        match &self.data {
            GroupData::Shapes { instances, .. } => instances.len() as u32,
            GroupData::Images { instances } => instances.len() as u32,
            GroupData::Glyphs { glyphs, .. } => glyphs.len() as u32,
        }
    }

    fn pipeline_kind(&self) -> PipelineKind {
        match &self.data {
            GroupData::Shapes { kind, .. } => *kind,
            GroupData::Images { .. } => PipelineKind::Image,
            GroupData::Glyphs { .. } => PipelineKind::Glyph,
        }
    }
}

/// Draw-call math over the instance counts of encoded groups.
fn drawn_stats(counts: &[u32]) -> (u32, u32, u32) {
    // Every instance is a unit quad: two triangles, four vertices.
    let instances: u32 = counts.iter().sum();
    (counts.len() as u32, instances * 2, instances * 4)
}

/// Cached per-color fill binding for shape batches.
struct FillBind {
    bind: wgpu::BindGroup,
}

/// Groups drawables into instanced draw calls.
///
/// Per-frame protocol: `clear → add* → optimize(viewport) → submit →
/// finish_frame`. Calling `submit` without a prior `optimize` draws zero
/// batches; it is a caller error, not a fault. Group order is first-seen
/// insertion order, which preserves paint order across batches.
pub struct BatchRenderer {
    config: BatchConfig,
    pipelines: PipelineSet,

    pending: Vec<Drawable>,
    groups: Vec<BatchGroup>,
    index: HashMap<BatchKey, usize>,
    viewport: Viewport,
    accepted: u32,
    culled: u32,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind: Option<wgpu::BindGroup>,
    fill_binds: HashMap<[u32; 4], FillBind>,
    /// Texture bind for the image atlas, keyed by atlas generation.
    image_bind: Option<(u64, wgpu::BindGroup)>,
    /// Texture bind for the glyph mask atlas, keyed by atlas generation.
    glyph_bind: Option<(u64, wgpu::BindGroup)>,

    /// Pooled buffers leased during `submit`, released in `finish_frame`.
    in_flight: Vec<u64>,
}

impl BatchRenderer {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            pipelines: PipelineSet::default(),
            pending: Vec::new(),
            groups: Vec::new(),
            index: HashMap::new(),
            viewport: Viewport::default(),
            accepted: 0,
            culled: 0,
            quad_vbo: None,
            quad_ibo: None,
            viewport_ubo: None,
            viewport_bind: None,
            fill_binds: HashMap::new(),
            image_bind: None,
            glyph_bind: None,
            in_flight: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Resets all per-frame state. Idempotent.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.groups.clear();
        self.index.clear();
        self.accepted = 0;
        self.culled = 0;
    }

    /// Queues a drawable for this frame.
    pub fn add(&mut self, drawable: Drawable) {
        self.pending.push(drawable);
    }

    /// Culls queued drawables against the viewport and groups the survivors.
    pub fn optimize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let cull_bounds = viewport.bounds();

        for drawable in std::mem::take(&mut self.pending) {
            if !drawable.bounds.intersects(cull_bounds) {
                self.culled += 1;
                continue;
            }
            self.accepted += 1;
            self.group(drawable);
        }
    }

    fn group(&mut self, drawable: Drawable) {
        let key = BatchKey::of(&drawable.kind, drawable.id, self.config.enabled);

        let index = *self.index.entry(key).or_insert_with(|| {
            self.groups.push(BatchGroup {
                key,
                data: match &drawable.kind {
                    DrawableKind::Rect { fill } => GroupData::Shapes {
                        kind: PipelineKind::Rect,
                        fill: *fill,
                        instances: Vec::new(),
                    },
                    DrawableKind::Circle { fill } => GroupData::Shapes {
                        kind: PipelineKind::Circle,
                        fill: *fill,
                        instances: Vec::new(),
                    },
                    DrawableKind::Image { .. } => GroupData::Images {
                        instances: Vec::new(),
                    },
                    DrawableKind::Glyphs { .. } => GroupData::Glyphs {
                        transform: drawable.transform,
                        glyphs: Vec::new(),
                    },
                },
            });
            self.groups.len() - 1
        });

        match (&mut self.groups[index].data, &drawable.kind) {
            (GroupData::Shapes { instances, .. }, DrawableKind::Rect { .. })
            | (GroupData::Shapes { instances, .. }, DrawableKind::Circle { .. }) => {
                instances.push(ShapeInstance::new(&drawable.transform));
            }
            (GroupData::Images { instances }, DrawableKind::Image { handle }) => {
                instances.push(ImageInstance::new(
                    &drawable.transform,
                    handle.uv_min,
                    handle.uv_max,
                ));
            }
            (GroupData::Glyphs { glyphs, .. }, DrawableKind::Glyphs { glyphs: run }) => {
                glyphs.extend(run.iter().map(|g| GlyphGpuInstance {
                    offset: [g.offset.x, g.offset.y],
                    size: [g.size.x, g.size.y],
                    uv_rect: [g.uv_min[0], g.uv_min[1], g.uv_max[0], g.uv_max[1]],
                    color: g.color.to_array(),
                }));
            }
            _ => {
                // Key collision across kinds cannot happen: the key encodes
                // the kind. Reached only on a bug; drop the drawable.
                log::error!("batch key/kind mismatch for drawable {}", drawable.id);
            }
        }
    }

    /// Fraction of queued drawables removed by culling this frame.
    pub fn culling_ratio(&self) -> f32 {
        let total = self.accepted + self.culled;
        if total == 0 {
            return 0.0;
        }
        self.culled as f32 / total as f32
    }

    /// Encodes one instanced draw per non-empty group, in insertion order.
    ///
    /// The returned sample counts only work that reached the pass: a group
    /// that fails to encode (no device, missing atlas texture) contributes
    /// neither a draw call nor geometry.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        rpass: &mut wgpu::RenderPass<'_>,
        gpu: &GpuContext,
        pool: &mut BufferPool,
        cache: &mut ShaderCache,
        image_atlas: &TextureAtlas,
        glyph_atlas: &TextureAtlas,
    ) -> PerformanceSample {
        let mut sample = PerformanceSample {
            frame_time_ms: 0.0,
            draw_calls: 0,
            triangles: 0,
            vertices: 0,
            memory_mb: pool.total_bytes() as f32 / (1024.0 * 1024.0),
            batches: 0,
            drawables: self.accepted,
            culling_ratio: self.culling_ratio(),
        };

        if self.groups.is_empty() {
            return sample;
        }
        if self.ensure_frame_resources(gpu).is_none() {
            log::warn!("BatchRenderer: no device; dropping {} batches", self.groups.len());
            return sample;
        }

        let format = gpu.output_format();
        let groups = std::mem::take(&mut self.groups);
        let mut encoded = Vec::with_capacity(groups.len());

        for group in &groups {
            let n = group.instance_count();
            if n > 0 && self.encode(rpass, gpu, pool, cache, format, group, image_atlas, glyph_atlas) {
                encoded.push(n);
            }
        }

        self.groups = groups;
        let (draw_calls, triangles, vertices) = drawn_stats(&encoded);
        sample.draw_calls = draw_calls;
        sample.batches = draw_calls;
        sample.triangles = triangles;
        sample.vertices = vertices;
        sample.memory_mb = pool.total_bytes() as f32 / (1024.0 * 1024.0);
        sample
    }

    /// Returns leased buffers to the pool, gated on the frame's fence.
    pub fn finish_frame(&mut self, pool: &mut BufferPool, fence: Option<GpuFence>) {
        for id in self.in_flight.drain(..) {
            pool.release(id, fence.clone());
        }
    }

    /// Drops every GPU resource; per-frame state survives `clear` only.
    pub fn destroy(&mut self) {
        self.clear();
        self.pipelines = PipelineSet::default();
        self.quad_vbo = None;
        self.quad_ibo = None;
        self.viewport_ubo = None;
        self.viewport_bind = None;
        self.fill_binds.clear();
        self.image_bind = None;
        self.glyph_bind = None;
        self.in_flight.clear();
    }

    // ── encoding ──────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn encode(
        &mut self,
        rpass: &mut wgpu::RenderPass<'_>,
        gpu: &GpuContext,
        pool: &mut BufferPool,
        cache: &mut ShaderCache,
        format: wgpu::TextureFormat,
        group: &BatchGroup,
        image_atlas: &TextureAtlas,
        glyph_atlas: &TextureAtlas,
    ) -> bool {
        let kind = group.pipeline_kind();
        let Some(pipeline) = self.pipelines.ensure(gpu, cache, kind, format) else {
            return false;
        };

        let raw: &[u8] = match &group.data {
            GroupData::Shapes { instances, .. } => bytemuck::cast_slice(instances),
            GroupData::Images { instances } => bytemuck::cast_slice(instances),
            GroupData::Glyphs { glyphs, .. } => bytemuck::cast_slice(glyphs),
        };
        let Some(instance_buf) = pool.allocate(
            gpu,
            wgpu::BufferUsages::VERTEX,
            raw.len() as u64,
            "kinema batch instances",
        ) else {
            return false;
        };
        self.in_flight.push(instance_buf.id);
        let Some(queue) = gpu.queue() else { return false };
        queue.write_buffer(&instance_buf.buffer, 0, raw);

        // Kind-specific group-1 (and group-2) bindings.
        let bind1 = match &group.data {
            GroupData::Shapes { fill, .. } => self.fill_bind(gpu, *fill),
            GroupData::Images { .. } => {
                Self::atlas_bind(&mut self.image_bind, &self.pipelines, gpu, image_atlas, "image")
            }
            GroupData::Glyphs { .. } => {
                Self::atlas_bind(&mut self.glyph_bind, &self.pipelines, gpu, glyph_atlas, "glyph")
            }
        };
        let Some(bind1) = bind1 else { return false };

        let run_bind = match &group.data {
            GroupData::Glyphs { transform, .. } => {
                match self.run_bind(gpu, pool, transform) {
                    Some(bind) => Some(bind),
                    None => return false,
                }
            }
            _ => None,
        };

        let (Some(viewport_bind), Some(quad_vbo), Some(quad_ibo)) =
            (self.viewport_bind.as_ref(), self.quad_vbo.as_ref(), self.quad_ibo.as_ref())
        else {
            return false;
        };

        rpass.set_pipeline(&pipeline);
        rpass.set_bind_group(0, viewport_bind, &[]);
        rpass.set_bind_group(1, &bind1, &[]);
        if let Some(run_bind) = run_bind.as_ref() {
            rpass.set_bind_group(2, run_bind, &[]);
        }
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_buf.buffer.slice(0..raw.len() as u64));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..group.instance_count());
        true
    }

    /// Static quad geometry, the viewport uniform, and its bind group.
    fn ensure_frame_resources(&mut self, gpu: &GpuContext) -> Option<()> {
        self.pipelines.ensure_layouts(gpu)?;

        if self.quad_vbo.is_none() {
            self.quad_vbo = gpu.create_buffer(
                wgpu::BufferUsages::VERTEX,
                bytemuck::cast_slice(&QUAD_VERTICES),
                "kinema quad vbo",
            );
            self.quad_ibo = gpu.create_buffer(
                wgpu::BufferUsages::INDEX,
                bytemuck::cast_slice(&QUAD_INDICES),
                "kinema quad ibo",
            );
        }

        if self.viewport_bind.is_none() {
            let ubo = gpu.create_uninit_buffer(
                std::mem::size_of::<ViewportUniform>() as u64,
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                "kinema viewport ubo",
            )?;
            self.viewport_bind = gpu.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("kinema viewport bind group"),
                layout: self.pipelines.viewport_layout()?,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            });
            self.viewport_ubo = Some(ubo);
        }

        let queue = gpu.queue()?;
        let uniform = ViewportUniform {
            size: [self.viewport.width.max(1.0), self.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        queue.write_buffer(self.viewport_ubo.as_ref()?, 0, bytemuck::bytes_of(&uniform));

        self.quad_ibo.as_ref().map(|_| ())
    }

    /// Per-color fill binding, cached across frames (colors recur heavily in
    /// motion graphics). The cache is dropped wholesale past 1024 colors.
    fn fill_bind(&mut self, gpu: &GpuContext, fill: Color) -> Option<wgpu::BindGroup> {
        let key = fill.key_bits();
        if let Some(cached) = self.fill_binds.get(&key) {
            return Some(cached.bind.clone());
        }
        if self.fill_binds.len() >= 1024 {
            log::debug!("fill bind cache overflow; clearing");
            self.fill_binds.clear();
        }

        let uniform = FillUniform { color: fill.to_array() };
        let ubo = gpu.create_buffer(
            wgpu::BufferUsages::UNIFORM,
            bytemuck::bytes_of(&uniform),
            "kinema fill ubo",
        )?;
        let bind = gpu.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kinema fill bind group"),
            layout: self.pipelines.fill_layout()?,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        })?;
        self.fill_binds.insert(key, FillBind { bind: bind.clone() });
        Some(bind)
    }

    /// Texture+sampler binding for an atlas, re-created when the atlas
    /// generation moves.
    fn atlas_bind(
        slot: &mut Option<(u64, wgpu::BindGroup)>,
        pipelines: &PipelineSet,
        gpu: &GpuContext,
        atlas: &TextureAtlas,
        what: &str,
    ) -> Option<wgpu::BindGroup> {
        if let Some((generation, bind)) = slot.as_ref() {
            if *generation == atlas.generation() {
                return Some(bind.clone());
            }
        }

        let (Some(view), Some(sampler)) = (atlas.view(), atlas.sampler()) else {
            log::warn!("{what} atlas has no texture yet; batch skipped");
            return None;
        };
        let bind = gpu.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kinema atlas bind group"),
            layout: pipelines.texture_layout()?,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })?;
        *slot = Some((atlas.generation(), bind.clone()));
        Some(bind)
    }

    /// Per-run transform binding, leased from the pool for this frame.
    fn run_bind(
        &mut self,
        gpu: &GpuContext,
        pool: &mut BufferPool,
        transform: &Mat4,
    ) -> Option<wgpu::BindGroup> {
        let uniform = RunUniform { transform: transform.to_cols_array_2d() };
        let size = std::mem::size_of::<RunUniform>() as u64;

        let leased = pool.allocate(gpu, wgpu::BufferUsages::UNIFORM, size, "kinema run ubo")?;
        self.in_flight.push(leased.id);
        gpu.queue()?.write_buffer(&leased.buffer, 0, bytemuck::bytes_of(&uniform));

        gpu.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kinema run bind group"),
            layout: self.pipelines.run_layout()?,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &leased.buffer,
                    offset: 0,
                    size: std::num::NonZeroU64::new(size),
                }),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::scene::{EvaluatedNode, NodeKind};

    fn planned_counts(groups: &[BatchGroup]) -> Vec<u32> {
        groups.iter().map(BatchGroup::instance_count).collect()
    }

    fn rect(id: u64, x: f32, fill: Color) -> Drawable {
        Drawable::from_node(&EvaluatedNode::new(
            id,
            Vec2::new(x, 0.0),
            Vec2::new(10.0, 10.0),
            NodeKind::Rectangle { fill },
        ))
    }

    fn circle(id: u64, x: f32, fill: Color) -> Drawable {
        Drawable::from_node(&EvaluatedNode::new(
            id,
            Vec2::new(x, 0.0),
            Vec2::new(10.0, 10.0),
            NodeKind::Circle { fill },
        ))
    }

    fn viewport() -> Viewport {
        Viewport::new(1920.0, 1080.0)
    }

    // ── grouping ──────────────────────────────────────────────────────────

    #[test]
    fn same_color_rects_collapse_into_one_batch() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 20.0, Color::white()));
        b.add(rect(3, 40.0, Color::white()));
        b.optimize(viewport());

        assert_eq!(b.groups.len(), 1);
        let (draw_calls, triangles, vertices) = drawn_stats(&planned_counts(&b.groups));
        assert_eq!(draw_calls, 1);
        assert_eq!(triangles, 6);
        assert_eq!(vertices, 12);
    }

    #[test]
    fn transforms_do_not_split_batches() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(
            Drawable::from_node(
                &EvaluatedNode::new(
                    2,
                    Vec2::new(100.0, 100.0),
                    Vec2::new(50.0, 5.0),
                    NodeKind::Rectangle { fill: Color::white() },
                )
                .with_transform(Mat4::from_rotation_z(0.7)),
            ),
        );
        b.optimize(viewport());
        assert_eq!(b.groups.len(), 1);
        assert_eq!(b.groups[0].instance_count(), 2);
    }

    #[test]
    fn colors_split_batches() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 20.0, Color::black()));
        b.optimize(viewport());
        assert_eq!(b.groups.len(), 2);
    }

    #[test]
    fn shape_kind_splits_batches() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 20.0, Color::white()));
        b.add(circle(3, 40.0, Color::white()));
        b.optimize(viewport());

        assert_eq!(b.groups.len(), 2);
        let (draw_calls, _, _) = drawn_stats(&planned_counts(&b.groups));
        assert_eq!(draw_calls, 2);
    }

    #[test]
    fn group_order_is_first_seen_paint_order() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 20.0, Color::black()));
        b.add(rect(3, 40.0, Color::white()));
        b.optimize(viewport());

        assert_eq!(b.groups[0].key, BatchKey::Rect { color: Color::white().key_bits() });
        assert_eq!(b.groups[1].key, BatchKey::Rect { color: Color::black().key_bits() });
        assert_eq!(b.groups[0].instance_count(), 2);
    }

    #[test]
    fn batching_disabled_draws_each_drawable_alone() {
        let mut b = BatchRenderer::new(BatchConfig { enabled: false });
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 20.0, Color::white()));
        b.optimize(viewport());
        assert_eq!(b.groups.len(), 2);
    }

    #[test]
    fn glyph_runs_group_per_node() {
        let glyphs = vec![crate::scene::GlyphInstance {
            offset: Vec2::ZERO,
            size: Vec2::new(8.0, 12.0),
            color: Color::black(),
            uv_min: [0.0, 0.0],
            uv_max: [0.1, 0.1],
        }];
        let mut b = BatchRenderer::new(BatchConfig::default());
        for id in [10, 11] {
            b.add(Drawable::from_node(&EvaluatedNode::new(
                id,
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 20.0),
                NodeKind::GlyphRun { glyphs: glyphs.clone() },
            )));
        }
        b.optimize(viewport());
        assert_eq!(b.groups.len(), 2);
    }

    // ── culling ───────────────────────────────────────────────────────────

    #[test]
    fn offscreen_drawables_are_culled() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.add(rect(2, 5000.0, Color::white()));
        b.optimize(viewport());

        assert_eq!(b.groups.len(), 1);
        assert_eq!(b.groups[0].instance_count(), 1);
        assert!((b.culling_ratio() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn partially_visible_drawables_survive_culling() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, -5.0, Color::white())); // straddles the left edge
        b.optimize(viewport());
        assert_eq!(b.groups[0].instance_count(), 1);
        assert_eq!(b.culling_ratio(), 0.0);
    }

    #[test]
    fn culling_ratio_of_empty_frame_is_zero() {
        let b = BatchRenderer::new(BatchConfig::default());
        assert_eq!(b.culling_ratio(), 0.0);
    }

    // ── frame protocol ────────────────────────────────────────────────────

    #[test]
    fn clear_is_idempotent_and_resets_everything() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        b.optimize(viewport());
        b.clear();
        b.clear();

        assert!(b.groups.is_empty());
        assert!(b.pending.is_empty());
        assert_eq!(b.culling_ratio(), 0.0);
    }

    #[test]
    fn add_without_optimize_produces_no_groups() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        b.add(rect(1, 0.0, Color::white()));
        assert!(b.groups.is_empty());
        let (draw_calls, _, _) = drawn_stats(&planned_counts(&b.groups));
        assert_eq!(draw_calls, 0);
    }

    #[test]
    fn stats_count_only_groups_that_encoded() {
        // Two groups planned, one reaches the pass: the sample math must
        // not claim the other's geometry was drawn.
        let planned = [3u32, 5];
        let (_, planned_tris, _) = drawn_stats(&planned);
        assert_eq!(planned_tris, 16);

        let (draw_calls, triangles, vertices) = drawn_stats(&planned[..1]);
        assert_eq!((draw_calls, triangles, vertices), (1, 6, 12));
        assert_eq!(drawn_stats(&[]), (0, 0, 0));
    }

    #[test]
    fn finish_frame_releases_nothing_when_nothing_leased() {
        let mut b = BatchRenderer::new(BatchConfig::default());
        let mut pool: BufferPool = BufferPool::with_defaults();
        b.finish_frame(&mut pool, Some(GpuFence::signalled()));
        assert!(pool.is_empty());
    }
}
