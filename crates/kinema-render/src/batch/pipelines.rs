use std::collections::HashMap;

use crate::device::GpuContext;
use crate::shader::{PipelineDesc, ShaderCache};

use super::instances::{
    premul_alpha_blend, ubo_binding_size, FillUniform, GlyphGpuInstance, ImageInstance,
    QuadVertex, RunUniform, ShapeInstance, ViewportUniform,
};

const SHAPE_WGSL: &str = include_str!("shaders/shape.wgsl");
const CIRCLE_WGSL: &str = include_str!("shaders/circle.wgsl");
const IMAGE_WGSL: &str = include_str!("shaders/image.wgsl");
const GLYPH_WGSL: &str = include_str!("shaders/glyph.wgsl");

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) enum PipelineKind {
    Rect,
    Circle,
    Image,
    Glyph,
}

/// Memoized pipelines, one per batch kind and output format.
///
/// Built lazily on first use and never rebuilt for the life of the renderer
/// unless the output format changes (a format change drops every pipeline;
/// shader modules stay cached in the [`ShaderCache`]).
#[derive(Default)]
pub(super) struct PipelineSet {
    format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<PipelineKind, wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    fill_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    run_bgl: Option<wgpu::BindGroupLayout>,
}

impl PipelineSet {
    pub(super) fn ensure(
        &mut self,
        gpu: &GpuContext,
        cache: &mut ShaderCache,
        kind: PipelineKind,
        format: wgpu::TextureFormat,
    ) -> Option<wgpu::RenderPipeline> {
        if self.format != Some(format) {
            self.pipelines.clear();
            self.format = Some(format);
        }
        if let Some(pipeline) = self.pipelines.get(&kind) {
            return Some(pipeline.clone());
        }

        self.ensure_layouts(gpu)?;
        let viewport_bgl = self.viewport_bgl.as_ref()?;
        let fill_bgl = self.fill_bgl.as_ref()?;
        let texture_bgl = self.texture_bgl.as_ref()?;
        let run_bgl = self.run_bgl.as_ref()?;

        let color_target = wgpu::ColorTargetState {
            format,
            blend: Some(premul_alpha_blend()),
            write_mask: wgpu::ColorWrites::ALL,
        };

        let shape_buffers = [QuadVertex::layout(), ShapeInstance::layout()];
        let image_buffers = [QuadVertex::layout(), ImageInstance::layout()];
        let glyph_buffers = [QuadVertex::layout(), GlyphGpuInstance::layout()];

        let desc = match kind {
            PipelineKind::Rect => PipelineDesc {
                label: "kinema rect pipeline",
                vertex_source: SHAPE_WGSL,
                fragment_source: SHAPE_WGSL,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                vertex_buffers: &shape_buffers,
                bind_group_layouts: &[viewport_bgl, fill_bgl],
                color_target,
            },
            PipelineKind::Circle => PipelineDesc {
                label: "kinema circle pipeline",
                vertex_source: CIRCLE_WGSL,
                fragment_source: CIRCLE_WGSL,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                vertex_buffers: &shape_buffers,
                bind_group_layouts: &[viewport_bgl, fill_bgl],
                color_target,
            },
            PipelineKind::Image => PipelineDesc {
                label: "kinema image pipeline",
                vertex_source: IMAGE_WGSL,
                fragment_source: IMAGE_WGSL,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                vertex_buffers: &image_buffers,
                bind_group_layouts: &[viewport_bgl, texture_bgl],
                color_target,
            },
            PipelineKind::Glyph => PipelineDesc {
                label: "kinema glyph pipeline",
                vertex_source: GLYPH_WGSL,
                fragment_source: GLYPH_WGSL,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                vertex_buffers: &glyph_buffers,
                bind_group_layouts: &[viewport_bgl, texture_bgl, run_bgl],
                color_target,
            },
        };

        let pipeline = cache.create_pipeline(gpu, &desc)?;
        self.pipelines.insert(kind, pipeline.clone());
        log::debug!("built {kind:?} pipeline for {format:?}");
        Some(pipeline)
    }

    pub(super) fn viewport_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.viewport_bgl.as_ref()
    }

    pub(super) fn fill_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.fill_bgl.as_ref()
    }

    pub(super) fn texture_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.texture_bgl.as_ref()
    }

    pub(super) fn run_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.run_bgl.as_ref()
    }

    pub(super) fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub(super) fn ensure_layouts(&mut self, gpu: &GpuContext) -> Option<()> {
        if self.viewport_bgl.is_some() {
            return Some(());
        }

        self.viewport_bgl = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kinema viewport bgl"),
            entries: &[uniform_entry::<ViewportUniform>(0, wgpu::ShaderStages::VERTEX)],
        });
        self.fill_bgl = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kinema fill bgl"),
            entries: &[uniform_entry::<FillUniform>(0, wgpu::ShaderStages::FRAGMENT)],
        });
        self.run_bgl = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kinema run bgl"),
            entries: &[uniform_entry::<RunUniform>(0, wgpu::ShaderStages::VERTEX)],
        });
        self.texture_bgl = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kinema texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        self.viewport_bgl.as_ref().map(|_| ())
    }
}

fn uniform_entry<T>(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(ubo_binding_size::<T>()),
        },
        count: None,
    }
}
