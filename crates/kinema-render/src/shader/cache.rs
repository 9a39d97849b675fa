use std::collections::HashMap;

use crate::device::GpuContext;

use super::Fingerprint;

/// Everything needed to compose a render pipeline from cached modules.
///
/// Vertex and fragment sources may reference the same WGSL string (one file
/// carrying both entry points); the module is compiled once either way.
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub color_target: wgpu::ColorTargetState,
}

/// Cache of compiled shader modules keyed by source fingerprint.
///
/// wgpu modules are Arc-backed; `get_or_compile` hands out cheap clones.
/// Pipelines are not cached here — batch-type-to-pipeline memoization is the
/// batch renderer's responsibility.
#[derive(Default)]
pub struct ShaderCache {
    modules: HashMap<Fingerprint, wgpu::ShaderModule>,
}

impl ShaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached module for `source`, compiling and storing on miss.
    ///
    /// Returns `None` when the device is absent (factory contract of
    /// [`GpuContext`]).
    pub fn get_or_compile(
        &mut self,
        gpu: &GpuContext,
        source: &str,
        label: &str,
    ) -> Option<wgpu::ShaderModule> {
        let key = Fingerprint::of_str(source);

        if let Some(module) = self.modules.get(&key) {
            return Some(module.clone());
        }

        let device = gpu.device()?;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        log::debug!("compiled shader module '{label}' ({} cached)", self.modules.len() + 1);
        self.modules.insert(key, module.clone());
        Some(module)
    }

    /// Composes a render pipeline from cached shader modules.
    pub fn create_pipeline(
        &mut self,
        gpu: &GpuContext,
        desc: &PipelineDesc<'_>,
    ) -> Option<wgpu::RenderPipeline> {
        let vertex_module = self.get_or_compile(gpu, desc.vertex_source, desc.label)?;
        let fragment_module = self.get_or_compile(gpu, desc.fragment_source, desc.label)?;

        let layout = gpu.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        })?;

        gpu.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(desc.vertex_entry),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(desc.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(desc.color_target.clone())],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drops all cached modules.
    ///
    /// Call between documents/scenes, never mid-frame: batches built this
    /// frame may still reference pipelines composed from these modules.
    pub fn clear(&mut self) {
        self.modules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_without_device_degrades_to_none() {
        let gpu = GpuContext::new();
        let mut cache = ShaderCache::new();
        assert!(cache.get_or_compile(&gpu, "fn vs_main() {}", "t").is_none());
        // Nothing must be cached for a failed compile.
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = ShaderCache::new();
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
