//! GPU-side records shared by the batch pipelines.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

/// Per-batch fill color for shape pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FillUniform {
    pub color: [f32; 4],
}

/// Per-run document transform for the glyph pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct RunUniform {
    pub transform: [[f32; 4]; 4],
}

pub(super) fn ubo_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform types are non-zero-sized")
}

// ── unit quad ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── instance records ──────────────────────────────────────────────────────

/// Shape instance: the unit-quad transform, 16 floats. Fill color rides in
/// the per-batch [`FillUniform`].
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ShapeInstance {
    pub transform: [[f32; 4]; 4],
}

impl ShapeInstance {
    pub(super) fn new(transform: &Mat4) -> Self {
        Self { transform: transform.to_cols_array_2d() }
    }

    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x4, // transform col 0
        2 => Float32x4, // transform col 1
        3 => Float32x4, // transform col 2
        4 => Float32x4  // transform col 3
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Image instance: transform plus the atlas UV rectangle, 20 floats.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ImageInstance {
    pub transform: [[f32; 4]; 4],
    /// `[u0, v0, u1, v1]`.
    pub uv_rect: [f32; 4],
}

impl ImageInstance {
    pub(super) fn new(transform: &Mat4, uv_min: [f32; 2], uv_max: [f32; 2]) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            uv_rect: [uv_min[0], uv_min[1], uv_max[0], uv_max[1]],
        }
    }

    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4  // uv rect
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Glyph instance in run space, 48 bytes. The run's document transform is a
/// per-draw uniform ([`RunUniform`]), keeping this record small for long
/// text.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct GlyphGpuInstance {
    pub offset: [f32; 2],
    pub size: [f32; 2],
    /// `[u0, v0, u1, v1]` into the glyph mask atlas.
    pub uv_rect: [f32; 4],
    pub color: [f32; 4], // premultiplied
}

impl GlyphGpuInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // offset
        2 => Float32x2, // size
        3 => Float32x4, // uv rect
        4 => Float32x4  // color
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphGpuInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_strides_match_declared_float_counts() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 16 * 4);
        assert_eq!(std::mem::size_of::<ImageInstance>(), 20 * 4);
        assert_eq!(std::mem::size_of::<GlyphGpuInstance>(), 48);
    }

    #[test]
    fn shape_instance_is_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(3.0, 5.0, 0.0));
        let inst = ShapeInstance::new(&m);
        // Translation lives in the fourth column.
        assert_eq!(inst.transform[3][0], 3.0);
        assert_eq!(inst.transform[3][1], 5.0);
    }
}
