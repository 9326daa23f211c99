//! Interleaved vertex format shared by the sphere and imported models.
//!
//! | Location | Offset (floats) | Format    | Field    |
//! |----------|-----------------|-----------|----------|
//! | 0        | 0               | Float32x3 | position |
//! | 1        | 3               | Float32x3 | normal   |
//! | 2        | 6               | Float32x2 | uv       |

use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Scalars per vertex in the flat buffer.
pub const FLOATS_PER_VERTEX: usize = 8;
/// Position offset in scalars.
pub const POSITION_OFFSET: usize = 0;
/// Normal offset in scalars.
pub const NORMAL_OFFSET: usize = 3;
/// UV offset in scalars.
pub const UV_OFFSET: usize = 6;

const FLOAT_SIZE: u64 = mem::size_of::<f32>() as u64;

/// One vertex: position, unit normal, texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [f32; FLOATS_PER_VERTEX]);

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

pub const MESH_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: POSITION_OFFSET as u64 * FLOAT_SIZE,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: NORMAL_OFFSET as u64 * FLOAT_SIZE,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: UV_OFFSET as u64 * FLOAT_SIZE,
        shader_location: 2,
    },
];

/// Layout used by every mesh pipeline.
pub const MESH_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<MeshVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &MESH_VERTEX_ATTRIBUTES,
};

/// Owned copy of [`MESH_VERTEX_LAYOUT`].
pub fn mesh_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    MESH_VERTEX_LAYOUT
}

const _: () = assert!(mem::size_of::<MeshVertex>() == FLOATS_PER_VERTEX * 4);
const _: () = assert!(mem::offset_of!(MeshVertex, normal) == NORMAL_OFFSET * 4);
const _: () = assert!(mem::offset_of!(MeshVertex, uv) == UV_OFFSET * 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_eight_floats() {
        assert_eq!(MESH_VERTEX_LAYOUT.array_stride, 32);
        assert_eq!(
            MESH_VERTEX_LAYOUT.array_stride,
            (FLOATS_PER_VERTEX * mem::size_of::<f32>()) as u64
        );
    }

    #[test]
    fn test_attribute_offsets() {
        assert_eq!(MESH_VERTEX_ATTRIBUTES[0].offset, 0);
        assert_eq!(MESH_VERTEX_ATTRIBUTES[1].offset, 12);
        assert_eq!(MESH_VERTEX_ATTRIBUTES[2].offset, 24);
        for (i, attr) in MESH_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_flat_cast_preserves_field_order() {
        let vertices = [MeshVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75])];
        let floats: &[f32] = bytemuck::cast_slice(&vertices);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.25, 0.75]);
    }

    #[test]
    fn test_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            return;
        };

        let Ok((device, _queue)) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        else {
            return;
        };

        let shader_source = r#"
            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) normal: vec3<f32>,
                @location(2) uv: vec2<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position + normal * uv.x, 1.0);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 1.0, 1.0, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_mesh_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MESH_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }
}
