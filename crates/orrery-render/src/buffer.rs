//! Vertex and index buffer upload for the shared mesh vertex format.

use orrery_mesh::{MeshVertex, ModelPart, SphereMesh};
use wgpu::util::DeviceExt;

/// A mesh resident on the GPU: interleaved vertices plus a `u32` triangle list.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), Self::INDEX_FORMAT);
    }

    /// Draw the entire mesh using indexed rendering.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// GPU buffer allocator for mesh uploads.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload interleaved vertices and a triangle list.
    pub fn create_mesh(&self, label: &str, vertices: &[MeshVertex], indices: &[u32]) -> MeshBuffer {
        let vertex_buffer = self.create_buffer_init(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = self.create_buffer_init(
            &format!("{label}-indices"),
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX,
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Upload the body sphere. Every body shares this one buffer.
    pub fn upload_sphere(&self, sphere: &SphereMesh) -> MeshBuffer {
        log::debug!(
            "Uploading sphere: {} vertices, {} triangles",
            sphere.vertex_count(),
            sphere.triangle_count()
        );
        self.create_mesh("sphere", &sphere.vertices, &sphere.indices)
    }

    pub fn upload_model_part(&self, part: &ModelPart) -> MeshBuffer {
        self.create_mesh(&format!("model-{}", part.name), &part.vertices, &part.indices)
    }

    /// A `COPY_DST` uniform buffer initialised with `contents`.
    pub fn create_uniform(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.create_buffer_init(
            label,
            contents,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn create_buffer_init(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Headless device for GPU tests; `None` when the machine has no adapter.
#[cfg(test)]
pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: Default::default(),
                ..Default::default()
            })
            .await
            .ok()
    })
}
