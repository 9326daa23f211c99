//! Skybox: a cube texture behind all scene geometry.
//!
//! Drawn first in the scene pass with a single fullscreen triangle whose corners
//! are unprojected through a rotation-only inverse view-projection.

use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::buffer::BufferAllocator;
use crate::depth::DepthBuffer;
use crate::texture::{GpuTexture, ImageData, TextureError};

pub const SKY_SHADER_SOURCE: &str = include_str!("sky.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyUniform {
    /// Clip space to world direction, with the camera translation removed.
    pub clip_to_world: [[f32; 4]; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<SkyUniform>(), 64);

impl SkyUniform {
    pub fn new(clip_to_world: Mat4) -> Self {
        Self {
            clip_to_world: clip_to_world.to_cols_array_2d(),
        }
    }
}

/// Decode six face images in +X, -X, +Y, -Y, +Z, -Z order.
pub fn load_faces(paths: &[PathBuf; 6]) -> Result<[ImageData; 6], TextureError> {
    let [px, nx, py, ny, pz, nz] = paths;
    Ok([
        ImageData::load(px)?,
        ImageData::load(nx)?,
        ImageData::load(py)?,
        ImageData::load(ny)?,
        ImageData::load(pz)?,
        ImageData::load(nz)?,
    ])
}

pub struct SkyboxRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SkyboxRenderer {
    /// Load the faces and build the renderer. Any missing or mismatched face
    /// disables the skybox; the frame is then just the clear colour.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        faces: &[PathBuf; 6],
    ) -> Option<Self> {
        let cube = load_faces(faces).and_then(|images| GpuTexture::cube(device, queue, &images));
        match cube {
            Ok(cube) => {
                log::info!(
                    "Skybox loaded: {}x{} per face",
                    cube.dimensions.0,
                    cube.dimensions.1
                );
                Some(Self::new(device, surface_format, &cube))
            }
            Err(e) => {
                log::warn!("Skybox disabled: {e}");
                None
            }
        }
    }

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        cube: &GpuTexture,
    ) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky-module"),
            source: wgpu::ShaderSource::Wgsl(SKY_SHADER_SOURCE.into()),
        });

        // One group: the matrix for the vertex stage, the cube and its sampler
        // for the fragment stage.
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SkyUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky"),
            layout: Some(&device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("sky"),
                bind_group_layouts: &[&layout],
                immediate_size: 0,
            })),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_sky"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            // Shares the scene pass, so it must match the depth attachment,
            // but never writes or tests depth.
            depth_stencil: Some(DepthBuffer::stencil_state(false)),
            multisample: Default::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_sky"),
                targets: &[Some(surface_format.into())],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sky-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform = BufferAllocator::new(device).create_uniform(
            "sky-uniform",
            bytemuck::bytes_of(&SkyUniform::new(Mat4::IDENTITY)),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cube.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            pipeline,
            uniform,
            bind_group,
        }
    }

    /// Queue this frame's `clip_to_world`, see [`FlyCamera::skybox_inv_view_proj`](crate::FlyCamera::skybox_inv_view_proj).
    pub fn update(&self, queue: &wgpu::Queue, clip_to_world: Mat4) {
        queue.write_buffer(
            &self.uniform,
            0,
            bytemuck::bytes_of(&SkyUniform::new(clip_to_world)),
        );
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::create_test_device;

    fn missing_faces() -> [PathBuf; 6] {
        std::array::from_fn(|i| PathBuf::from(format!("missing/face{i}.png")))
    }

    #[test]
    fn test_missing_face_is_reported() {
        assert!(matches!(
            load_faces(&missing_faces()),
            Err(TextureError::Image { .. })
        ));
    }

    #[test]
    fn test_loads_six_faces_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: [PathBuf; 6] = std::array::from_fn(|i| {
            let path = dir.path().join(format!("face{i}.png"));
            image::RgbImage::from_pixel(2, 2, image::Rgb([i as u8, 0, 0]))
                .save(&path)
                .unwrap();
            path
        });
        let faces = load_faces(&paths).unwrap();
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.pixels[0], i as u8);
        }
    }

    #[test]
    fn test_uniform_keeps_column_order() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = SkyUniform::new(m);
        assert_eq!(uniform.clip_to_world[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_missing_faces_disable_skybox() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let skybox = SkyboxRenderer::load(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &missing_faces(),
        );
        assert!(skybox.is_none());
    }

    #[test]
    fn test_builds_from_solid_cube() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let faces: [ImageData; 6] =
            std::array::from_fn(|_| ImageData::new(1, 1, 3, vec![10, 20, 30]).unwrap());
        let cube = GpuTexture::cube(&device, &queue, &faces).unwrap();
        let skybox = SkyboxRenderer::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &cube);
        skybox.update(&queue, Mat4::IDENTITY);
    }
}
