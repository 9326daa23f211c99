//! Render pipeline for point-lit textured meshes.
//!
//! Group 0 holds per-frame camera and light state, group 1 one object's
//! transform, texture and sampler. Every drawn object owns an
//! [`ObjectBinding`] so that all uniform writes for a frame can be queued
//! before the pass executes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use static_assertions::const_assert_eq;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::texture::{GpuTexture, create_linear_sampler};

pub const PLANET_SHADER_SOURCE: &str = include_str!("planet.wgsl");

/// Specular exponent shared by every lit surface.
pub const MATERIAL_SHININESS: f32 = 32.0;

/// The single scene light, which sits at the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// `1 / (constant + linear*d + quadratic*d^2)`, as evaluated in the shader.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(1.0),
            specular: Vec3::splat(0.2),
            constant: 1.0,
            linear: 0.0009,
            quadratic: 0.00032,
        }
    }
}

/// Per-frame uniform (group 0). Scalars ride in the `w` lanes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<FrameUniform>(), 208);

impl FrameUniform {
    pub fn new(view: Mat4, projection: Mat4, view_position: Vec3, light: &PointLight) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            view_position: view_position.extend(MATERIAL_SHININESS).to_array(),
            light_position: light.position.extend(light.constant).to_array(),
            light_ambient: light.ambient.extend(light.linear).to_array(),
            light_diffuse: light.diffuse.extend(light.quadratic).to_array(),
            light_specular: light.specular.extend(0.0).to_array(),
        }
    }
}

/// Per-object uniform (group 1, binding 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// WGSL `mat3x3<f32>`: three columns padded to 16 bytes.
    pub normal_matrix: [[f32; 4]; 3],
    /// x: scale, y: has_texture.
    pub params: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<ObjectUniform>(), 128);

impl ObjectUniform {
    pub fn new(model: Mat4, scale: f32, has_texture: bool) -> Self {
        let normal = normal_matrix(model);
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
            params: [scale, if has_texture { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }
}

/// Inverse-transpose of the model's linear part; identity if it is singular.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(model);
    if linear.determinant().abs() <= f32::EPSILON {
        return Mat3::IDENTITY;
    }
    linear.inverse().transpose()
}

/// Fragment entry used for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Blinn-Phong under the point light.
    Lit,
    /// Unlit base colour, for the sun.
    Emissive,
}

/// One drawable object's uniform buffer and group 1 bind group.
pub struct ObjectBinding {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    has_texture: bool,
}

impl ObjectBinding {
    pub fn has_texture(&self) -> bool {
        self.has_texture
    }

    /// Uniform for one draw. Sampling needs both a bound texture and the
    /// draw asking for it; otherwise the base colour is used.
    pub fn uniform(&self, model: Mat4, scale: f32, has_texture: bool) -> ObjectUniform {
        ObjectUniform::new(model, scale, has_texture && self.has_texture)
    }

    /// Queue this frame's transform.
    pub fn write(&self, queue: &wgpu::Queue, model: Mat4, scale: f32, has_texture: bool) {
        let uniform = self.uniform(model, scale, has_texture);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }
}

/// Lit and emissive pipelines sharing one layout, plus the frame uniform.
pub struct PlanetPipeline {
    lit: wgpu::RenderPipeline,
    emissive: wgpu::RenderPipeline,
    object_bind_group_layout: wgpu::BindGroupLayout,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white: GpuTexture,
}

impl PlanetPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("planet-shader"),
            source: wgpu::ShaderSource::Wgsl(PLANET_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("planet-frame-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FrameUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("planet-object-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<ObjectUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("planet-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            immediate_size: 0,
        });

        let create = |label: &str, fragment_entry: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[orrery_mesh::mesh_vertex_buffer_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(DepthBuffer::stencil_state(true)),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };
        let lit = create("planet-lit-pipeline", "fs_lit");
        let emissive = create("planet-emissive-pipeline", "fs_emissive");

        let frame_uniform = FrameUniform::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::ZERO,
            &PointLight::default(),
        );
        let frame_buffer = BufferAllocator::new(device)
            .create_uniform("planet-frame-uniform", bytemuck::bytes_of(&frame_uniform));
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planet-frame-bg"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        Self {
            lit,
            emissive,
            object_bind_group_layout,
            frame_buffer,
            frame_bind_group,
            sampler: create_linear_sampler(device, "planet-sampler"),
            white: GpuTexture::white(device, queue),
        }
    }

    /// Queue the camera and light state for this frame.
    pub fn write_frame(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Create an object slot. `None` binds the white texture and selects
    /// untextured shading.
    pub fn create_object(
        &self,
        device: &wgpu::Device,
        label: &str,
        texture: Option<&GpuTexture>,
    ) -> ObjectBinding {
        let has_texture = texture.is_some();
        let view = &texture.unwrap_or(&self.white).view;
        let uniform = ObjectUniform::new(Mat4::IDENTITY, 1.0, has_texture);
        let uniform_buffer = BufferAllocator::new(device)
            .create_uniform(&format!("{label}-uniform"), bytemuck::bytes_of(&uniform));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.object_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        ObjectBinding {
            uniform_buffer,
            bind_group,
            has_texture,
        }
    }

    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        object: &ObjectBinding,
        mesh: &MeshBuffer,
        shading: Shading,
    ) {
        pass.set_pipeline(match shading {
            Shading::Lit => &self.lit,
            Shading::Emissive => &self.emissive,
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &object.bind_group, &[]);
        mesh.bind(pass);
        mesh.draw(pass);
    }
}
