//! Per-frame rendering of the skybox, the bodies, and the static model.

use std::path::Path;

use glam::{Mat4, Vec3};
use orrery_config::Config;
use orrery_mesh::{MeshError, generate_uv_sphere, load_obj};
use orrery_orbit::{DrawCommand, DrawTarget, SceneState};
use orrery_render::{
    BufferAllocator, DepthBuffer, FlyCamera, FrameUniform, GpuTexture, MeshBuffer, ObjectBinding,
    PlanetPipeline, PointLight, RenderContext, Shading, SkyboxRenderer, SurfaceError,
    begin_scene_pass,
};

use crate::scene_setup::{skybox_paths, texture_path};

struct ModelPartSlot {
    mesh: MeshBuffer,
    object: ObjectBinding,
}

/// GPU resources for the whole scene.
pub struct SceneRenderer {
    depth: DepthBuffer,
    pipeline: PlanetPipeline,
    sphere: MeshBuffer,
    sun: ObjectBinding,
    bodies: Vec<ObjectBinding>,
    model: Vec<ModelPartSlot>,
    model_transform: Mat4,
    skybox: Option<SkyboxRenderer>,
}

impl SceneRenderer {
    /// Upload the shared sphere and every texture. Missing textures, a missing
    /// model, or a missing skybox are logged and skipped.
    pub fn new(gpu: &RenderContext, config: &Config, scene: &SceneState) -> Result<Self, MeshError> {
        let device = &gpu.device;
        let queue = &gpu.queue;

        let sphere = generate_uv_sphere(
            config.render.sphere_radius,
            config.render.latitude_segments,
            config.render.longitude_segments,
        )?;
        tracing::info!(
            vertices = sphere.vertex_count(),
            triangles = sphere.triangle_count(),
            "Body sphere generated"
        );
        let allocator = BufferAllocator::new(device);
        let sphere = allocator.upload_sphere(&sphere);

        let pipeline = PlanetPipeline::new(device, queue, gpu.surface_format);

        let sun_texture =
            GpuTexture::load_optional(device, queue, texture_path(scene.sun().texture()));
        let sun = pipeline.create_object(device, scene.sun().name(), sun_texture.as_ref());

        let bodies = scene
            .bodies()
            .iter()
            .map(|body| {
                let texture =
                    GpuTexture::load_optional(device, queue, texture_path(body.texture()));
                pipeline.create_object(device, body.name(), texture.as_ref())
            })
            .collect();

        let model = if config.assets.model.is_empty() {
            Vec::new()
        } else {
            load_model_parts(gpu, &pipeline, Path::new(&config.assets.model))
        };

        let skybox = skybox_paths(&config.assets.skybox_faces)
            .and_then(|faces| SkyboxRenderer::load(device, queue, gpu.surface_format, &faces));

        let depth = DepthBuffer::new(
            device,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        Ok(Self {
            depth,
            pipeline,
            sphere,
            sun,
            bodies,
            model,
            model_transform: Mat4::from_translation(Vec3::from_array(config.assets.model_offset)),
            skybox,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    pub fn has_skybox(&self) -> bool {
        self.skybox.is_some()
    }

    /// Draw one frame: skybox first, then every draw command, then the model.
    pub fn render(
        &self,
        gpu: &RenderContext,
        camera: &FlyCamera,
        light: &PointLight,
        draws: &[DrawCommand],
        clear: wgpu::Color,
    ) -> Result<(), SurfaceError> {
        let queue = &gpu.queue;

        self.pipeline.write_frame(
            queue,
            &FrameUniform::new(
                camera.view_matrix(),
                camera.projection_matrix(),
                camera.position,
                light,
            ),
        );
        if let Some(skybox) = &self.skybox {
            skybox.update(queue, camera.skybox_inv_view_proj());
        }

        // Each draw owns its uniform buffer, so all writes can be queued up front.
        let mut bodies = Vec::with_capacity(draws.len());
        for draw in draws {
            let Some(object) = self.object_for(draw.target) else {
                tracing::warn!(draw_target = ?draw.target, "Draw command without a GPU slot");
                continue;
            };
            object.write(queue, draw.model, draw.scale, draw.has_texture);
            let shading = if draw.emissive {
                Shading::Emissive
            } else {
                Shading::Lit
            };
            bodies.push((object, shading));
        }
        for part in &self.model {
            part.object.write(queue, self.model_transform, 1.0, true);
        }

        let output = gpu.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = begin_scene_pass(&mut encoder, &view, &self.depth, clear);
            if let Some(skybox) = &self.skybox {
                skybox.render(&mut pass);
            }
            for (object, shading) in bodies {
                self.pipeline.draw(&mut pass, object, &self.sphere, shading);
            }
            for part in &self.model {
                self.pipeline
                    .draw(&mut pass, &part.object, &part.mesh, Shading::Lit);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn object_for(&self, target: DrawTarget) -> Option<&ObjectBinding> {
        match target {
            DrawTarget::Sun => Some(&self.sun),
            DrawTarget::Body(index) => self.bodies.get(index),
        }
    }
}

fn load_model_parts(
    gpu: &RenderContext,
    pipeline: &PlanetPipeline,
    path: &Path,
) -> Vec<ModelPartSlot> {
    let model = match load_obj(path) {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!("Static model disabled: {e}");
            return Vec::new();
        }
    };
    tracing::info!(
        parts = model.parts.len(),
        vertices = model.vertex_count(),
        triangles = model.triangle_count(),
        "Loaded model {}",
        path.display()
    );

    let allocator = BufferAllocator::new(&gpu.device);
    model
        .parts
        .iter()
        .map(|part| {
            let texture = GpuTexture::load_optional(
                &gpu.device,
                &gpu.queue,
                part.diffuse_texture.as_deref(),
            );
            ModelPartSlot {
                mesh: allocator.upload_model_part(part),
                object: pipeline.create_object(&gpu.device, &part.name, texture.as_ref()),
            }
        })
        .collect()
}
