//! wgpu rendering for the orrery: device setup, mesh upload, textures, the
//! fly camera, the point-lit planet pipeline and the skybox.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod skybox;
pub mod texture;

pub use buffer::{BufferAllocator, MeshBuffer};
pub use camera::{FlyCamera, MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{begin_scene_pass, clear_color};
pub use pipeline::{
    FrameUniform, MATERIAL_SHININESS, ObjectBinding, ObjectUniform, PlanetPipeline, PointLight,
    Shading, normal_matrix,
};
pub use skybox::{SKY_SHADER_SOURCE, SkyUniform, SkyboxRenderer, load_faces};
pub use texture::{GpuTexture, ImageData, TEXTURE_FORMAT, TextureError};
