//! CPU-side mesh generation: the UV-sphere used for every celestial body,
//! OBJ model import, and the shared interleaved vertex format.

pub mod error;
pub mod model;
pub mod sphere;
pub mod vertex;

pub use error::MeshError;
pub use model::{ModelMesh, ModelPart, load_obj};
pub use sphere::{SphereMesh, generate_uv_sphere};
pub use vertex::{
    FLOATS_PER_VERTEX, MESH_VERTEX_ATTRIBUTES, MESH_VERTEX_LAYOUT, MeshVertex, NORMAL_OFFSET,
    POSITION_OFFSET, UV_OFFSET, mesh_vertex_buffer_layout,
};
