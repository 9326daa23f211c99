use std::path::PathBuf;

/// Errors raised while building or importing meshes.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// A sphere needs at least one latitude band and one longitude slice.
    #[error("sphere needs at least one segment per axis (got {latitude}x{longitude})")]
    ZeroSegments { latitude: u32, longitude: u32 },

    /// Radius must be positive and finite.
    #[error("sphere radius must be positive and finite (got {0})")]
    InvalidRadius(f32),

    /// The vertex grid would not be addressable with 32-bit indices.
    #[error("{latitude}x{longitude} segments exceed the 32-bit index range")]
    TooManyVertices { latitude: u32, longitude: u32 },

    /// The OBJ file could not be loaded.
    #[error("failed to load model {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// The OBJ file loaded but contained no triangles.
    #[error("model {0} contains no geometry")]
    EmptyModel(PathBuf),
}
