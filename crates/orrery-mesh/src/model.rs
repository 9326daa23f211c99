//! Wavefront OBJ import into the shared vertex format.

use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::error::MeshError;
use crate::vertex::MeshVertex;

/// One OBJ object, with its own index range and optional diffuse texture.
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// Diffuse texture resolved against the OBJ's directory.
    pub diffuse_texture: Option<PathBuf>,
}

/// A static model made of one or more parts.
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub parts: Vec<ModelPart>,
}

impl ModelMesh {
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.indices.len() / 3).sum()
    }
}

/// Load a triangulated OBJ file.
///
/// Missing normals are replaced with the normalized position; missing texture
/// coordinates become `(0, 0)`. V is flipped so that row 0 of the image is the top.
pub fn load_obj(path: &Path) -> Result<ModelMesh, MeshError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options).map_err(|source| MeshError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("Ignoring materials for {}: {e}", path.display());
        Vec::new()
    });
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let parts: Vec<ModelPart> = models
        .into_iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let vertices = convert_vertices(&mesh.positions, &mesh.normals, &mesh.texcoords);
            let diffuse_texture = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|m| m.diffuse_texture.as_deref())
                .filter(|t| !t.is_empty())
                .map(|t| base_dir.join(t));
            ModelPart {
                name: model.name,
                vertices,
                indices: mesh.indices,
                diffuse_texture,
            }
        })
        .collect();

    if parts.is_empty() {
        return Err(MeshError::EmptyModel(path.to_path_buf()));
    }

    let model = ModelMesh { parts };
    log::info!(
        "Loaded model {}: {} parts, {} vertices, {} triangles",
        path.display(),
        model.parts.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(model)
}

fn convert_vertices(positions: &[f32], normals: &[f32], texcoords: &[f32]) -> Vec<MeshVertex> {
    positions
        .chunks_exact(3)
        .enumerate()
        .map(|(i, p)| {
            let position = [p[0], p[1], p[2]];
            let normal = normals
                .get(i * 3..i * 3 + 3)
                .map(|n| [n[0], n[1], n[2]])
                .unwrap_or_else(|| Vec3::from_array(position).normalize_or_zero().to_array());
            let uv = texcoords
                .get(i * 2..i * 2 + 2)
                .map(|t| [t[0], 1.0 - t[1]])
                .unwrap_or([0.0, 0.0]);
            MeshVertex::new(position, normal, uv)
        })
        .collect()
}
