//! Latitude/longitude sphere tessellation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::error::MeshError;
use crate::vertex::MeshVertex;

/// An origin-centred UV-sphere, built once and never mutated.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub radius: f32,
    pub latitude_segments: u32,
    pub longitude_segments: u32,
    pub vertices: Vec<MeshVertex>,
    /// Triangle list, counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flat vertex buffer, [`FLOATS_PER_VERTEX`](crate::FLOATS_PER_VERTEX) scalars per vertex.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index into `vertices` of grid point (`lat`, `lon`).
    pub fn grid_index(&self, lat: u32, lon: u32) -> usize {
        (lat * (self.longitude_segments + 1) + lon) as usize
    }
}

/// Tessellate a sphere of `radius` into `latitude_segments` bands and
/// `longitude_segments` slices.
///
/// The grid is `longitude_segments + 1` columns wide: the last column repeats
/// the first in position but carries `u = 1.0` so textures wrap without a seam.
/// Ring `i = 0` collapses onto the north pole `(0, radius, 0)`.
pub fn generate_uv_sphere(
    radius: f32,
    latitude_segments: u32,
    longitude_segments: u32,
) -> Result<SphereMesh, MeshError> {
    if latitude_segments == 0 || longitude_segments == 0 {
        return Err(MeshError::ZeroSegments {
            latitude: latitude_segments,
            longitude: longitude_segments,
        });
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::InvalidRadius(radius));
    }

    let columns = u64::from(longitude_segments) + 1;
    let rows = u64::from(latitude_segments) + 1;
    if rows * columns > u64::from(u32::MAX) {
        return Err(MeshError::TooManyVertices {
            latitude: latitude_segments,
            longitude: longitude_segments,
        });
    }

    let mut vertices = Vec::with_capacity((rows * columns) as usize);
    for i in 0..=latitude_segments {
        let v = i as f32 / latitude_segments as f32;
        let phi = v * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..=longitude_segments {
            let u = j as f32 / longitude_segments as f32;
            let theta = u * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            let position = normal * radius;
            vertices.push(MeshVertex::new(
                position.to_array(),
                normal.to_array(),
                [u, v],
            ));
        }
    }

    let columns = columns as u32;
    let mut indices =
        Vec::with_capacity(latitude_segments as usize * longitude_segments as usize * 6);
    for i in 0..latitude_segments {
        for j in 0..longitude_segments {
            let top_left = i * columns + j;
            let bottom_left = (i + 1) * columns + j;
            let top_right = top_left + 1;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[bottom_left, top_left, bottom_right]);
            indices.extend_from_slice(&[top_left, top_right, bottom_right]);
        }
    }

    log::debug!(
        "Generated UV sphere r={radius} {latitude_segments}x{longitude_segments}: {} vertices, {} triangles",
        vertices.len(),
        indices.len() / 3
    );

    Ok(SphereMesh {
        radius,
        latitude_segments,
        longitude_segments,
        vertices,
        indices,
    })
}
