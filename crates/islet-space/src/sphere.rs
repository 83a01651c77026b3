//! Unit UV sphere used as actor geometry.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::error::SceneError;

/// Unit sphere mesh. Normals equal positions.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereMesh {
    pub vertex_positions: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub faces: Vec<[u32; 3]>,
}

/// Sphere with `divisions` rings from pole to pole and `2 * divisions`
/// segments around the Z axis. The last segment column duplicates the first
/// so the texture seam has its own coordinates.
pub fn uv_sphere(divisions: u32) -> Result<SphereMesh, SceneError> {
    if divisions < 2 {
        return Err(SceneError::SphereDivisions(divisions));
    }
    let rings = divisions as usize;
    let segments = 2 * rings;

    let mut vertex_positions = Vec::with_capacity(rings * segments);
    let mut tex_coords = Vec::with_capacity(rings * segments);
    for iv in 0..rings {
        let v = iv as f32 / (rings - 1) as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for iu in 0..segments {
            let u = iu as f32 / (segments - 1) as f32;
            let (sin_theta, cos_theta) = (2.0 * PI * u).sin_cos();
            vertex_positions.push(Vec3::new(cos_theta * sin_phi, sin_theta * sin_phi, cos_phi));
            tex_coords.push(Vec2::new(u, v));
        }
    }

    let mut faces = Vec::with_capacity(2 * (rings - 1) * (segments - 1));
    for iv in 0..rings - 1 {
        for iu in 0..segments - 1 {
            let i0 = (iu + iv * segments) as u32;
            let i1 = (iu + 1 + iv * segments) as u32;
            let i2 = (iu + 1 + (iv + 1) * segments) as u32;
            let i3 = (iu + (iv + 1) * segments) as u32;
            faces.push([i0, i1, i2]);
            faces.push([i0, i2, i3]);
        }
    }

    Ok(SphereMesh {
        vertex_normals: vertex_positions.clone(),
        vertex_positions,
        tex_coords,
        faces,
    })
}
