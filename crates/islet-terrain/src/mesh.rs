//! Terrain mesh construction from a heightfield.
//!
//! Every heightfield sample becomes one vertex. Heights are recentred from
//! `[0, 1]` to `[-0.5, 0.5]`, normals come from central differences over the
//! edge-clamped sampler, and anything below the water level is flattened to
//! a horizontal water surface. The grid spans `[-0.5, 0.5]²` in XY with Z up.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::TerrainError;
use crate::heightfield::HeightSource;

/// Elevation below which terrain is clamped flat as water, in recentred
/// height units.
pub const WATER_LEVEL: f32 = -0.03125;

/// Interleaved vertex for GPU upload: position then normal, 24 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

static_assertions::const_assert_eq!(std::mem::size_of::<TerrainVertex>(), 24);

/// Triangulated terrain surface.
///
/// `vertex_positions` and `vertex_normals` are parallel arrays with one
/// entry per heightfield sample, row-major. Faces wind counter-clockwise
/// when seen from +Z.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    pub vertex_positions: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    grid_width: usize,
    grid_height: usize,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertex_positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Grid dimensions of the source heightfield.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid_width, self.grid_height)
    }

    /// Positions and normals interleaved for a single vertex buffer.
    pub fn vertices(&self) -> Vec<TerrainVertex> {
        self.vertex_positions
            .iter()
            .zip(&self.vertex_normals)
            .map(|(p, n)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Faces flattened into a triangle-list index buffer.
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

/// Builds [`TerrainMesh`]es with a fixed water level and world scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBuilder {
    water_level: f32,
    world_scale: f32,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self {
            water_level: WATER_LEVEL,
            world_scale: 1.0,
        }
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_water_level(mut self, water_level: f32) -> Self {
        self.water_level = water_level;
        self
    }

    /// Uniform scale applied to every output position. Normals are unaffected.
    pub fn with_world_scale(mut self, world_scale: f32) -> Self {
        self.world_scale = world_scale;
        self
    }

    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    /// Build the mesh for `source`.
    ///
    /// Produces exactly `width * height` vertices and
    /// `2 * (width - 1) * (height - 1)` triangles.
    pub fn build<S: HeightSource + ?Sized>(&self, source: &S) -> Result<TerrainMesh, TerrainError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        let vertex_count = width
            .checked_mul(height)
            .ok_or(TerrainError::DimensionsOverflow { width, height })?;
        if vertex_count > u32::MAX as usize {
            return Err(TerrainError::GridTooLarge {
                vertices: vertex_count,
            });
        }

        let mut vertex_positions = Vec::with_capacity(vertex_count);
        let mut vertex_normals = Vec::with_capacity(vertex_count);

        // Grid spacing in mesh units; central differences span two cells.
        let dx = 2.0 / width as f32;
        let dy = 2.0 / height as f32;

        for gy in 0..height {
            for gx in 0..width {
                let (x, y) = (gx as isize, gy as isize);
                let mut elevation = source.sample(x, y) - 0.5;

                let slope_x = (source.sample(x + 1, y) - source.sample(x - 1, y)) / dx;
                let slope_y = (source.sample(x, y + 1) - source.sample(x, y - 1)) / dy;
                let mut normal = Vec3::new(-slope_x, -slope_y, 1.0).normalize();

                // Height and normal are replaced together.
                if elevation < self.water_level {
                    elevation = self.water_level;
                    normal = Vec3::Z;
                }

                let position = Vec3::new(
                    gx as f32 / width as f32 - 0.5,
                    gy as f32 / height as f32 - 0.5,
                    elevation,
                );
                vertex_positions.push(position * self.world_scale);
                vertex_normals.push(normal);
            }
        }

        let faces = triangulate(width, height);

        tracing::debug!(
            width,
            height,
            vertices = vertex_positions.len(),
            faces = faces.len(),
            "built terrain mesh"
        );

        Ok(TerrainMesh {
            vertex_positions,
            vertex_normals,
            faces,
            grid_width: width,
            grid_height: height,
        })
    }
}

/// Two triangles per grid cell, split along the (gx,gy)-(gx+1,gy+1) diagonal.
fn triangulate(width: usize, height: usize) -> Vec<[u32; 3]> {
    let cells_x = width.saturating_sub(1);
    let cells_y = height.saturating_sub(1);
    let mut faces = Vec::with_capacity(2 * cells_x * cells_y);
    let row = width as u32;

    for gy in 0..cells_y as u32 {
        for gx in 0..cells_x as u32 {
            let i0 = gx + gy * row;
            let i1 = i0 + 1;
            let i2 = i0 + row + 1;
            let i3 = i0 + row;
            faces.push([i0, i1, i2]);
            faces.push([i0, i2, i3]);
        }
    }
    faces
}
