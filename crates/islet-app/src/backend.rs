//! The rendering collaborator the frame orchestrator drives.
//!
//! A GPU backend renders the noise pass into a texture, reads it back and
//! draws the shadow and main passes. [`HeadlessBackend`] does the same work on
//! the CPU where it can (noise) and otherwise packs the GPU-facing buffers and
//! records what it was asked to draw.

use islet_lighting::{LightState, ShadowUniform};
use islet_space::SphereMesh;
use islet_terrain::{FbmGenerator, FbmParams, Heightfield, NoiseRequest, TerrainError, TerrainMesh};

use crate::frame::{MainPass, SceneUniform, ShadowPass};

/// Errors reported by a render backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The read-back noise buffer could not be turned into a heightfield.
    #[error("noise read-back failed: {0}")]
    Readback(#[from] TerrainError),

    /// The device rejected an upload or draw.
    #[error("render device error: {0}")]
    Device(String),
}

/// Operations the orchestrator needs from a renderer, in the order it calls them.
pub trait RenderBackend {
    /// Render the noise pass for `request` and read it back.
    fn render_heightfield(&mut self, request: &NoiseRequest) -> Result<Heightfield, BackendError>;

    /// Upload the actor sphere once before the first frame.
    fn upload_actor_mesh(&mut self, sphere: &SphereMesh) -> Result<(), BackendError>;

    /// Replace the terrain vertex and index buffers.
    fn upload_terrain(&mut self, mesh: &TerrainMesh) -> Result<(), BackendError>;

    fn render_shadow_map(&mut self, pass: &ShadowPass) -> Result<(), BackendError>;

    fn render_main(&mut self, pass: &MainPass<'_>) -> Result<(), BackendError>;
}

/// What a [`HeadlessBackend`] has been asked to do so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub heightfields_rendered: u64,
    pub terrain_uploads: u64,
    pub shadow_passes: u64,
    pub main_passes: u64,
    pub actor_draws: u64,
    pub billboard_draws: u64,
    /// Size of the most recent terrain vertex buffer.
    pub terrain_vertex_bytes: usize,
    /// Size of the most recent terrain index buffer.
    pub terrain_index_bytes: usize,
    pub sphere_vertex_count: usize,
    /// Bytes of uniform data written over all passes.
    pub uniform_bytes: usize,
}

/// CPU-only backend: fBm noise on the CPU, no rasterization.
pub struct HeadlessBackend {
    generator: FbmGenerator,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    pub fn new(params: FbmParams) -> Self {
        Self {
            generator: FbmGenerator::new(params),
            stats: HeadlessStats::default(),
        }
    }

    pub fn stats(&self) -> &HeadlessStats {
        &self.stats
    }
}

impl RenderBackend for HeadlessBackend {
    fn render_heightfield(&mut self, request: &NoiseRequest) -> Result<Heightfield, BackendError> {
        let heightfield = self.generator.render(request)?;
        self.stats.heightfields_rendered += 1;
        Ok(heightfield)
    }

    fn upload_actor_mesh(&mut self, sphere: &SphereMesh) -> Result<(), BackendError> {
        self.stats.sphere_vertex_count = sphere.vertex_positions.len();
        Ok(())
    }

    fn upload_terrain(&mut self, mesh: &TerrainMesh) -> Result<(), BackendError> {
        let vertices = mesh.vertices();
        let indices = mesh.indices();
        self.stats.terrain_vertex_bytes = bytemuck::cast_slice::<_, u8>(&vertices).len();
        self.stats.terrain_index_bytes = bytemuck::cast_slice::<_, u8>(&indices).len();
        self.stats.terrain_uploads += 1;
        tracing::debug!(
            vertex_bytes = self.stats.terrain_vertex_bytes,
            index_bytes = self.stats.terrain_index_bytes,
            "terrain buffers uploaded"
        );
        Ok(())
    }

    fn render_shadow_map(&mut self, pass: &ShadowPass) -> Result<(), BackendError> {
        let mvp = pass.terrain_mvp.to_cols_array();
        self.stats.uniform_bytes += bytemuck::bytes_of(&mvp).len();
        self.stats.shadow_passes += 1;
        Ok(())
    }

    fn render_main(&mut self, pass: &MainPass<'_>) -> Result<(), BackendError> {
        let scene = SceneUniform::from(pass.frame);
        let shadow = ShadowUniform::from(&LightState {
            position_world: pass.frame.light_position_world,
            view_from_light: pass.shadow.view_from_light,
            light_projection: pass.shadow.light_projection,
        });
        self.stats.uniform_bytes += bytemuck::bytes_of(&scene).len() + bytemuck::bytes_of(&shadow).len();
        self.stats.actor_draws += pass.actors.len() as u64;
        self.stats.billboard_draws += pass.billboards.len() as u64;
        self.stats.main_passes += 1;
        Ok(())
    }
}
