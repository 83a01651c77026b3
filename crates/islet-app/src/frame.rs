//! Per-frame data handed to the render backend.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};
use islet_space::ActorId;

/// Scene parameters shared by every draw in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    /// World-to-camera transform.
    pub view: Mat4,
    /// Camera-to-clip transform.
    pub projection: Mat4,
    /// Homogeneous light position in world space (`w = 1`).
    pub light_position_world: Vec4,
    /// The same position in camera space.
    pub light_position_cam: Vec4,
    pub camera_position: Vec3,
    pub sim_time: f32,
    /// Background clear colour.
    pub sky_color: Vec4,
}

impl SceneFrame {
    pub fn new(view: Mat4, projection: Mat4, light_position_world: Vec4, sim_time: f32) -> Self {
        Self {
            view,
            projection,
            light_position_world,
            light_position_cam: view * light_position_world,
            camera_position: view.inverse().w_axis.truncate(),
            sim_time,
            sky_color: islet_lighting::sky_color(light_position_world.truncate()),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// GPU-side packing of [`SceneFrame`].
///
/// Total size: 16×4 + 16×4 + 4×4 + 4×4 + 4×4 + 4×4 = 192 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view: [f32; 16],
    pub projection: [f32; 16],
    pub light_position_world: [f32; 4],
    pub light_position_cam: [f32; 4],
    pub sky_color: [f32; 4],
    /// Simulation time in `x`, the rest is padding.
    pub sim_time_pad: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<SceneUniform>(), 192);

impl From<&SceneFrame> for SceneUniform {
    fn from(frame: &SceneFrame) -> Self {
        Self {
            view: frame.view.to_cols_array(),
            projection: frame.projection.to_cols_array(),
            light_position_world: frame.light_position_world.to_array(),
            light_position_cam: frame.light_position_cam.to_array(),
            sky_color: frame.sky_color.to_array(),
            sim_time_pad: [frame.sim_time, 0.0, 0.0, 0.0],
        }
    }
}

/// Matrices for drawing the terrain in the main pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainDraw {
    pub mvp: Mat4,
    pub model_view: Mat4,
    pub normal_matrix: Mat3,
    /// Light view times terrain model, for shadow lookups.
    pub model_view_light: Mat4,
}

/// Matrices for drawing one actor sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorDraw {
    pub id: ActorId,
    pub model_to_world: Mat4,
    pub mvp: Mat4,
    pub model_view: Mat4,
    pub normal_matrix: Mat3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BillboardKind {
    Sun,
    /// Cloud by index, animated at its own offset time.
    Cloud { index: usize, cloud_time: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillboardDraw {
    pub kind: BillboardKind,
    pub model_to_world: Mat4,
    pub mvp: Mat4,
}

/// Inputs of the shadow-map pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowPass {
    pub view_from_light: Mat4,
    pub light_projection: Mat4,
    pub terrain_model_view_light: Mat4,
    /// Light projection times terrain model-view-light.
    pub terrain_mvp: Mat4,
}

/// Inputs of the main shading pass.
#[derive(Clone, Copy, Debug)]
pub struct MainPass<'a> {
    pub frame: &'a SceneFrame,
    pub terrain: TerrainDraw,
    pub actors: &'a [ActorDraw],
    pub billboards: &'a [BillboardDraw],
    pub shadow: &'a ShadowPass,
}
