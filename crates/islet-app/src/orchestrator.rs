//! Per-frame sequencing of noise regeneration, mesh rebuild, actor update,
//! shadow pass and main pass.
//!
//! Everything a frame computes is staged locally and only published once
//! every backend call has succeeded. An abandoned frame leaves the previous
//! mesh, heightfield hash, noise request and actor transforms in place, so
//! the next frame retries from the last good state. The one exception is the
//! terrain upload: once the backend has accepted a staged mesh, an abandoned
//! frame marks the backend's terrain as stale so the next frame rebuilds and
//! re-uploads the published terrain.

use glam::{Mat4, Vec3};
use islet_config::{Config, ConfigError};
use islet_lighting::{LightMotion, LightProjector, LightViewStrategy};
use islet_math::normal_matrix;
use islet_space::{
    ActorHierarchy, ActorId, CloudBillboard, SceneError, SphereMesh, sun_billboard, uv_sphere,
};
use islet_terrain::{MeshBuilder, NoiseRequest, TerrainError, TerrainMesh};
use tracing::{debug, info, warn};

use crate::backend::{BackendError, RenderBackend};
use crate::camera::{OrbitCamera, PanDirection};
use crate::clock::SimClock;
use crate::frame::{
    ActorDraw, BillboardDraw, BillboardKind, MainPass, SceneFrame, ShadowPass, TerrainDraw,
};

/// Why a frame was abandoned, or the orchestrator could not be built.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("terrain: {0}")]
    Terrain(#[from] TerrainError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// What a successful frame had to recompute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The noise request changed and a new heightfield was rendered.
    pub heightfield_regenerated: bool,
    /// The heightfield content changed and the terrain mesh was rebuilt.
    pub mesh_rebuilt: bool,
}

/// Drives one [`RenderBackend`] frame by frame.
pub struct FrameOrchestrator {
    mesh_builder: MeshBuilder,
    projector: LightProjector,
    light: LightMotion,
    hierarchy: ActorHierarchy,
    clouds: Vec<CloudBillboard>,
    sphere: SphereMesh,
    sphere_uploaded: bool,
    camera: OrbitCamera,
    clock: SimClock,
    request: NoiseRequest,
    aspect: f32,
    terrain_model_to_world: Mat4,
    /// The backend holds a terrain mesh that was never published.
    backend_terrain_stale: bool,

    // Last published state.
    published_request: Option<NoiseRequest>,
    heightfield_hash: Option<u64>,
    mesh: Option<TerrainMesh>,
    last_frame: Option<SceneFrame>,
}

impl FrameOrchestrator {
    pub fn new(config: &Config) -> Result<Self, FrameError> {
        config.validate()?;
        let hierarchy = ActorHierarchy::new(&config.scene.actors)?;
        let sphere = uv_sphere(config.scene.sphere_divisions)?;

        let terrain = &config.terrain;
        let request = NoiseRequest {
            width: terrain.grid_width,
            height: terrain.grid_height,
            offset: terrain.offset,
            zoom: terrain.zoom,
        };

        info!(
            actors = hierarchy.len(),
            grid_width = terrain.grid_width,
            grid_height = terrain.grid_height,
            strategy = %config.light.strategy,
            "frame orchestrator ready"
        );

        Ok(Self {
            mesh_builder: MeshBuilder::new()
                .with_water_level(terrain.water_level)
                .with_world_scale(terrain.world_scale),
            projector: LightProjector::new(
                config.light.strategy,
                config.light.orbit_radius,
                config.light.ortho,
            ),
            light: config.light.motion(),
            hierarchy,
            clouds: config.scene.clouds.clone(),
            sphere,
            sphere_uploaded: false,
            camera: OrbitCamera::new(&config.camera),
            clock: SimClock::new(config.simulation.start_paused),
            request,
            aspect: config.window.width as f32 / config.window.height as f32,
            terrain_model_to_world: Mat4::IDENTITY,
            backend_terrain_stale: false,
            published_request: None,
            heightfield_hash: None,
            mesh: None,
            last_frame: None,
        })
    }

    /// Advance the clock by `frame_time` seconds and render one frame.
    pub fn frame<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        frame_time: f64,
    ) -> Result<FrameReport, FrameError> {
        self.clock.advance(frame_time);
        let result = self.run_frame(backend);
        if let Err(err) = &result {
            warn!(frame = self.clock.frame_count(), "frame abandoned: {err}");
        }
        result
    }

    fn run_frame<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<FrameReport, FrameError> {
        let sim_time = self.clock.sim_time();
        let mut report = FrameReport::default();

        if !self.sphere_uploaded {
            backend.upload_actor_mesh(&self.sphere)?;
            self.sphere_uploaded = true;
        }

        // 1. Noise, only when the request changed.
        let mut staged_hash = self.heightfield_hash;
        let mut staged_mesh = None;
        if self.published_request != Some(self.request) || self.backend_terrain_stale {
            let heightfield = backend.render_heightfield(&self.request)?;
            report.heightfield_regenerated = true;

            // 2. Mesh, only when the heightfield content changed.
            let hash = heightfield.content_hash();
            if Some(hash) != self.heightfield_hash || self.backend_terrain_stale {
                staged_mesh = Some(self.mesh_builder.build(&heightfield)?);
                staged_hash = Some(hash);
            }
        }

        // 5. Actors, before anything reads their transforms.
        let transforms = self.hierarchy.evaluate(sim_time);

        let light_world = self.light.position_at(sim_time);
        let frame = SceneFrame::new(
            self.camera.view(),
            self.camera.projection(self.aspect),
            light_world,
            sim_time,
        );

        if let Some(mesh) = &staged_mesh {
            backend.upload_terrain(mesh)?;
            self.backend_terrain_stale = true;
            report.mesh_rebuilt = true;
        }

        // 3. Shadow map.
        let light = self.projector.state(light_world);
        let terrain_model_view_light = light.view_from_light * self.terrain_model_to_world;
        let shadow = ShadowPass {
            view_from_light: light.view_from_light,
            light_projection: light.light_projection,
            terrain_model_view_light,
            terrain_mvp: light.light_projection * terrain_model_view_light,
        };
        backend.render_shadow_map(&shadow)?;

        // 4. Main pass.
        let terrain_model_view = frame.view * self.terrain_model_to_world;
        let terrain = TerrainDraw {
            mvp: frame.projection * terrain_model_view,
            model_view: terrain_model_view,
            normal_matrix: normal_matrix(&terrain_model_view),
            model_view_light: terrain_model_view_light,
        };
        let actors: Vec<ActorDraw> = self
            .hierarchy
            .ids()
            .map(|id| actor_draw(&frame, id, transforms[id.0]))
            .collect();
        let billboards = self.billboards(&frame, light.position_world.truncate());
        backend.render_main(&MainPass {
            frame: &frame,
            terrain,
            actors: &actors,
            billboards: &billboards,
            shadow: &shadow,
        })?;

        // Publish.
        self.published_request = Some(self.request);
        self.heightfield_hash = staged_hash;
        self.backend_terrain_stale = false;
        if let Some(mesh) = staged_mesh {
            info!(
                vertices = mesh.vertex_count(),
                faces = mesh.face_count(),
                "terrain mesh rebuilt"
            );
            self.mesh = Some(mesh);
        }
        self.hierarchy.publish(transforms);
        self.last_frame = Some(frame);

        debug!(
            sim_time,
            regenerated = report.heightfield_regenerated,
            rebuilt = report.mesh_rebuilt,
            "frame complete"
        );
        Ok(report)
    }

    fn billboards(&self, frame: &SceneFrame, light_position: Vec3) -> Vec<BillboardDraw> {
        let view_projection = frame.view_projection();
        let sun = sun_billboard(light_position, frame.camera_position);
        let mut draws = vec![BillboardDraw {
            kind: BillboardKind::Sun,
            model_to_world: sun,
            mvp: view_projection * sun,
        }];
        draws.extend(self.clouds.iter().enumerate().map(|(index, cloud)| {
            let model_to_world = cloud.model_to_world();
            BillboardDraw {
                kind: BillboardKind::Cloud {
                    index,
                    cloud_time: cloud.cloud_time(frame.sim_time),
                },
                model_to_world,
                mvp: view_projection * model_to_world,
            }
        }));
        draws
    }

    /// Move the noise window one step; the next frame regenerates the terrain.
    pub fn pan(&mut self, direction: PanDirection) {
        let delta = self.camera.pan_delta(direction);
        self.request.offset[0] += delta.x;
        self.request.offset[1] += delta.y;
    }

    pub fn set_noise_offset(&mut self, offset: [f32; 2]) {
        self.request.offset = offset;
    }

    /// Jump to the preset camera view and pause the simulation.
    pub fn preset(&mut self) {
        self.camera.preset();
        self.clock.set_paused(true);
        debug!("preset view activated");
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn set_light_strategy(&mut self, strategy: LightViewStrategy) {
        self.projector.strategy = strategy;
    }

    pub fn noise_request(&self) -> &NoiseRequest {
        &self.request
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// The last published terrain mesh.
    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    pub fn heightfield_hash(&self) -> Option<u64> {
        self.heightfield_hash
    }

    /// Actors with their last published transforms.
    pub fn hierarchy(&self) -> &ActorHierarchy {
        &self.hierarchy
    }

    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.last_frame.as_ref()
    }
}

fn actor_draw(frame: &SceneFrame, id: ActorId, model_to_world: Mat4) -> ActorDraw {
    let model_view = frame.view * model_to_world;
    ActorDraw {
        id,
        model_to_world,
        mvp: frame.projection * model_view,
        model_view,
        normal_matrix: normal_matrix(&model_view),
    }
}
