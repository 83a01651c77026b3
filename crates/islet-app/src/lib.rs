//! Islet application: frame orchestration over a pluggable render backend.

pub mod backend;
pub mod camera;
pub mod clock;
pub mod frame;
pub mod orchestrator;

pub use backend::{BackendError, HeadlessBackend, HeadlessStats, RenderBackend};
pub use camera::{OrbitCamera, PanDirection};
pub use clock::SimClock;
pub use frame::{
    ActorDraw, BillboardDraw, BillboardKind, MainPass, SceneFrame, SceneUniform, ShadowPass,
    TerrainDraw,
};
pub use orchestrator::{FrameError, FrameOrchestrator, FrameReport};
