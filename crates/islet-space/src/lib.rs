//! Orbiting actors: hierarchy evaluation, the default solar system, sphere meshes and billboards.

mod actor;
mod billboard;
mod error;
mod solar_system;
mod sphere;

pub use actor::{
    Actor, ActorDesc, ActorHierarchy, ActorId, Orbit, OrbitDesc, actor_to_world, orbit_transform,
};
pub use billboard::{CloudBillboard, default_clouds, sun_billboard};
pub use error::SceneError;
pub use solar_system::default_solar_system;
pub use sphere::{SphereMesh, uv_sphere};
