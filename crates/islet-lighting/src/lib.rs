//! Moving point light, light-space view construction for shadow mapping, and sky colour.

mod light;
mod projector;
mod sky;

pub use light::{LightMotion, OrthoBounds};
pub use projector::{
    LightProjector, LightState, LightViewStrategy, ShadowUniform, UnknownStrategy, orbit_rotation,
};
pub use sky::{NIGHT, SKY_BLUE, SUNSET_PINK, sky_color};
