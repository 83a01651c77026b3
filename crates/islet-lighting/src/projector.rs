//! Light-space view construction for shadow mapping.
//!
//! The shadow pass renders the scene from a synthetic camera placed along the
//! light direction and looking at the world origin. The same view, combined
//! with the orthographic light projection, maps world positions into the
//! shadow map during the main pass.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use islet_math::{Elementary, compose_elementary};
use serde::{Deserialize, Serialize};

use crate::light::OrthoBounds;

/// Direction the orbit-derived camera looks along before rotation.
const REFERENCE_AXIS: Vec3 = Vec3::NEG_X;
/// Rotation axes are expected to point into this half-space.
const SECONDARY_AXIS: Vec3 = Vec3::Y;
const AXIS_EPSILON: f32 = 1e-6;

/// How the light-space view is derived from the light position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightViewStrategy {
    /// Rotate the world so the light lies on a fixed reference axis, push it
    /// out by the orbit radius and view it from a canonical Z-up camera.
    #[default]
    OrbitLookAt,
    /// Look from the light position at the origin with +Y up.
    DirectLookAt,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown light view strategy '{0}' (expected 'orbit' or 'direct')")]
pub struct UnknownStrategy(pub String);

impl FromStr for LightViewStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orbit" | "orbit-look-at" | "orbitlookat" => Ok(Self::OrbitLookAt),
            "direct" | "direct-look-at" | "directlookat" => Ok(Self::DirectLookAt),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for LightViewStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrbitLookAt => write!(f, "orbit"),
            Self::DirectLookAt => write!(f, "direct"),
        }
    }
}

/// Axis and angle of the rotation carrying the reference axis `(-1, 0, 0)`
/// onto `direction`.
///
/// The axis is flipped into the `+Y` half-space, with the angle replaced by
/// `2π - angle`, so that lights circling in the XZ plane always rotate about
/// `+Y`. When `direction` is parallel to the reference axis the cross product
/// vanishes and `+Y` is used instead.
pub fn orbit_rotation(direction: Vec3) -> (Vec3, f32) {
    let d = direction.normalize_or(REFERENCE_AXIS);
    let angle = d.dot(REFERENCE_AXIS).clamp(-1.0, 1.0).acos();
    let axis = REFERENCE_AXIS.cross(d);
    if axis.length() < AXIS_EPSILON {
        return (SECONDARY_AXIS, angle);
    }
    let axis = axis.normalize();
    if axis.dot(SECONDARY_AXIS) < 0.0 {
        (-axis, TAU - angle)
    } else {
        (axis, angle)
    }
}

/// The light for one frame: where it is and how the shadow pass sees the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightState {
    /// Homogeneous world position (`w = 1`).
    pub position_world: Vec4,
    pub view_from_light: Mat4,
    pub light_projection: Mat4,
}

impl LightState {
    /// `light_projection * view_from_light * model_to_world`.
    pub fn light_mvp(&self, model_to_world: &Mat4) -> Mat4 {
        self.light_projection * self.view_from_light * *model_to_world
    }
}

/// Builds the light-space view and projection for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LightProjector {
    pub strategy: LightViewStrategy,
    /// Distance the orbit-derived camera is pushed out from the origin.
    pub orbit_radius: f32,
    pub bounds: OrthoBounds,
}

impl Default for LightProjector {
    fn default() -> Self {
        Self {
            strategy: LightViewStrategy::default(),
            orbit_radius: 100.0,
            bounds: OrthoBounds::default(),
        }
    }
}

impl LightProjector {
    pub fn new(strategy: LightViewStrategy, orbit_radius: f32, bounds: OrthoBounds) -> Self {
        Self {
            strategy,
            orbit_radius,
            bounds,
        }
    }

    /// World-to-light-camera transform for a light at `light_position_world`.
    pub fn view_from_light(&self, light_position_world: Vec3) -> Mat4 {
        match self.strategy {
            LightViewStrategy::OrbitLookAt => self.orbit_view(light_position_world),
            LightViewStrategy::DirectLookAt => self.direct_view(light_position_world),
        }
    }

    fn orbit_view(&self, light_position_world: Vec3) -> Mat4 {
        let (axis, angle) = orbit_rotation(light_position_world);
        compose_elementary(&[
            Elementary::LookAt {
                eye: REFERENCE_AXIS,
                target: Vec3::ZERO,
                up: Vec3::Z,
            },
            Elementary::Translate(Vec3::new(self.orbit_radius, 0.0, 0.0)),
            Elementary::RotateAxis { axis, angle: -angle },
        ])
    }

    fn direct_view(&self, light_position_world: Vec3) -> Mat4 {
        let eye = if light_position_world.length() < AXIS_EPSILON {
            -REFERENCE_AXIS * self.orbit_radius
        } else {
            light_position_world
        };
        let dir = eye.normalize();
        let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        Mat4::look_at_rh(eye, Vec3::ZERO, up)
    }

    pub fn projection(&self) -> Mat4 {
        self.bounds.projection()
    }

    /// Derive the full light state for a light at `position_world`.
    pub fn state(&self, position_world: Vec4) -> LightState {
        LightState {
            position_world,
            view_from_light: self.view_from_light(position_world.truncate()),
            light_projection: self.projection(),
        }
    }

    /// `view_from_light * model_to_world`.
    pub fn model_view_light(&self, light_position_world: Vec3, model_to_world: &Mat4) -> Mat4 {
        self.view_from_light(light_position_world) * *model_to_world
    }

    /// `projection * view_from_light * model_to_world`.
    pub fn light_mvp(&self, light_position_world: Vec3, model_to_world: &Mat4) -> Mat4 {
        self.projection() * self.model_view_light(light_position_world, model_to_world)
    }
}

/// GPU-side shadow uniform.
///
/// Total size: 16×4 + 16×4 + 4×4 = 144 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShadowUniform {
    /// Light projection times light view.
    pub light_view_projection: [f32; 16],
    pub light_view: [f32; 16],
    pub light_position_world: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<ShadowUniform>(), 144);

impl From<&LightState> for ShadowUniform {
    fn from(light: &LightState) -> Self {
        Self {
            light_view_projection: (light.light_projection * light.view_from_light).to_cols_array(),
            light_view: light.view_from_light.to_cols_array(),
            light_position_world: light.position_world.to_array(),
        }
    }
}
