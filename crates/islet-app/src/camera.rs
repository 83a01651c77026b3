//! Orbit camera around the world origin, and terrain panning relative to it.

use glam::{Mat4, Vec2, Vec3};
use islet_config::CameraConfig;
use islet_math::{Elementary, compose_elementary, translation_of};

/// Radians of rotation per pixel of drag.
const DRAG_SENSITIVITY: f32 = 0.005;

/// Camera orbiting the origin, parameterised by two angles and a distance.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Rotation about the world Z axis.
    pub angle_z: f32,
    /// Elevation, as a rotation about the Y axis.
    pub angle_y: f32,
    pub distance_factor: f32,
    config: CameraConfig,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            angle_z: config.angle_z,
            angle_y: config.angle_y,
            distance_factor: config.distance_factor,
            config: config.clone(),
        }
    }

    pub fn distance(&self) -> f32 {
        self.config.distance_base * self.distance_factor
    }

    /// `lookAt((-1,0,0), 0, +Z) * translate(r, 0, 0) * rotateY(angle_y) * rotateZ(angle_z)`.
    ///
    /// The canonical eye is one unit behind the origin, so the camera ends up
    /// `1 + r` away from it.
    pub fn view(&self) -> Mat4 {
        compose_elementary(&[
            Elementary::LookAt {
                eye: Vec3::NEG_X,
                target: Vec3::ZERO,
                up: Vec3::Z,
            },
            Elementary::Translate(Vec3::new(self.distance(), 0.0, 0.0)),
            Elementary::RotateY(self.angle_y),
            Elementary::RotateZ(self.angle_z),
        ])
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        translation_of(&self.view().inverse())
    }

    /// Perspective projection for a framebuffer of the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.config.fov_y_degrees.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Rotate by a mouse drag of `(dx, dy)` pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.angle_z += dx * DRAG_SENSITIVITY;
        self.angle_y += -dy * DRAG_SENSITIVITY;
    }

    /// Zoom out for positive `delta`, in for negative, within the clamp range.
    pub fn zoom(&mut self, delta: f32) {
        if delta > 0.0 {
            self.distance_factor *= self.config.zoom_step;
        } else if delta < 0.0 {
            self.distance_factor /= self.config.zoom_step;
        }
        self.distance_factor = self
            .distance_factor
            .clamp(self.config.min_distance_factor, self.config.max_distance_factor);
    }

    /// Restore the preset view.
    pub fn preset(&mut self) {
        self.angle_z = self.config.preset_angle_z;
        self.angle_y = self.config.preset_angle_y;
        self.distance_factor = 1.0;
    }

    /// Noise-space offset for one pan step in `direction`.
    pub fn pan_delta(&self, direction: PanDirection) -> Vec2 {
        direction.offset(self.angle_z) * self.config.pan_speed
    }
}

/// Keyboard pan directions, relative to the camera heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl PanDirection {
    /// Unit offset in noise space for a camera rotated by `angle_z`.
    pub fn offset(self, angle_z: f32) -> Vec2 {
        let (sin, cos) = angle_z.sin_cos();
        match self {
            PanDirection::Forward => Vec2::new(-cos, sin),
            PanDirection::Back => Vec2::new(cos, -sin),
            PanDirection::Right => Vec2::new(sin, cos),
            PanDirection::Left => Vec2::new(-sin, -cos),
        }
    }
}
