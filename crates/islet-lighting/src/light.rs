//! The scene's single light: a point that circles the world origin.

use glam::{Mat3, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Light position as a function of simulation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightMotion {
    /// World-space position at `sim_time = 0`.
    pub start_position: [f32; 3],
    /// Radians per simulated second, about the world Y axis.
    pub angular_speed: f32,
}

impl Default for LightMotion {
    fn default() -> Self {
        Self {
            start_position: [-100.0, 0.0, 0.0],
            angular_speed: 0.3,
        }
    }
}

impl LightMotion {
    /// Homogeneous world position (`w = 1`) at `sim_time`.
    pub fn position_at(&self, sim_time: f32) -> Vec4 {
        let rotation = Mat3::from_rotation_y(sim_time * self.angular_speed);
        (rotation * Vec3::from(self.start_position)).extend(1.0)
    }
}

/// Box of the orthographic projection used for the shadow pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoBounds {
    fn default() -> Self {
        Self {
            left: -5.0,
            right: 5.0,
            bottom: -5.0,
            top: 5.0,
            near: 10.0,
            far: 1000.0,
        }
    }
}

impl OrthoBounds {
    /// OpenGL-convention orthographic projection (depth to `[-1, 1]`).
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_start_position_at_time_zero() {
        let motion = LightMotion::default();
        assert_eq!(motion.position_at(0.0), Vec4::new(-100.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_light_circles_about_y() {
        let motion = LightMotion {
            start_position: [-100.0, 0.0, 0.0],
            angular_speed: 1.0,
        };
        // A quarter turn about +Y carries -X onto +Z.
        let p = motion.position_at(FRAC_PI_2);
        assert!((p - Vec4::new(0.0, 0.0, 100.0, 1.0)).length() < EPSILON, "{p}");
        for t in [0.3, 2.0, 17.0] {
            let p = motion.position_at(t);
            assert!((p.truncate().length() - 100.0).abs() < EPSILON);
            assert_eq!(p.y, 0.0);
            assert_eq!(p.w, 1.0);
        }
    }

    #[test]
    fn test_ortho_maps_box_to_clip_cube() {
        let proj = OrthoBounds::default().projection();
        // Camera looks down -Z: near plane at z = -10 maps to depth -1.
        let near = proj.project_point3(Vec3::new(-5.0, 5.0, -10.0));
        assert!((near - Vec3::new(-1.0, 1.0, -1.0)).length() < 1e-5, "{near}");
        let far = proj.project_point3(Vec3::new(5.0, -5.0, -1000.0));
        assert!((far - Vec3::new(1.0, -1.0, 1.0)).length() < 1e-5, "{far}");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let motion: LightMotion = ron::from_str("(angular_speed: 0.0)").unwrap();
        assert_eq!(motion.start_position, [-100.0, 0.0, 0.0]);
        assert_eq!(motion.position_at(50.0), motion.position_at(0.0));
    }
}
