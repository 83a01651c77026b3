//! Camera-facing and fixed billboards placed in the actor scene.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::{Mat4, Vec3};
use islet_math::{Elementary, compose_elementary};
use serde::{Deserialize, Serialize};

const AXIS_EPSILON: f32 = 1e-6;

/// Model-to-world transform of the sun billboard.
///
/// The quad sits at a tenth of the light's distance and its local +Z is
/// turned towards the camera position.
pub fn sun_billboard(light_position_world: Vec3, camera_position: Vec3) -> Mat4 {
    let facing = camera_position.normalize_or(Vec3::Z);
    let angle = facing.dot(Vec3::Z).clamp(-1.0, 1.0).acos();
    let mut axis = facing.cross(Vec3::Z);
    if axis.length() < AXIS_EPSILON {
        axis = Vec3::X;
    }
    compose_elementary(&[
        Elementary::Translate(light_position_world * 0.1),
        Elementary::RotateAxis { axis, angle: -angle },
        Elementary::uniform_scale(2.0),
    ])
}

/// A tilted cloud quad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloudBillboard {
    pub position: [f32; 3],
    pub size: [f32; 3],
    /// Rotation about the world Z axis, applied after placement.
    pub angle: f32,
    /// Added to `sim_time` when animating this cloud.
    pub time_offset: f32,
}

impl CloudBillboard {
    pub fn model_to_world(&self) -> Mat4 {
        compose_elementary(&[
            Elementary::RotateZ(self.angle),
            Elementary::Translate(Vec3::from(self.position)),
            Elementary::RotateX(-FRAC_PI_4),
            Elementary::Scale(Vec3::from(self.size)),
        ])
    }

    pub fn cloud_time(&self, sim_time: f32) -> f32 {
        sim_time + self.time_offset
    }
}

pub fn default_clouds() -> Vec<CloudBillboard> {
    vec![
        CloudBillboard {
            position: [1.0, 5.0, 3.0],
            size: [4.0, 4.0, 4.0],
            angle: 0.0,
            time_offset: 1.0,
        },
        CloudBillboard {
            position: [0.0, 5.0, 2.8],
            size: [4.0, 4.0, 4.0],
            angle: PI * 0.9,
            time_offset: 3.0,
        },
        CloudBillboard {
            position: [0.0, 5.0, 3.0],
            size: [6.0, 4.0, 4.0],
            angle: PI * 1.4,
            time_offset: 5.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use islet_math::translation_of;

    const EPSILON: f32 = 1e-4;

    fn facing_of(m: &Mat4) -> Vec3 {
        m.transform_vector3(Vec3::Z).normalize()
    }

    #[test]
    fn test_sun_faces_camera() {
        let light = Vec3::new(-100.0, 0.0, 20.0);
        for camera in [
            Vec3::new(3.0, 1.0, 2.0),
            Vec3::new(-5.0, 0.5, 0.1),
            Vec3::new(0.0, -4.0, -4.0),
        ] {
            let m = sun_billboard(light, camera);
            let f = facing_of(&m);
            assert!((f - camera.normalize()).length() < EPSILON, "{f} vs {camera}");
        }
    }

    #[test]
    fn test_sun_position_and_scale() {
        let m = sun_billboard(Vec3::new(-100.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0));
        assert!((translation_of(&m) - Vec3::new(-10.0, 0.0, 0.0)).length() < EPSILON);
        assert!((m.transform_vector3(Vec3::X).length() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_sun_degenerate_axis_falls_back() {
        // Camera on the Z axis: the cross product vanishes.
        let above = sun_billboard(Vec3::ZERO, Vec3::new(0.0, 0.0, 7.0));
        assert!((facing_of(&above) - Vec3::Z).length() < EPSILON);

        let below = sun_billboard(Vec3::ZERO, Vec3::new(0.0, 0.0, -7.0));
        assert!(below.is_finite());
        assert!((facing_of(&below) + Vec3::Z).length() < EPSILON);
    }

    #[test]
    fn test_sun_camera_at_origin_is_finite() {
        assert!(sun_billboard(Vec3::X, Vec3::ZERO).is_finite());
    }

    #[test]
    fn test_unrotated_cloud_placement() {
        let cloud = &default_clouds()[0];
        let m = cloud.model_to_world();
        assert!((translation_of(&m) - Vec3::new(1.0, 5.0, 3.0)).length() < EPSILON);
        // Quad normal is tilted 45 degrees from +Z towards +Y.
        let n = facing_of(&m);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((n - expected).length() < EPSILON, "{n}");
    }

    #[test]
    fn test_cloud_rotation_applies_after_translation() {
        let cloud = CloudBillboard {
            position: [0.0, 5.0, 3.0],
            size: [1.0; 3],
            angle: PI,
            time_offset: 0.0,
        };
        let p = translation_of(&cloud.model_to_world());
        assert!((p - Vec3::new(0.0, -5.0, 3.0)).length() < EPSILON, "{p}");
    }

    #[test]
    fn test_cloud_time_offsets() {
        let times: Vec<f32> = default_clouds().iter().map(|c| c.cloud_time(2.0)).collect();
        assert_eq!(times, vec![3.0, 5.0, 7.0]);
    }
}
