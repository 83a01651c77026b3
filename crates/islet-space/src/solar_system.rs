//! The default actor set: a sun with two planets, one of which has a moon.

use crate::actor::{ActorDesc, OrbitDesc};

fn body(name: &str, size: f32, rotation_speed: f32) -> ActorDesc {
    ActorDesc {
        name: name.to_string(),
        size,
        rotation_speed,
        orbit: None,
    }
}

fn satellite(
    name: &str,
    size: f32,
    rotation_speed: f32,
    parent: &str,
    radius: f32,
    angular_speed: f32,
    phase: f32,
) -> ActorDesc {
    ActorDesc {
        orbit: Some(OrbitDesc {
            parent: parent.to_string(),
            radius,
            angular_speed,
            phase,
        }),
        ..body(name, size, rotation_speed)
    }
}

/// Sun, earth, moon and mars, in draw order.
pub fn default_solar_system() -> Vec<ActorDesc> {
    vec![
        body("sun", 2.5, 0.1),
        satellite("earth", 1.0, 1.0, "sun", 6.0, 0.2, 1.7),
        satellite("moon", 0.25, 0.6, "earth", 1.6, 0.6, 0.5),
        satellite("mars", 0.75, 1.4, "sun", 8.0, 0.1, 0.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorHierarchy;

    #[test]
    fn test_default_system_is_valid() {
        let hierarchy = ActorHierarchy::new(&default_solar_system()).unwrap();
        assert_eq!(hierarchy.len(), 4);
        assert!(hierarchy.find("moon").is_some());
    }

    #[test]
    fn test_planets_keep_their_orbit_radius() {
        let mut hierarchy = ActorHierarchy::new(&default_solar_system()).unwrap();
        for t in [0.0, 3.0, 47.5] {
            hierarchy.update(t);
            let sun = hierarchy.translation(hierarchy.find("sun").unwrap());
            let earth = hierarchy.translation(hierarchy.find("earth").unwrap());
            let moon = hierarchy.translation(hierarchy.find("moon").unwrap());
            let mars = hierarchy.translation(hierarchy.find("mars").unwrap());
            assert!(((earth - sun).length() - 6.0).abs() < 1e-3);
            assert!(((moon - earth).length() - 1.6).abs() < 1e-3);
            assert!(((mars - sun).length() - 8.0).abs() < 1e-3);
            // Every orbit lies in the XY plane.
            assert!(moon.z.abs() < 1e-4);
        }
    }
}
