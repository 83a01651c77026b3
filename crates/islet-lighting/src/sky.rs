//! Background colour driven by the light's elevation.

use glam::{Vec3, Vec4};

pub const SKY_BLUE: Vec4 = Vec4::new(135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0, 1.0);
pub const SUNSET_PINK: Vec4 = Vec4::new(246.0 / 255.0, 114.0 / 255.0, 128.0 / 255.0, 1.0);
pub const NIGHT: Vec4 = Vec4::new(7.0 / 255.0, 11.0 / 255.0, 52.0 / 255.0, 1.0);

/// Clear colour for a light at `light_position_world`.
///
/// With `a` the angle between the light and the zenith (+Z), the colour
/// blends towards sunset pink as the light nears the horizon, from sky blue
/// above it and from night blue below it. The blend weight
/// `exp(1 - 1/t²)` stays near zero until `t` approaches 1 at the horizon.
pub fn sky_color(light_position_world: Vec3) -> Vec4 {
    let d = light_position_world.normalize_or(Vec3::Z);
    let a = d.dot(Vec3::Z).clamp(-1.0, 1.0).acos();
    let (base, t) = if a < std::f32::consts::FRAC_PI_2 {
        (SKY_BLUE, 2.0 * a / std::f32::consts::PI)
    } else {
        (NIGHT, 2.0 * (std::f32::consts::PI - a) / std::f32::consts::PI)
    };
    let weight = (1.0 - 1.0 / (t * t)).exp();
    base.lerp(SUNSET_PINK, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_zenith_is_sky_blue() {
        let c = sky_color(Vec3::new(0.0, 0.0, 50.0));
        assert!((c - SKY_BLUE).length() < EPSILON, "{c}");
    }

    #[test]
    fn test_nadir_is_night() {
        let c = sky_color(Vec3::new(0.0, 0.0, -50.0));
        assert!((c - NIGHT).length() < EPSILON, "{c}");
    }

    #[test]
    fn test_horizon_is_sunset() {
        let c = sky_color(Vec3::new(-100.0, 0.0, 0.0));
        assert!((c - SUNSET_PINK).length() < EPSILON, "{c}");
    }

    #[test]
    fn test_colour_moves_towards_pink_near_horizon() {
        let high = sky_color(Vec3::new(-1.0, 0.0, 3.0));
        let low = sky_color(Vec3::new(-3.0, 0.0, 1.0));
        assert!((low - SUNSET_PINK).length() < (high - SUNSET_PINK).length());
        assert_eq!(low.w, 1.0);
    }
}
