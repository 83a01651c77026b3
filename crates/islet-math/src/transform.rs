//! Ordered composition of elementary affine transforms.
//!
//! All matrices use the column-vector convention: a composed transform
//! `compose(&[A, B, C])` equals `A * B * C`, so `C` is the first transform
//! applied to a point and `A` the last.

use glam::{Mat3, Mat4, Vec3};

/// A named elementary transform. Every scene transform is built as an
/// ordered product of these, never edited component-wise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Elementary {
    /// Translation by a vector.
    Translate(Vec3),
    /// Rotation about the X axis, in radians.
    RotateX(f32),
    /// Rotation about the Y axis, in radians.
    RotateY(f32),
    /// Rotation about the Z axis, in radians.
    RotateZ(f32),
    /// Rotation about an arbitrary axis, in radians. The axis is normalized
    /// on conversion; a zero axis degrades to identity.
    RotateAxis { axis: Vec3, angle: f32 },
    /// Non-uniform scale.
    Scale(Vec3),
    /// Right-handed world-to-camera transform looking from `eye` at `target`.
    LookAt { eye: Vec3, target: Vec3, up: Vec3 },
    /// An already-composed matrix, for nesting compositions.
    Matrix(Mat4),
}

impl Elementary {
    /// Uniform scale by `s` on all three axes.
    pub fn uniform_scale(s: f32) -> Self {
        Elementary::Scale(Vec3::splat(s))
    }

    /// The 4x4 matrix of this transform.
    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Elementary::Translate(t) => Mat4::from_translation(t),
            Elementary::RotateX(angle) => Mat4::from_rotation_x(angle),
            Elementary::RotateY(angle) => Mat4::from_rotation_y(angle),
            Elementary::RotateZ(angle) => Mat4::from_rotation_z(angle),
            Elementary::RotateAxis { axis, angle } => match axis.try_normalize() {
                Some(axis) => Mat4::from_axis_angle(axis, angle),
                None => Mat4::IDENTITY,
            },
            Elementary::Scale(s) => Mat4::from_scale(s),
            Elementary::LookAt { eye, target, up } => Mat4::look_at_rh(eye, target, up),
            Elementary::Matrix(m) => m,
        }
    }
}

impl From<Elementary> for Mat4 {
    fn from(e: Elementary) -> Self {
        e.to_matrix()
    }
}

/// Multiply `transforms` left to right starting from identity.
///
/// An empty slice yields identity.
pub fn compose(transforms: &[Mat4]) -> Mat4 {
    transforms.iter().fold(Mat4::IDENTITY, |acc, m| acc * *m)
}

/// [`compose`] over elementary transforms.
pub fn compose_elementary(transforms: &[Elementary]) -> Mat4 {
    transforms
        .iter()
        .fold(Mat4::IDENTITY, |acc, e| acc * e.to_matrix())
}

/// The translation part of an affine transform.
pub fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Inverse-transpose of the upper 3x3 block, used to carry normals through
/// a model-view transform.
///
/// The input must be invertible; a degenerate scale yields non-finite entries.
pub fn normal_matrix(model_view: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model_view).inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    fn sample_a() -> Mat4 {
        Elementary::Translate(Vec3::new(1.0, -2.0, 3.5)).to_matrix()
    }

    fn sample_b() -> Mat4 {
        Elementary::RotateZ(0.7).to_matrix()
    }

    fn sample_c() -> Mat4 {
        Elementary::Scale(Vec3::new(2.0, 0.5, 3.0)).to_matrix()
    }

    #[test]
    fn test_empty_compose_is_identity() {
        assert_eq!(compose(&[]), Mat4::IDENTITY);
        assert_eq!(compose_elementary(&[]), Mat4::IDENTITY);
    }

    #[test]
    fn test_single_compose_is_operand() {
        let a = sample_a();
        assert_eq!(compose(&[a]), a);
    }

    #[test]
    fn test_compose_is_associative() {
        let (a, b, c) = (sample_a(), sample_b(), sample_c());
        let flat = compose(&[a, b, c]);
        let nested = compose(&[compose(&[a, b]), c]);
        assert!(
            flat.abs_diff_eq(nested, EPSILON),
            "flat {flat} != nested {nested}"
        );
    }

    #[test]
    fn test_rightmost_transform_applies_first() {
        // Scale then translate: (1,0,0) -> (2,0,0) -> (12,0,0).
        let m = compose_elementary(&[
            Elementary::Translate(Vec3::new(10.0, 0.0, 0.0)),
            Elementary::uniform_scale(2.0),
        ]);
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < EPSILON, "got {p}");
    }

    #[test]
    fn test_compose_elementary_matches_matrices() {
        let elems = [
            Elementary::Translate(Vec3::new(1.0, 2.0, 3.0)),
            Elementary::RotateY(0.3),
            Elementary::uniform_scale(4.0),
        ];
        let mats: Vec<Mat4> = elems.iter().map(Elementary::to_matrix).collect();
        assert!(compose_elementary(&elems).abs_diff_eq(compose(&mats), EPSILON));
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let p = Elementary::RotateZ(FRAC_PI_2)
            .to_matrix()
            .transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < EPSILON, "got {p}");
    }

    #[test]
    fn test_rotate_axis_zero_axis_is_identity() {
        let m = Elementary::RotateAxis {
            axis: Vec3::ZERO,
            angle: PI,
        }
        .to_matrix();
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_rotate_axis_normalizes_input() {
        let a = Elementary::RotateAxis {
            axis: Vec3::new(0.0, 0.0, 5.0),
            angle: 0.4,
        }
        .to_matrix();
        let b = Elementary::RotateZ(0.4).to_matrix();
        assert!(a.abs_diff_eq(b, EPSILON));
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(-1.0, 0.0, 0.0);
        let view = Elementary::LookAt {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Z,
        }
        .to_matrix();
        assert!(view.transform_point3(eye).length() < EPSILON);
        // The target lies straight ahead, down -Z in camera space.
        let target = view.transform_point3(Vec3::ZERO);
        assert!((target - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_translation_of_reads_last_column() {
        let m = compose_elementary(&[
            Elementary::Translate(Vec3::new(4.0, 5.0, 6.0)),
            Elementary::RotateX(1.2),
            Elementary::uniform_scale(3.0),
        ]);
        assert_eq!(translation_of(&m), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale_keeps_direction() {
        let mv = Elementary::uniform_scale(3.0).to_matrix();
        let n = (normal_matrix(&mv) * Vec3::new(0.0, 0.6, 0.8)).normalize();
        assert!((n - Vec3::new(0.0, 0.6, 0.8)).length() < EPSILON);
    }

    #[test]
    fn test_normal_matrix_nonuniform_scale_stays_perpendicular() {
        let mv = Elementary::Scale(Vec3::new(1.0, 4.0, 1.0)).to_matrix();
        // Surface tangent and its normal before transformation.
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0);
        let t = mv.transform_vector3(tangent);
        let n = normal_matrix(&mv) * normal;
        assert!(t.dot(n).abs() < EPSILON, "dot = {}", t.dot(n));
    }
}
