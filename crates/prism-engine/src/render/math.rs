//! Transform helpers for the model/normal/projection matrices.

use glam::{Mat4, Vec3};

/// Axes shorter than this are treated as degenerate by [`rotate`].
const AXIS_EPSILON: f32 = 1e-6;

/// Right-handed perspective projection with a [0, 1] depth range.
///
/// Element `[1][1]` is `cot(fov_y / 2)`.
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_radians, aspect, near, far)
}

/// Post-multiplies `m` by a rotation of `angle` radians about `axis`.
///
/// `axis` need not be unit length; it is normalized here. A zero-length axis
/// leaves `m` unchanged.
pub fn rotate(m: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    let len = axis.length();
    if len < AXIS_EPSILON {
        return m;
    }
    m * Mat4::from_axis_angle(axis / len, angle)
}

/// Inverse-transpose of `m`, used to transform normals.
pub fn normal_matrix(m: Mat4) -> Mat4 {
    m.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perspective_focal_term_is_cot_half_fov() {
        let p = perspective(45f32.to_radians(), 1.0, 0.1, 100.0);
        let expected = 1.0 / 22.5f32.to_radians().tan();
        assert_abs_diff_eq!(p.col(1).y, expected, epsilon = 1e-5);
        // Square aspect: x and y scale match.
        assert_abs_diff_eq!(p.col(0).x, expected, epsilon = 1e-5);
    }

    #[test]
    fn perspective_maps_near_and_far_to_depth_range() {
        let p = perspective(45f32.to_radians(), 1.5, 0.1, 100.0);
        let near = p.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = p.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn rotate_normalizes_axis() {
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0));
        let a = rotate(m, 0.3, Vec3::ONE);
        let b = rotate(m, 0.3, Vec3::splat(5.0));
        let c = m * Mat4::from_axis_angle(Vec3::ONE.normalize(), 0.3);
        assert!(a.abs_diff_eq(b, 1e-6));
        assert!(a.abs_diff_eq(c, 1e-6));
    }

    #[test]
    fn rotate_about_zero_axis_is_identity() {
        let m = Mat4::from_translation(Vec3::X);
        assert_eq!(rotate(m, 1.0, Vec3::ZERO), m);
    }

    #[test]
    fn rotate_keeps_translation_column() {
        // Post-multiplication rotates in object space; the translation stays put.
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0));
        let r = rotate(m, 1.2, Vec3::ONE);
        assert!(r.col(3).abs_diff_eq(m.col(3), 1e-6));
    }

    #[test]
    fn normal_matrix_of_rigid_transform_matches_rotation() {
        let rot = Mat4::from_axis_angle(Vec3::Y, 0.7);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * rot;
        let n = normal_matrix(m);
        // Upper 3x3 of N equals the rotation for rigid transforms.
        let n3 = glam::Mat3::from_mat4(n);
        assert!(n3.abs_diff_eq(glam::Mat3::from_mat4(rot), 1e-5));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_non_uniform_scale() {
        let m = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let n = normal_matrix(m);

        // Plane x + y = 0 has normal (1, 1, 0) and contains tangent (1, -1, 0).
        let tangent = m.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        let normal = n.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(tangent.dot(normal), 0.0, epsilon = 1e-5);
    }
}
