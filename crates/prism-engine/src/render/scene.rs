use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::math;

/// Scene parameters fixed at setup.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,

    /// Initial model translation (the camera sits at the origin).
    pub model_translation: Vec3,

    /// Rotation applied to the model matrix on every frame, in radians.
    pub spin_step: f32,
    /// Rotation axis; normalized by the rotation helper, not here.
    pub spin_axis: Vec3,

    pub clear_color: wgpu::Color,

    /// Image mapped onto every cube face.
    pub texture_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            model_translation: Vec3::new(0.0, 0.0, -6.0),
            spin_step: 0.01,
            spin_axis: Vec3::ONE,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.6,
                b: 0.1,
                a: 1.0,
            },
            texture_path: PathBuf::from("assets/box.png"),
        }
    }
}

/// CPU-side projection, model and normal matrices.
///
/// `normal` is recomputed from `model` on every change, so
/// `normal == transpose(inverse(model))` holds whenever the set is uploaded.
#[derive(Debug, Clone)]
pub struct SceneUniforms {
    projection: Mat4,
    model: Mat4,
    normal: Mat4,

    spin_step: f32,
    spin_axis: Vec3,
    steps: u64,
}

impl SceneUniforms {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let projection = math::perspective(
            config.fov_y_degrees.to_radians(),
            aspect,
            config.near,
            config.far,
        );
        let model = Mat4::from_translation(config.model_translation);

        Self {
            projection,
            model,
            normal: math::normal_matrix(model),
            spin_step: config.spin_step,
            spin_axis: config.spin_axis,
            steps: 0,
        }
    }

    /// Advances the animation by one frame: rotates the model matrix by the
    /// fixed step and refreshes the normal matrix.
    pub fn advance(&mut self) {
        self.model = math::rotate(self.model, self.spin_step, self.spin_axis);
        self.normal = math::normal_matrix(self.model);
        self.steps += 1;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn normal(&self) -> Mat4 {
        self.normal
    }

    /// Number of `advance` calls so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn to_gpu(&self) -> MatricesUniform {
        MatricesUniform {
            projection: self.projection.to_cols_array_2d(),
            model: self.model.to_cols_array_2d(),
            normal: self.normal.to_cols_array_2d(),
        }
    }
}

/// GPU layout of the shader's `Matrices { P, M, N }` block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MatricesUniform {
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_normal_invariant(s: &SceneUniforms) {
        let expected = s.model().inverse().transpose();
        let got = s.normal().to_cols_array();
        for (g, e) in got.iter().zip(expected.to_cols_array()) {
            assert_abs_diff_eq!(*g, e, epsilon = 1e-5);
        }
    }

    #[test]
    fn initial_state_matches_config() {
        let s = SceneUniforms::new(&SceneConfig::default(), 1.0);
        assert_eq!(s.model(), Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0)));
        assert_eq!(s.steps(), 0);
        assert_abs_diff_eq!(
            s.projection().col(1).y,
            1.0 / 22.5f32.to_radians().tan(),
            epsilon = 1e-5
        );
        assert_normal_invariant(&s);
    }

    #[test]
    fn aspect_scales_x_only() {
        let wide = SceneUniforms::new(&SceneConfig::default(), 2.0);
        let square = SceneUniforms::new(&SceneConfig::default(), 1.0);
        assert_abs_diff_eq!(wide.projection().col(1).y, square.projection().col(1).y);
        assert_abs_diff_eq!(
            wide.projection().col(0).x * 2.0,
            square.projection().col(0).x,
            epsilon = 1e-6
        );
    }

    #[test]
    fn normal_matrix_tracks_model_every_step() {
        let mut s = SceneUniforms::new(&SceneConfig::default(), 4.0 / 3.0);
        for _ in 0..500 {
            s.advance();
            assert_normal_invariant(&s);
        }
        assert_eq!(s.steps(), 500);
    }

    #[test]
    fn k_steps_compose_by_matrix_multiplication() {
        let config = SceneConfig::default();
        let mut s = SceneUniforms::new(&config, 1.0);
        let step = Mat4::from_axis_angle(Vec3::ONE.normalize(), 0.01);

        let mut expected = Mat4::from_translation(config.model_translation);
        for _ in 0..120 {
            s.advance();
            expected *= step;
        }
        assert!(s.model().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn projection_is_fixed_across_steps() {
        let mut s = SceneUniforms::new(&SceneConfig::default(), 1.6);
        let p = s.projection();
        for _ in 0..10 {
            s.advance();
        }
        assert_eq!(s.projection(), p);
    }

    #[test]
    fn gpu_block_is_three_column_major_mat4() {
        assert_eq!(std::mem::size_of::<MatricesUniform>(), 192);

        let s = SceneUniforms::new(&SceneConfig::default(), 1.0);
        let gpu = s.to_gpu();
        // Translation lives in the fourth column.
        assert_eq!(gpu.model[3], [0.0, 0.0, -6.0, 1.0]);
        assert_eq!(gpu.projection, s.projection().to_cols_array_2d());
    }

    #[test]
    fn zero_spin_axis_holds_model_still() {
        let config = SceneConfig {
            spin_axis: Vec3::ZERO,
            ..SceneConfig::default()
        };
        let mut s = SceneUniforms::new(&config, 1.0);
        let m = s.model();
        s.advance();
        assert_eq!(s.model(), m);
        assert_eq!(s.steps(), 1);
    }
}
