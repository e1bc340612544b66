//! GPU rendering subsystem.
//!
//! The cube renderer owns its GPU resources (pipeline, buffers, texture) and is
//! split into a one-time setup ([`CubeRenderer::new`]) and a per-frame update
//! ([`CubeRenderer::render`]).
//!
//! Convention:
//! - right-handed world space, camera at the origin looking down -Z
//! - matrices are column-major `glam::Mat4`, uploaded as WGSL `mat4x4<f32>`
//! - depth range is wgpu's [0, 1], cleared to 1.0, tested with `LessEqual`

mod ctx;
mod error;

pub mod cube;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod shader;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use cube::CubeRenderer;
pub use error::{InitError, ShaderStage};
pub use scene::{SceneConfig, SceneUniforms};
