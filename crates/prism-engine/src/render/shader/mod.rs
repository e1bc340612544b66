//! Shader program construction.
//!
//! Each stage is compiled independently (WGSL → naga IR, then validated);
//! the two stages are then linked: entry points are checked, the vertex
//! outputs are matched against the fragment inputs, shared resources are
//! compared, and attribute/uniform bindings are resolved by name.
//!
//! All of this runs on the CPU before any GPU object exists, so a failing
//! program never reaches buffer or pipeline creation.

mod compile;
mod link;

pub use compile::{compile_stage, CompiledStage, FRAGMENT_SOURCE, VERTEX_SOURCE};
pub use link::{link, LinkedProgram, ProgramBindings, ResourceSlot};

use super::InitError;

/// Compiles both stages and links them.
pub fn build_program(vertex_src: &str, fragment_src: &str) -> Result<LinkedProgram, InitError> {
    let vertex = compile_stage(super::ShaderStage::Vertex, vertex_src)?;
    let fragment = compile_stage(super::ShaderStage::Fragment, fragment_src)?;
    link(vertex, fragment)
}
