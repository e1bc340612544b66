use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::render::{InitError, ShaderStage};

pub const VERTEX_SOURCE: &str = include_str!("cube.vert.wgsl");
pub const FRAGMENT_SOURCE: &str = include_str!("cube.frag.wgsl");

/// A parsed and validated shader module for one stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub(super) stage: ShaderStage,
    pub(super) module: naga::Module,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }
}

/// Parses and validates `source` for `stage`.
///
/// On failure the error carries the compiler diagnostic rendered against the
/// source text.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage, InitError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| InitError::ShaderCompile {
        stage,
        diagnostic: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| InitError::ShaderCompile {
            stage,
            diagnostic: e.emit_to_string(source),
        })?;

    log::debug!(
        "compiled {stage} shader: {} entry point(s), {} global(s)",
        module.entry_points.len(),
        module.global_variables.len()
    );

    Ok(CompiledStage { stage, module })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_err(stage: ShaderStage, src: &str) -> (ShaderStage, String) {
        match compile_stage(stage, src) {
            Err(InitError::ShaderCompile { stage, diagnostic }) => (stage, diagnostic),
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn bundled_sources_compile() {
        let vs = compile_stage(ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        let fs = compile_stage(ShaderStage::Fragment, FRAGMENT_SOURCE).unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(fs.stage(), ShaderStage::Fragment);
        assert_eq!(vs.module().entry_points.len(), 1);
    }

    #[test]
    fn syntax_error_reports_stage_and_diagnostic() {
        let (stage, diagnostic) = compile_err(ShaderStage::Fragment, "fn fs_main( {");
        assert_eq!(stage, ShaderStage::Fragment);
        assert!(diagnostic.contains("error"), "diagnostic: {diagnostic}");
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = VERTEX_SOURCE.replace(
            "out.transfer_tex = in.tex;",
            "out.transfer_tex = in.position;",
        );
        let (stage, diagnostic) = compile_err(ShaderStage::Vertex, &src);
        assert_eq!(stage, ShaderStage::Vertex);
        assert!(!diagnostic.is_empty());
    }

    #[test]
    fn display_includes_stage_name() {
        let err = compile_stage(ShaderStage::Vertex, "not wgsl").unwrap_err();
        assert!(err.to_string().starts_with("error compiling the vertex shader"));
    }
}
