use std::fmt;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal renderer initialization failures.
///
/// Any of these stops initialization before the frame loop starts.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// No adapter, device or surface could be obtained for the window.
    #[error("GPU rendering context unavailable: {0:#}")]
    ContextUnavailable(anyhow::Error),

    /// A shader stage failed to parse or validate.
    #[error("error compiling the {stage} shader:\n{diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    /// The compiled stages do not form a usable program.
    #[error("unable to link the shader program: {diagnostic}")]
    ProgramLink { diagnostic: String },
}

impl InitError {
    pub(crate) fn link(diagnostic: impl Into<String>) -> Self {
        InitError::ProgramLink {
            diagnostic: diagnostic.into(),
        }
    }
}
