//! Crate-level error types.

use std::fmt;

use crate::renderer::pipeline::RenderStage;

/// Errors produced by the marquee-render crate.
#[derive(Debug)]
pub enum RenderError {
    /// WGSL shader composition failure.
    ShaderCompose {
        /// Shader file path that failed to compose.
        shader: &'static str,
        /// Composer diagnostic text.
        message: String,
    },
    /// A pipeline stage that is declared but not implemented was requested.
    StageUnimplemented(RenderStage),
    /// SSAO options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompose { shader, message } => {
                write!(f, "failed to compose shader '{shader}': {message}")
            }
            Self::StageUnimplemented(stage) => {
                write!(f, "render stage {stage} is not implemented")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
