use std::fmt;

use thiserror::Error;

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
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

#[derive(Debug, Error)]
pub enum GfxError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    Link { log: String },

    #[error("uniform `{name}` not found in shader program")]
    UniformNotFound { name: String },

    #[error("unsupported stride {stride} for {width}px rows, only tightly packed 32-bit colors are supported")]
    UnsupportedStride { width: u32, stride: usize },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image is {width}x{height}, the GPU allows at most {max} pixels per side")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("texture not bound")]
    NotBound,
}

impl GfxError {
    pub(crate) fn link(log: impl Into<String>) -> Self {
        GfxError::Link { log: log.into() }
    }
}
