//! Minimal GPU object layer: shaders, textures and the quad they are drawn on.

mod error;
mod quad;
mod shader;
mod texture;

pub use error::{GfxError, ShaderStage};
pub use quad::{QUAD_INDICES, QUAD_VERTICES, Quad, QuadVertex};
pub use shader::{ResourceKind, Shader, ShaderProgram, TextureBinding, UniformLocation};
pub use texture::Texture;

/// WGSL sources of the built-in quad program.
pub mod shaders {
    pub const QUAD_VERT: &str = include_str!("shaders/quad.vert.wgsl");
    pub const QUAD_FRAG: &str = include_str!("shaders/quad.frag.wgsl");
}
