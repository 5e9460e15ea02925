//! WebGPU rendering module
//!
//! One instanced textured-quad pipeline draws every entity.

pub mod pipeline;
pub mod texture;
pub mod vertex;

pub use pipeline::RenderState;
pub use texture::SpriteKind;
