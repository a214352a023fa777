//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as a triangle list in world units, split
//! into batches by texture. Loaded art is drawn as textured quads; anything
//! without art is drawn as flat-colored geometry over a blank texture.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex;

pub use pipeline::{RenderState, RendererError};
pub use scene::{Scene, build_scene};
pub use texture::TextureSlot;
pub use vertex::Vertex;
