//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in world units with texture coordinates and a tint.
///
/// Flat geometry samples the blank white texture, so the tint is the color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    /// Untextured vertex
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::textured(x, y, [0.0, 0.0], color)
    }

    pub const fn textured(x: f32, y: f32, uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv,
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.306, 0.753, 0.792, 1.0]; // #4ec0ca
    pub const PIPE: [f32; 4] = [0.184, 0.749, 0.443, 1.0]; // #2fbf71
    pub const GROUND_TOP: [f32; 4] = [0.847, 0.773, 0.424, 1.0]; // #d8c56c
    pub const GROUND_BOTTOM: [f32; 4] = [0.780, 0.608, 0.231, 1.0]; // #c79b3b
    pub const GROUND_STRIPE: [f32; 4] = [0.0, 0.0, 0.0, 0.1];
    pub const BIRD: [f32; 4] = [1.0, 0.922, 0.231, 1.0]; // #ffeb3b
    pub const HUD_PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
    pub const HUD_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Images are drawn untinted
    pub const IMAGE_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 32);
        let offsets: Vec<u64> = desc.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16]);
    }
}
