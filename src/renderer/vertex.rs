//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// Playfield-space vertex with texture coordinates and a tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    /// Untextured vertex (samples the white texel)
    pub const fn solid(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new(x, y, 0.5, 0.5, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// Untinted sprite
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Night-sky clear color behind the fire
    pub const BACKGROUND: [f32; 4] = [0.06, 0.02, 0.04, 1.0];
}
