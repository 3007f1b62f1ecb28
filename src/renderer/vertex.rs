//! Vertex types for flat-shaded 3D rendering

use bytemuck::{Pod, Zeroable};

/// World-space vertex with normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements (linear RGBA)
pub mod colors {
    /// 0x0a0a1a, also the fog color
    pub const BACKGROUND: [f32; 4] = [0.04, 0.04, 0.1, 1.0];
    pub const PLATFORM: [f32; 4] = [0.05, 0.11, 0.16, 1.0];
    pub const NEON_EDGE: [f32; 4] = [0.0, 1.0, 1.0, 0.8];
    pub const GRID_MAJOR: [f32; 4] = [0.0, 1.0, 1.0, 0.5];
    pub const GRID_MINOR: [f32; 4] = [0.1, 0.23, 0.35, 0.6];
    pub const HEX_TILE: [f32; 4] = [0.0, 1.0, 1.0, 0.12];

    pub const DOOR_FRAME: [f32; 4] = [0.05, 0.11, 0.16, 1.0];
    pub const DOOR_A: [f32; 4] = [1.0, 0.0, 0.5, 0.8];
    pub const DOOR_B: [f32; 4] = [0.0, 1.0, 0.5, 0.8];
    pub const DOOR_C: [f32; 4] = [0.5, 0.0, 1.0, 0.8];

    pub const SKIN: [f32; 4] = [1.0, 0.86, 0.67, 1.0];
    pub const SUIT: [f32; 4] = [0.0, 0.9, 0.9, 1.0];
    pub const EYE: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const BOOT: [f32; 4] = [0.1, 0.1, 0.23, 1.0];
    pub const AURA: [f32; 4] = [0.0, 1.0, 1.0, 0.1];

    /// Same color at a different opacity
    pub const fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
        [c[0], c[1], c[2], a]
    }
}
