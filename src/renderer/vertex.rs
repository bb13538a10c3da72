//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in viewport pixels with an RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// RGB + alpha
#[inline]
pub fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Colors for widget chrome
pub mod colors {
    /// Deep purple backdrop
    pub const BACKGROUND: [f32; 4] = [0.23, 0.03, 0.39, 1.0];
    /// Click counter badge
    pub const BADGE: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const BADGE_RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    /// Heightened-mode halo
    pub const HALO: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    /// Ambient orbiting dots
    pub const ORBIT_DOT: [f32; 4] = [0.98, 0.8, 0.08, 0.8];
}
