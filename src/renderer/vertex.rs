//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in layout space with an RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for app chrome (bead colours live on `BeadColor`)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.96, 0.93, 0.87, 1.0];
    pub const TAB: [f32; 4] = [0.82, 0.77, 0.70, 1.0];
    pub const TAB_ACTIVE: [f32; 4] = [0.45, 0.30, 0.18, 1.0];
    pub const FRAME: [f32; 4] = [0.42, 0.26, 0.13, 1.0];
    pub const ROD: [f32; 4] = [0.75, 0.72, 0.66, 1.0];
    pub const DIE_FACE: [f32; 4] = [1.0, 1.0, 0.98, 1.0];
    pub const DIE_PIP: [f32; 4] = [0.12, 0.12, 0.14, 1.0];
    pub const HISTORY_BAR: [f32; 4] = [0.55, 0.50, 0.45, 1.0];
    pub const ROW: [f32; 4] = [0.90, 0.86, 0.80, 1.0];
    pub const BUTTON_MINUS: [f32; 4] = [0.80, 0.35, 0.30, 1.0];
    pub const BUTTON_PLUS: [f32; 4] = [0.30, 0.65, 0.40, 1.0];
}
