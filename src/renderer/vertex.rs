//! Vertex and instance types for textured-quad rendering

use bytemuck::{Pod, Zeroable};

/// Quad corner with texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coords: [u, v],
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
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-entity transform: the unit quad is scaled by the entity size and
/// translated to the entity position.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Instance {
    pub offset: [f32; 2],
    pub scale: [f32; 2],
}

impl Instance {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            offset: [x, y],
            scale: [w, h],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Unit quad as a 4-vertex triangle strip, texture flipped vertically so
/// image top lands at quad top.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new(-1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, 1.0, 1.0, 0.0),
    Vertex::new(-1.0, -1.0, 0.0, 1.0),
    Vertex::new(1.0, -1.0, 1.0, 1.0),
];
