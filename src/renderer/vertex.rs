//! Vertex types for the 3D scene

use bytemuck::{Pod, Zeroable};

/// How the vertex shader places a vertex
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexKind {
    /// World-space geometry (terrain)
    Static = 0,
    /// Rigid part of the convoy, offset by the convoy translation
    Convoy = 1,
    /// Wheel, rolled about its hub on the X axis before the convoy offset
    Wheel = 2,
}

/// Lit vertex with position, normal and colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    /// Wheel hub in convoy space (unused for other kinds)
    pub hub: [f32; 3],
    pub kind: u32,
}

impl SceneVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4], kind: VertexKind) -> Self {
        Self {
            position,
            normal,
            color,
            hub: [0.0; 3],
            kind: kind as u32,
        }
    }

    pub fn wheel(position: [f32; 3], normal: [f32; 3], color: [f32; 4], hub: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
            hub,
            kind: VertexKind::Wheel as u32,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x4,
            3 => Float32x3,
            4 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Scene palette (`0xRRGGBB`, sRGB)
pub mod colors {
    pub const SAND: u32 = 0xd9c28c;
    pub const BACKGROUND: u32 = 0xe6d2a3;
    pub const FOG: u32 = 0xe6d2a3;
    pub const SUN: u32 = 0xfff3e0;
    pub const AMBIENT: u32 = 0xffe9c4;
    pub const HEMI_SKY: u32 = 0xffe9c4;
    pub const HEMI_GROUND: u32 = 0xd9c28c;
}

/// Light rig
pub mod lighting {
    /// Directional light position; it shines towards the origin
    pub const SUN_POSITION: [f32; 3] = [80.0, 120.0, 40.0];
    pub const SUN_INTENSITY: f32 = 2.2;
    pub const AMBIENT_INTENSITY: f32 = 0.25;
    pub const HEMI_INTENSITY: f32 = 0.3;
}
