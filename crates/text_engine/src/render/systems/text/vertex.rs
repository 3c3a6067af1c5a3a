//! Vertex types for text rendering

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec4;
use crate::render::api::{VertexElement, VertexType};

/// One corner of a glyph quad
///
/// Six of these (two triangles sharing a diagonal) make up one glyph.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    /// Transformed position
    pub position: [f32; 4],
    /// Atlas texture coordinates
    pub uv: [f32; 2],
    /// Packed RGBA face color
    pub face_color: u32,
    /// Packed RGBA outline color
    pub outline_color: u32,
    /// Packed RGBA shadow color
    pub shadow_color: u32,
}

/// Vertex declaration matching `GlyphVertex`
pub const GLYPH_VERTEX_ELEMENTS: [VertexElement; 5] = [
    VertexElement { name: "position", stream: 0, size: 4, element_type: VertexType::Float, normalize: false },
    VertexElement { name: "texcoord0", stream: 1, size: 2, element_type: VertexType::Float, normalize: false },
    VertexElement { name: "face_color", stream: 2, size: 4, element_type: VertexType::UnsignedByte, normalize: true },
    VertexElement { name: "outline_color", stream: 3, size: 4, element_type: VertexType::UnsignedByte, normalize: true },
    VertexElement { name: "shadow_color", stream: 4, size: 4, element_type: VertexType::UnsignedByte, normalize: true },
];

/// Pack a float color into `0xAABBGGRR`
///
/// Channels are scaled by 255 and truncated, not rounded or clamped: in-range
/// inputs floor, and out-of-range inputs wrap through an integer conversion.
/// Shaders are tuned against exactly this conversion.
pub fn pack_color(color: &Vec4) -> u32 {
    let channel = |c: f32| u32::from((c * 255.0) as i32 as u8);
    channel(color.w) << 24 | channel(color.z) << 16 | channel(color.y) << 8 | channel(color.x)
}
