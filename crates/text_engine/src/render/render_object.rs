//! Render objects
//!
//! A `RenderObject` is a self-contained draw descriptor: which material and
//! texture to bind, how to blend, and which vertex range of which buffer to
//! draw. Systems fill them in and hand copies to the `RenderQueue`.

use crate::foundation::math::Vec4;
use crate::render::api::{
    BlendFactor, MaterialHandle, PrimitiveType, TextureHandle, VertexBufferHandle,
    VertexDeclarationHandle,
};

/// Maximum number of shader constants a render object can override
pub const MAX_CONSTANT_COUNT: usize = 4;

/// Sort key for render objects
///
/// Ordered by depth first, then by order within the same depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderKey {
    /// Depth layer
    pub depth: u32,
    /// Tie breaker within a depth layer
    pub order: u32,
}

/// Named shader constant override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConstant {
    /// Uniform name
    pub name: &'static str,
    /// Uniform value
    pub value: Vec4,
}

/// GPU draw descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    /// Material to bind; `None` leaves the material unbound
    pub material: Option<MaterialHandle>,
    /// Texture bound to unit 0
    pub texture: Option<TextureHandle>,
    /// Vertex buffer to draw from
    pub vertex_buffer: Option<VertexBufferHandle>,
    /// Vertex layout of `vertex_buffer`
    pub vertex_declaration: Option<VertexDeclarationHandle>,
    /// Primitive topology
    pub primitive_type: PrimitiveType,
    /// Source blend factor
    pub source_blend_factor: BlendFactor,
    /// Destination blend factor
    pub destination_blend_factor: BlendFactor,
    /// Whether the blend factors above should be applied
    pub set_blend_factors: bool,
    /// First vertex of the draw
    pub vertex_start: u32,
    /// Number of vertices in the draw
    pub vertex_count: u32,
    /// Sort key
    pub render_key: RenderKey,
    constants: [Option<RenderConstant>; MAX_CONSTANT_COUNT],
}

impl Default for RenderObject {
    fn default() -> Self {
        Self {
            material: None,
            texture: None,
            vertex_buffer: None,
            vertex_declaration: None,
            primitive_type: PrimitiveType::Triangles,
            source_blend_factor: BlendFactor::One,
            destination_blend_factor: BlendFactor::Zero,
            set_blend_factors: false,
            vertex_start: 0,
            vertex_count: 0,
            render_key: RenderKey::default(),
            constants: [None; MAX_CONSTANT_COUNT],
        }
    }
}

impl RenderObject {
    /// Render object drawing from `vertex_buffer` with the given layout and topology
    pub fn with_geometry(
        vertex_buffer: VertexBufferHandle,
        vertex_declaration: VertexDeclarationHandle,
        primitive_type: PrimitiveType,
    ) -> Self {
        Self {
            vertex_buffer: Some(vertex_buffer),
            vertex_declaration: Some(vertex_declaration),
            primitive_type,
            ..Self::default()
        }
    }

    /// Enable blending with the given factors
    #[must_use]
    pub const fn with_blend_factors(mut self, source: BlendFactor, destination: BlendFactor) -> Self {
        self.source_blend_factor = source;
        self.destination_blend_factor = destination;
        self.set_blend_factors = true;
        self
    }

    /// Set the sort key
    #[must_use]
    pub const fn with_render_key(mut self, render_key: RenderKey) -> Self {
        self.render_key = render_key;
        self
    }

    /// Set the first vertex of the draw
    #[must_use]
    pub const fn with_vertex_start(mut self, vertex_start: u32) -> Self {
        self.vertex_start = vertex_start;
        self
    }

    /// Override a shader constant, replacing any previous value with the same name
    ///
    /// Returns false when the constant table is full.
    pub fn enable_constant(&mut self, name: &'static str, value: Vec4) -> bool {
        let slot = self
            .constants
            .iter()
            .position(|c| c.is_some_and(|c| c.name == name))
            .or_else(|| self.constants.iter().position(Option::is_none));

        if let Some(slot) = slot {
            self.constants[slot] = Some(RenderConstant { name, value });
            true
        } else {
            log::warn!("Out of render object constants, '{}' ignored", name);
            false
        }
    }

    /// Remove a shader constant override
    pub fn disable_constant(&mut self, name: &'static str) {
        for slot in &mut self.constants {
            if slot.is_some_and(|c| c.name == name) {
                *slot = None;
            }
        }
    }

    /// Current value of a shader constant override
    pub fn constant(&self, name: &str) -> Option<Vec4> {
        self.constants
            .iter()
            .flatten()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// All active shader constant overrides
    pub fn constants(&self) -> impl Iterator<Item = &RenderConstant> {
        self.constants.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_constant_replaces_by_name() {
        let mut ro = RenderObject::default();
        assert!(ro.enable_constant("tint", Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert!(ro.enable_constant("tint", Vec4::new(0.0, 1.0, 0.0, 1.0)));

        assert_eq!(ro.constants().count(), 1);
        assert_eq!(ro.constant("tint"), Some(Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_constant_table_is_bounded() {
        let mut ro = RenderObject::default();
        let names = ["a", "b", "c", "d"];
        for name in names {
            assert!(ro.enable_constant(name, Vec4::zeros()));
        }
        assert!(!ro.enable_constant("e", Vec4::zeros()));
        assert!(ro.constant("e").is_none());

        ro.disable_constant("b");
        assert!(ro.enable_constant("e", Vec4::zeros()));
    }

    #[test]
    fn test_builders_keep_constant_table_empty() {
        let ro = RenderObject::with_geometry(
            VertexBufferHandle(1),
            VertexDeclarationHandle(2),
            PrimitiveType::Triangles,
        )
        .with_blend_factors(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

        assert_eq!(ro.vertex_buffer, Some(VertexBufferHandle(1)));
        assert_eq!(ro.vertex_declaration, Some(VertexDeclarationHandle(2)));
        assert_eq!(ro.source_blend_factor, BlendFactor::SrcAlpha);
        assert_eq!(ro.destination_blend_factor, BlendFactor::OneMinusSrcAlpha);
        assert!(ro.set_blend_factors);
        assert_eq!(ro.constants().count(), 0);
    }

    #[test]
    fn test_render_key_orders_by_depth_then_order() {
        let near = RenderKey { depth: 1, order: 5 };
        let far = RenderKey { depth: 2, order: 0 };
        assert!(near < far);
        assert!(RenderKey { depth: 1, order: 0 } < near);
    }
}
