//! Backend abstraction traits for the rendering system
//!
//! This module defines the trait that rendering backends must implement so the
//! text system can create, update and delete GPU resources without knowing
//! which graphics API sits underneath.

use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a texture resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a vertex buffer resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferHandle(pub u64);

/// Handle to a vertex declaration (input layout) stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexDeclarationHandle(pub u64);

/// Handle to a material resource owned outside the text system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Pixel layout of texture data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Three 8-bit channels, no alpha
    Rgb,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Bilinear, no mipmaps
    Linear,
}

/// Expected update frequency of buffer contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Rewritten every frame
    StreamDraw,
}

/// Blend factors for render object blend state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
}

/// Primitive topology of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Independent triangles, three vertices each
    Triangles,
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexType {
    /// 32-bit float
    Float,
    /// 8-bit unsigned integer
    UnsignedByte,
}

impl VertexType {
    /// Size of one component in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::Float => 4,
            Self::UnsignedByte => 1,
        }
    }
}

/// One attribute of a vertex declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    /// Attribute name as seen by the shader
    pub name: &'static str,
    /// Binding location
    pub stream: u32,
    /// Number of components
    pub size: u32,
    /// Component type
    pub element_type: VertexType,
    /// Whether integer components are normalized to [0, 1]
    pub normalize: bool,
}

impl VertexElement {
    /// Size of the whole attribute in bytes
    pub const fn byte_size(&self) -> usize {
        self.size as usize * self.element_type.size()
    }
}

/// Parameters for creating or updating a texture
#[derive(Debug, Clone, Copy)]
pub struct TextureParams<'a> {
    /// Pixel layout of `data`
    pub format: TextureFormat,
    /// Raw pixel data, may be empty
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
}

/// GPU resource backend used by the text system
///
/// Implementations own the actual graphics API objects; callers only ever
/// hold the opaque handles returned here.
pub trait GraphicsBackend {
    /// Create a texture and upload its initial contents
    fn new_texture(&mut self, params: &TextureParams<'_>) -> BackendResult<TextureHandle>;

    /// Replace the contents (and possibly the size) of an existing texture
    fn set_texture(&mut self, texture: TextureHandle, params: &TextureParams<'_>) -> BackendResult<()>;

    /// Release a texture
    fn delete_texture(&mut self, texture: TextureHandle);

    /// Create a vertex buffer of `size` bytes with undefined contents
    fn new_vertex_buffer(&mut self, size: usize, usage: BufferUsage) -> BackendResult<VertexBufferHandle>;

    /// Resize the buffer to `data.len()` bytes and upload `data`
    ///
    /// An empty slice orphans the previous storage.
    fn set_vertex_buffer_data(
        &mut self,
        buffer: VertexBufferHandle,
        data: &[u8],
        usage: BufferUsage,
    ) -> BackendResult<()>;

    /// Release a vertex buffer
    fn delete_vertex_buffer(&mut self, buffer: VertexBufferHandle);

    /// Create a vertex declaration from an attribute list
    fn new_vertex_declaration(&mut self, elements: &[VertexElement]) -> BackendResult<VertexDeclarationHandle>;

    /// Release a vertex declaration
    fn delete_vertex_declaration(&mut self, declaration: VertexDeclarationHandle);
}
