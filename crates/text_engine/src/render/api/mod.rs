//! Public rendering API
//!
//! This module contains the backend trait the text system depends on, along
//! with the opaque handles and parameter types that cross it.

pub mod render_backend;

// Re-export commonly used types
pub use render_backend::{
    BackendResult, BlendFactor, BufferUsage, GraphicsBackend, MaterialHandle, PrimitiveType,
    TextureFilter, TextureFormat, TextureHandle, TextureParams, VertexBufferHandle,
    VertexDeclarationHandle, VertexElement, VertexType,
};
