//! # Rendering System
//!
//! The text layer of the rendering pipeline and the seams it talks through.
//!
//! ## Architecture
//!
//! - **api**: `GraphicsBackend` trait and opaque GPU resource handles
//! - **backends**: Backend implementations (a recording headless backend)
//! - **render_object / render_queue**: Draw descriptors and their per-frame sink
//! - **systems::text**: Font maps, line layout, and the batched text context
//!
//! The text context never talks to a graphics API directly; textures, vertex
//! buffers and vertex declarations are created and updated through the
//! backend trait, and draw batches leave as `RenderObject`s in the queue.

use thiserror::Error;

pub mod api;
pub mod backends;
pub mod render_object;
pub mod render_queue;
pub mod systems;

pub use api::{
    BackendResult, BlendFactor, BufferUsage, GraphicsBackend, MaterialHandle, PrimitiveType,
    TextureFilter, TextureFormat, TextureHandle, TextureParams, VertexBufferHandle,
    VertexDeclarationHandle, VertexElement, VertexType,
};
pub use backends::HeadlessBackend;
pub use render_object::{RenderConstant, RenderKey, RenderObject};
pub use render_queue::RenderQueue;

/// Rendering system error types
///
/// These error types provide meaningful information for callers without
/// exposing backend-specific details.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Resource creation or management failed
    ///
    /// Occurs when GPU resources (buffers, textures, declarations) cannot be
    /// created or updated, typically due to memory constraints or invalid data.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A handle did not refer to a live backend resource
    #[error("Invalid resource handle: {0}")]
    InvalidHandle(String),
}
