//! Headless graphics backend
//!
//! Stores textures and vertex buffers as plain byte vectors. Every vertex
//! buffer update is appended to an upload log so callers can check exactly
//! what would have reached the GPU each frame.

use std::collections::HashMap;

use crate::render::api::{
    BackendResult, BufferUsage, GraphicsBackend, TextureFilter, TextureFormat, TextureHandle,
    TextureParams, VertexBufferHandle, VertexDeclarationHandle, VertexElement,
};
use crate::render::RenderError;

/// Number of most recent uploads kept in the upload log
pub const UPLOAD_LOG_CAPACITY: usize = 256;

/// Host-side copy of a texture
#[derive(Debug, Clone)]
pub struct TextureRecord {
    /// Pixel layout
    pub format: TextureFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
    /// Pixel data as last uploaded
    pub data: Vec<u8>,
}

/// One `set_vertex_buffer_data` call
#[derive(Debug, Clone)]
pub struct BufferUpload {
    /// Target buffer
    pub buffer: VertexBufferHandle,
    /// Number of bytes uploaded; zero for an orphaning call
    pub size: usize,
    /// Usage hint passed with the upload
    pub usage: BufferUsage,
}

#[derive(Debug)]
struct BufferRecord {
    data: Vec<u8>,
    usage: BufferUsage,
}

/// Backend that keeps all resources in host memory
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    textures: HashMap<TextureHandle, TextureRecord>,
    buffers: HashMap<VertexBufferHandle, BufferRecord>,
    declarations: HashMap<VertexDeclarationHandle, Vec<VertexElement>>,
    uploads: Vec<BufferUpload>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Look up a live texture
    pub fn texture(&self, texture: TextureHandle) -> Option<&TextureRecord> {
        self.textures.get(&texture)
    }

    /// Current contents of a live vertex buffer
    pub fn vertex_buffer_data(&self, buffer: VertexBufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.data.as_slice())
    }

    /// Usage hint of a live vertex buffer
    pub fn vertex_buffer_usage(&self, buffer: VertexBufferHandle) -> Option<BufferUsage> {
        self.buffers.get(&buffer).map(|b| b.usage)
    }

    /// Attribute list of a live vertex declaration
    pub fn vertex_declaration(&self, declaration: VertexDeclarationHandle) -> Option<&[VertexElement]> {
        self.declarations.get(&declaration).map(Vec::as_slice)
    }

    /// Vertex buffer uploads since creation or the last `clear_uploads`
    ///
    /// Only the last `UPLOAD_LOG_CAPACITY` uploads are kept.
    pub fn uploads(&self) -> &[BufferUpload] {
        &self.uploads
    }

    /// Forget recorded uploads
    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of live vertex buffers
    pub fn vertex_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live vertex declarations
    pub fn vertex_declaration_count(&self) -> usize {
        self.declarations.len()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn new_texture(&mut self, params: &TextureParams<'_>) -> BackendResult<TextureHandle> {
        let handle = TextureHandle(self.allocate_id());
        self.textures.insert(
            handle,
            TextureRecord {
                format: params.format,
                width: params.width,
                height: params.height,
                min_filter: params.min_filter,
                mag_filter: params.mag_filter,
                data: params.data.to_vec(),
            },
        );
        log::trace!("Created texture {:?} ({}x{})", handle, params.width, params.height);
        Ok(handle)
    }

    fn set_texture(&mut self, texture: TextureHandle, params: &TextureParams<'_>) -> BackendResult<()> {
        let record = self
            .textures
            .get_mut(&texture)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{texture:?}")))?;

        record.format = params.format;
        record.width = params.width;
        record.height = params.height;
        record.min_filter = params.min_filter;
        record.mag_filter = params.mag_filter;
        record.data.clear();
        record.data.extend_from_slice(params.data);
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_none() {
            log::warn!("Deleting unknown texture {:?}", texture);
        }
    }

    fn new_vertex_buffer(&mut self, size: usize, usage: BufferUsage) -> BackendResult<VertexBufferHandle> {
        let handle = VertexBufferHandle(self.allocate_id());
        self.buffers.insert(
            handle,
            BufferRecord {
                data: vec![0; size],
                usage,
            },
        );
        Ok(handle)
    }

    fn set_vertex_buffer_data(
        &mut self,
        buffer: VertexBufferHandle,
        data: &[u8],
        usage: BufferUsage,
    ) -> BackendResult<()> {
        let record = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{buffer:?}")))?;

        record.data.clear();
        record.data.extend_from_slice(data);
        record.usage = usage;
        self.uploads.push(BufferUpload {
            buffer,
            size: data.len(),
            usage,
        });
        if self.uploads.len() > UPLOAD_LOG_CAPACITY {
            let excess = self.uploads.len() - UPLOAD_LOG_CAPACITY;
            self.uploads.drain(..excess);
        }
        Ok(())
    }

    fn delete_vertex_buffer(&mut self, buffer: VertexBufferHandle) {
        if self.buffers.remove(&buffer).is_none() {
            log::warn!("Deleting unknown vertex buffer {:?}", buffer);
        }
    }

    fn new_vertex_declaration(&mut self, elements: &[VertexElement]) -> BackendResult<VertexDeclarationHandle> {
        if elements.is_empty() {
            return Err(RenderError::ResourceCreationFailed(
                "vertex declaration needs at least one element".to_string(),
            ));
        }
        let handle = VertexDeclarationHandle(self.allocate_id());
        self.declarations.insert(handle, elements.to_vec());
        Ok(handle)
    }

    fn delete_vertex_declaration(&mut self, declaration: VertexDeclarationHandle) {
        self.declarations.remove(&declaration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(data: &[u8], width: u32, height: u32) -> TextureParams<'_> {
        TextureParams {
            format: TextureFormat::Rgb,
            data,
            width,
            height,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
        }
    }

    #[test]
    fn test_texture_lifecycle() {
        let mut backend = HeadlessBackend::new();
        let texture = backend.new_texture(&params(&[1, 2, 3], 1, 1)).unwrap();
        assert_eq!(backend.texture_count(), 1);

        backend.set_texture(texture, &params(&[0; 12], 2, 2)).unwrap();
        let record = backend.texture(texture).unwrap();
        assert_eq!((record.width, record.height), (2, 2));
        assert_eq!(record.data.len(), 12);

        backend.delete_texture(texture);
        assert_eq!(backend.texture_count(), 0);
    }

    #[test]
    fn test_set_unknown_texture_fails() {
        let mut backend = HeadlessBackend::new();
        let result = backend.set_texture(TextureHandle(99), &params(&[], 0, 0));
        assert!(matches!(result, Err(RenderError::InvalidHandle(_))));
    }

    #[test]
    fn test_vertex_buffer_uploads_are_recorded() {
        let mut backend = HeadlessBackend::new();
        let buffer = backend.new_vertex_buffer(64, BufferUsage::StreamDraw).unwrap();
        assert_eq!(backend.vertex_buffer_data(buffer).unwrap().len(), 64);

        backend.set_vertex_buffer_data(buffer, &[], BufferUsage::StreamDraw).unwrap();
        backend.set_vertex_buffer_data(buffer, &[7; 16], BufferUsage::StreamDraw).unwrap();

        let sizes: Vec<usize> = backend.uploads().iter().map(|u| u.size).collect();
        assert_eq!(sizes, vec![0, 16]);
        assert_eq!(backend.vertex_buffer_data(buffer).unwrap(), &[7; 16]);
    }

    #[test]
    fn test_upload_log_keeps_most_recent() {
        let mut backend = HeadlessBackend::new();
        let buffer = backend.new_vertex_buffer(0, BufferUsage::StreamDraw).unwrap();
        let data = [0u8; 8];

        for size in 0..=UPLOAD_LOG_CAPACITY {
            backend.set_vertex_buffer_data(buffer, &data[..size % 8], BufferUsage::StreamDraw).unwrap();
        }

        assert_eq!(backend.uploads().len(), UPLOAD_LOG_CAPACITY);
        assert_eq!(backend.uploads()[0].size, 1);
        assert_eq!(backend.uploads()[UPLOAD_LOG_CAPACITY - 1].size, UPLOAD_LOG_CAPACITY % 8);

        backend.clear_uploads();
        assert!(backend.uploads().is_empty());
    }

    #[test]
    fn test_empty_vertex_declaration_rejected() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.new_vertex_declaration(&[]).is_err());
    }
}
