//! # Render Queue System
//!
//! Collects the render objects produced during a frame so they can be
//! submitted to the GPU in a well defined order.
//!
//! ## Ordering
//!
//! Producers may push in any order (the text system visits its batches in
//! hash table order). `sort` orders objects by `RenderKey`, so cross-batch
//! draw order is carried by the key rather than by insertion order. The sort
//! is stable, so objects with equal keys keep their insertion order.

use crate::render::render_object::RenderObject;

/// Handle to a queued render object
pub type RenderObjectId = u32;

/// Collection of render objects for one frame
pub struct RenderQueue {
    /// Queued render objects in insertion order until `sort` is called
    render_objects: Vec<RenderObject>,

    /// Counter for unique IDs
    next_object_id: RenderObjectId,
}

impl RenderQueue {
    /// Create a new empty render queue
    pub fn new() -> Self {
        Self {
            render_objects: Vec::new(),
            next_object_id: 0,
        }
    }

    /// Create a render queue with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            render_objects: Vec::with_capacity(capacity),
            next_object_id: 0,
        }
    }

    /// Add a render object to the queue
    pub fn add(&mut self, render_object: RenderObject) -> RenderObjectId {
        let object_id = self.next_object_id;
        self.next_object_id += 1;
        self.render_objects.push(render_object);
        object_id
    }

    /// Sort render objects by render key
    pub fn sort(&mut self) {
        self.render_objects.sort_by_key(|ro| ro.render_key);
    }

    /// Queued render objects
    pub fn render_objects(&self) -> &[RenderObject] {
        &self.render_objects
    }

    /// Number of queued render objects
    pub fn len(&self) -> usize {
        self.render_objects.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.render_objects.is_empty()
    }

    /// Clear all render objects for next frame
    pub fn clear(&mut self) {
        self.render_objects.clear();
        self.next_object_id = 0;
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_object::RenderKey;

    fn object(depth: u32, vertex_start: u32) -> RenderObject {
        RenderObject::default()
            .with_render_key(RenderKey { depth, order: 0 })
            .with_vertex_start(vertex_start)
    }

    #[test]
    fn test_render_queue_creation() {
        let queue = RenderQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_add_returns_sequential_ids() {
        let mut queue = RenderQueue::with_capacity(4);
        assert_eq!(queue.add(object(0, 0)), 0);
        assert_eq!(queue.add(object(0, 6)), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_sort_by_depth_is_stable() {
        let mut queue = RenderQueue::new();
        queue.add(object(3, 0));
        queue.add(object(1, 6));
        queue.add(object(3, 12));
        queue.add(object(2, 18));

        queue.sort();

        let order: Vec<(u32, u32)> = queue
            .render_objects()
            .iter()
            .map(|ro| (ro.render_key.depth, ro.vertex_start))
            .collect();
        assert_eq!(order, vec![(1, 6), (2, 18), (3, 0), (3, 12)]);
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut queue = RenderQueue::new();
        queue.add(object(0, 0));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.add(object(0, 0)), 0);
    }
}
