use std::collections::HashMap;

use crate::scene::geometry::GeometryBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

/// Owns every live geometry buffer. Meshes hold `GeometryId` handles.
///
/// Released ids are queued until the renderer drains them, so device-side
/// buffers can be freed in the same frame the geometry was replaced.
#[derive(Default)]
pub struct GeometryStore {
    buffers: HashMap<GeometryId, GeometryBuffer>,
    next_id: u64,
    pending_release: Vec<GeometryId>,
    released_total: usize,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, buffer: GeometryBuffer) -> GeometryId {
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.buffers.insert(id, buffer);
        id
    }

    pub fn get(&self, id: GeometryId) -> Option<&GeometryBuffer> {
        self.buffers.get(&id)
    }

    #[cfg(test)]
    pub fn is_live(&self, id: GeometryId) -> bool {
        self.buffers.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.buffers.len()
    }

    /// Returns false if `id` was already released.
    pub fn release(&mut self, id: GeometryId) -> bool {
        if self.buffers.remove(&id).is_none() {
            return false;
        }
        self.pending_release.push(id);
        self.released_total += 1;
        true
    }

    pub fn released_total(&self) -> usize {
        self.released_total
    }

    pub fn drain_released(&mut self) -> Vec<GeometryId> {
        std::mem::take(&mut self.pending_release)
    }
}
