// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Event queue for the sweep: an indexed binary min-heap of vertices.
//
// Each entry keeps a copy of its sweep position, so ordering never has to
// look back into the mesh. Handles are never reused, so deleting through a
// handle whose entry already left the queue is a no-op; the sweep relies on
// this when it withdraws a vertex it has merged into another. Entries at
// exactly the same position come out in insertion order.

use crate::geom::{vert_eq, vert_leq, SweepPoint};
use crate::mesh::VertIdx;

/// Stable reference to a queued entry.
pub type Handle = u32;

pub const INVALID_HANDLE: Handle = u32::MAX;

#[derive(Copy, Clone, Debug)]
struct Entry {
    key: SweepPoint,
    vertex: VertIdx,
    /// Position in `heap`, or `None` once the entry has left the queue.
    pos: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct PriorityQ {
    heap: Vec<Handle>,
    entries: Vec<Entry>,
}

impl PriorityQ {
    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQ {
            heap: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn insert(&mut self, vertex: VertIdx, key: SweepPoint) -> Handle {
        let handle = self.entries.len() as Handle;
        self.entries.push(Entry {
            key,
            vertex,
            pos: Some(self.heap.len()),
        });
        self.heap.push(handle);
        self.sift_up(self.heap.len() - 1);
        handle
    }

    /// The vertex that would be extracted next.
    pub fn minimum(&self) -> Option<VertIdx> {
        self.heap.first().map(|&h| self.entries[h as usize].vertex)
    }

    pub fn extract_min(&mut self) -> Option<VertIdx> {
        let &top = self.heap.first()?;
        let vertex = self.entries[top as usize].vertex;
        self.remove_at(0);
        Some(vertex)
    }

    /// Removes a queued entry. Handles of entries no longer queued are ignored.
    pub fn delete(&mut self, handle: Handle) {
        if let Some(pos) = self
            .entries
            .get(handle as usize)
            .and_then(|entry| entry.pos)
        {
            self.remove_at(pos);
        }
    }

    fn remove_at(&mut self, pos: usize) {
        let handle = self.heap[pos];
        let last = self.heap.len() - 1;
        self.swap(pos, last);
        self.heap.pop();
        self.entries[handle as usize].pos = None;

        if pos < self.heap.len() {
            self.sift_down(pos);
            self.sift_up(pos);
        }
    }

    /// Handles increase with insertion, so they double as the tie-break.
    #[inline]
    fn less(&self, a: Handle, b: Handle) -> bool {
        let ea = &self.entries[a as usize];
        let eb = &self.entries[b as usize];
        if vert_eq(ea.key, eb.key) {
            a < b
        } else {
            vert_leq(ea.key, eb.key)
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.entries[self.heap[i] as usize].pos = Some(i);
        self.entries[self.heap[j] as usize].pos = Some(j);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(self.heap[pos], self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(self.heap[right], self.heap[left]) {
                right
            } else {
                left
            };
            if !self.less(self.heap[child], self.heap[pos]) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }
}
