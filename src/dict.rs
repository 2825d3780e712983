// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sorted doubly linked list holding the sweep's active regions.
//
// The list is circular through a head node at index 0 whose key is `None`.
// Ordering is never stored: every operation that needs it takes a comparison
// closure, because the order of two edges depends on the current sweep
// event and on mesh state the dictionary cannot see.

/// Index into the node arena.
pub type NodeIdx = u32;

/// The head node; it is both before the first and after the last entry.
pub const DICT_HEAD: NodeIdx = 0;

#[derive(Clone, Debug)]
struct DictNode<K> {
    key: Option<K>,
    next: NodeIdx,
    prev: NodeIdx,
}

#[derive(Clone, Debug)]
pub struct Dict<K> {
    nodes: Vec<DictNode<K>>,
    free: Vec<NodeIdx>,
}

impl<K: Copy> Default for Dict<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy> Dict<K> {
    pub fn new() -> Self {
        Dict {
            nodes: vec![DictNode {
                key: None,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            }],
            free: Vec::new(),
        }
    }

    /// Inserts `key` at its sorted position counting back from the end.
    pub fn insert(&mut self, key: K, leq: impl FnMut(K, K) -> bool) -> NodeIdx {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Inserts `key` somewhere before `node`: the walk goes backwards until
    /// it meets an entry `e` with `leq(e, key)` or reaches the head.
    pub fn insert_before(
        &mut self,
        mut node: NodeIdx,
        key: K,
        mut leq: impl FnMut(K, K) -> bool,
    ) -> NodeIdx {
        loop {
            node = self.nodes[node as usize].prev;
            match self.nodes[node as usize].key {
                Some(k) if !leq(k, key) => continue,
                _ => break,
            }
        }

        let next = self.nodes[node as usize].next;
        let entry = DictNode {
            key: Some(key),
            next,
            prev: node,
        };
        let new_node = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = entry;
                idx
            }
            None => {
                self.nodes.push(entry);
                (self.nodes.len() - 1) as NodeIdx
            }
        };
        self.nodes[node as usize].next = new_node;
        self.nodes[next as usize].prev = new_node;
        new_node
    }

    pub fn delete(&mut self, node: NodeIdx) {
        let DictNode { next, prev, .. } = self.nodes[node as usize];
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize].key = None;
        self.free.push(node);
    }

    /// The first node whose key satisfies `at_or_after`, scanning from the
    /// front; the head when none does.
    pub fn search(&self, mut at_or_after: impl FnMut(K) -> bool) -> NodeIdx {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node as usize].next;
            match self.nodes[node as usize].key {
                Some(k) if !at_or_after(k) => continue,
                _ => return node,
            }
        }
    }

    #[inline]
    pub fn key(&self, node: NodeIdx) -> Option<K> {
        self.nodes[node as usize].key
    }

    #[inline]
    pub fn min(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].next
    }

    #[inline]
    pub fn succ(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn pred(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }

    pub fn is_empty(&self) -> bool {
        self.min() == DICT_HEAD
    }
}
