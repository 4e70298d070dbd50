//! Pairing min-heap with nodes kept in an index-addressed arena.
//!
//! Links between nodes are arena indices instead of pointers, with freed slots
//! recycled through a free list. `prev` points to the previous sibling, or to
//! the parent for a first child; the root has no `prev`.

use super::HeapError;
use crate::datastr::graph::*;
use crate::util::in_range_option::InRangeOption;

#[derive(Debug, Clone, Copy)]
struct Node {
    key: Weight,
    id: NodeId,
    child: InRangeOption<u32>,
    sibling: InRangeOption<u32>,
    prev: InRangeOption<u32>,
}

#[derive(Debug, Clone)]
pub struct PairingMinHeap {
    nodes: Vec<Node>,
    free_slots: Vec<u32>,
    root: InRangeOption<u32>,
    positions: Vec<InRangeOption<u32>>,
    len: usize,
    // reused across delete_min calls to avoid reallocating the pairing pass buffer
    scratch: Vec<u32>,
}

impl PairingMinHeap {
    /// Creates a heap for ids in `0..max_id`.
    pub fn new(max_id: usize) -> PairingMinHeap {
        PairingMinHeap {
            nodes: Vec::new(),
            free_slots: Vec::new(),
            root: InRangeOption::new(None),
            positions: vec![InRangeOption::new(None); max_id],
            len: 0,
            scratch: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions[id as usize].value().is_some()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_slots.clear();
        self.root = InRangeOption::new(None);
        self.positions.fill(InRangeOption::new(None));
        self.len = 0;
    }

    pub fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        debug_assert!((id as usize) < self.positions.len());
        match self.positions[id as usize].value() {
            Some(slot) => {
                if key < self.nodes[slot as usize].key {
                    self.decrease_slot_key(slot, key);
                }
            }
            None => {
                let slot = self.alloc(key, id);
                self.positions[id as usize] = InRangeOption::some(slot);
                self.root = InRangeOption::some(match self.root.value() {
                    Some(root) => self.meld(root, slot),
                    None => slot,
                });
                self.len += 1;
            }
        }
    }

    pub fn peek(&self) -> Result<Weight, HeapError> {
        self.root
            .value()
            .map(|root| self.nodes[root as usize].key)
            .ok_or(HeapError::Empty)
    }

    pub fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        let root = self.root.value().ok_or(HeapError::Empty)?;
        let min_id = self.nodes[root as usize].id;
        self.positions[min_id as usize] = InRangeOption::new(None);
        self.len -= 1;

        // first pass: meld pairs of children left to right
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        let mut current = self.nodes[root as usize].child.value();
        while let Some(first) = current {
            let second = self.detach_next(first);
            match second {
                Some(second) => {
                    current = self.detach_next(second);
                    scratch.push(self.meld(first, second));
                }
                None => {
                    scratch.push(first);
                    current = None;
                }
            }
        }

        // second pass: meld the pairs right to left
        let mut new_root = None;
        while let Some(tree) = scratch.pop() {
            new_root = Some(match new_root {
                Some(root) => self.meld(tree, root),
                None => tree,
            });
        }
        self.root = InRangeOption::new(new_root);
        self.scratch = scratch;
        self.free_slots.push(root);
        Ok(min_id)
    }

    pub fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        let slot = self.positions[id as usize].value().ok_or(HeapError::UnknownId(id))?;
        let current = self.nodes[slot as usize].key;
        if new_key >= current {
            return Err(HeapError::KeyNotDecreased { current, new: new_key });
        }
        self.decrease_slot_key(slot, new_key);
        Ok(())
    }

    fn decrease_slot_key(&mut self, slot: u32, new_key: Weight) {
        self.nodes[slot as usize].key = new_key;
        // non-root nodes are cut out of their sibling chain and melded with the root
        if let Some(prev) = self.nodes[slot as usize].prev.value() {
            let sibling = self.nodes[slot as usize].sibling;
            if self.nodes[prev as usize].child.value() == Some(slot) {
                self.nodes[prev as usize].child = sibling;
            } else {
                self.nodes[prev as usize].sibling = sibling;
            }
            if let Some(sibling) = sibling.value() {
                self.nodes[sibling as usize].prev = InRangeOption::some(prev);
            }
            self.nodes[slot as usize].prev = InRangeOption::new(None);
            self.nodes[slot as usize].sibling = InRangeOption::new(None);
            if let Some(root) = self.root.value() {
                self.root = InRangeOption::some(self.meld(root, slot));
            }
        }
    }

    /// Meld two trees whose roots have neither `prev` nor `sibling` links.
    /// The larger root becomes the first child of the smaller one.
    fn meld(&mut self, a: u32, b: u32) -> u32 {
        debug_assert!(self.nodes[a as usize].prev.value().is_none());
        debug_assert!(self.nodes[b as usize].prev.value().is_none());
        let (parent, child) = if self.nodes[a as usize].key <= self.nodes[b as usize].key {
            (a, b)
        } else {
            (b, a)
        };
        let first_child = self.nodes[parent as usize].child;
        self.nodes[child as usize].sibling = first_child;
        if let Some(first_child) = first_child.value() {
            self.nodes[first_child as usize].prev = InRangeOption::some(child);
        }
        self.nodes[child as usize].prev = InRangeOption::some(parent);
        self.nodes[parent as usize].child = InRangeOption::some(child);
        parent
    }

    /// Unlink `slot` from its sibling chain and return the slot that followed it.
    fn detach_next(&mut self, slot: u32) -> Option<u32> {
        let next = self.nodes[slot as usize].sibling.value();
        self.nodes[slot as usize].sibling = InRangeOption::new(None);
        self.nodes[slot as usize].prev = InRangeOption::new(None);
        if let Some(next) = next {
            self.nodes[next as usize].prev = InRangeOption::new(None);
        }
        next
    }

    fn alloc(&mut self, key: Weight, id: NodeId) -> u32 {
        let node = Node {
            key,
            id,
            child: InRangeOption::new(None),
            sibling: InRangeOption::new(None),
            prev: InRangeOption::new(None),
        };
        match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }
}
