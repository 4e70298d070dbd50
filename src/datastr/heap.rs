//! Decrease-key min-heaps for the label-setting searches.
//!
//! Both implementations share the same contract: elements are `(key, id)` pairs
//! ordered by key, each id may be contained at most once, and keys can only
//! shrink while an element is in the heap.

pub mod binary;
pub mod pairing;

pub use binary::BinaryMinHeap;
pub use pairing::PairingMinHeap;

use crate::datastr::graph::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    #[error("heap is empty")]
    Empty,
    #[error("id {0} is not contained in the heap")]
    UnknownId(NodeId),
    #[error("new key {new} does not decrease the current key {current}")]
    KeyNotDecreased { current: Weight, new: Weight },
}

/// The shared contract of the decrease-key heaps: `(key, id)` entries ordered
/// by key, each id contained at most once, keys only ever shrink while their
/// id is contained. The searches dispatch statically through `MinHeap`; the
/// trait makes the implementations interchangeable in generic code.
pub trait DecreaseKeyHeap {
    fn insert_or_update(&mut self, key: Weight, id: NodeId);
    fn delete_min(&mut self) -> Result<NodeId, HeapError>;
    fn peek(&self) -> Result<Weight, HeapError>;
    fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DecreaseKeyHeap for BinaryMinHeap {
    fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        BinaryMinHeap::insert_or_update(self, key, id)
    }

    fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        BinaryMinHeap::delete_min(self)
    }

    fn peek(&self) -> Result<Weight, HeapError> {
        BinaryMinHeap::peek(self)
    }

    fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        BinaryMinHeap::decrease_key(self, id, new_key)
    }

    fn clear(&mut self) {
        BinaryMinHeap::clear(self)
    }

    fn len(&self) -> usize {
        BinaryMinHeap::len(self)
    }
}

impl DecreaseKeyHeap for PairingMinHeap {
    fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        PairingMinHeap::insert_or_update(self, key, id)
    }

    fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        PairingMinHeap::delete_min(self)
    }

    fn peek(&self) -> Result<Weight, HeapError> {
        PairingMinHeap::peek(self)
    }

    fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        PairingMinHeap::decrease_key(self, id, new_key)
    }

    fn clear(&mut self) {
        PairingMinHeap::clear(self)
    }

    fn len(&self) -> usize {
        PairingMinHeap::len(self)
    }
}

/// Heap implementation selector. An enum rather than a runtime string or integer,
/// so an invalid selection cannot be constructed in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeapKind {
    #[default]
    Binary,
    Pairing,
}

/// Tagged union over both heap implementations. Lets a search pick its queue
/// at construction time while keeping all calls statically dispatched.
#[derive(Debug, Clone)]
pub enum MinHeap {
    Binary(BinaryMinHeap),
    Pairing(PairingMinHeap),
}

impl MinHeap {
    pub fn new(kind: HeapKind, max_id: usize) -> MinHeap {
        match kind {
            HeapKind::Binary => MinHeap::Binary(BinaryMinHeap::new(max_id)),
            HeapKind::Pairing => MinHeap::Pairing(PairingMinHeap::new(max_id)),
        }
    }

    /// Insert `id` with the given key, or decrease its key if it is already
    /// contained and the new key is smaller. A non-decreasing update is a no-op.
    pub fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        match self {
            MinHeap::Binary(heap) => heap.insert_or_update(key, id),
            MinHeap::Pairing(heap) => heap.insert_or_update(key, id),
        }
    }

    /// Remove and return the id with the smallest key.
    pub fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        match self {
            MinHeap::Binary(heap) => heap.delete_min(),
            MinHeap::Pairing(heap) => heap.delete_min(),
        }
    }

    /// The smallest key currently contained, without removing it.
    pub fn peek(&self) -> Result<Weight, HeapError> {
        match self {
            MinHeap::Binary(heap) => heap.peek(),
            MinHeap::Pairing(heap) => heap.peek(),
        }
    }

    /// Decrease the key of a contained id. Errors if the id is absent or the
    /// new key is not strictly smaller.
    pub fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        match self {
            MinHeap::Binary(heap) => heap.decrease_key(id, new_key),
            MinHeap::Pairing(heap) => heap.decrease_key(id, new_key),
        }
    }

    pub fn clear(&mut self) {
        match self {
            MinHeap::Binary(heap) => heap.clear(),
            MinHeap::Pairing(heap) => heap.clear(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MinHeap::Binary(heap) => heap.len(),
            MinHeap::Pairing(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DecreaseKeyHeap for MinHeap {
    fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        MinHeap::insert_or_update(self, key, id)
    }

    fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        MinHeap::delete_min(self)
    }

    fn peek(&self) -> Result<Weight, HeapError> {
        MinHeap::peek(self)
    }

    fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        MinHeap::decrease_key(self, id, new_key)
    }

    fn clear(&mut self) {
        MinHeap::clear(self)
    }

    fn len(&self) -> usize {
        MinHeap::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn test_delete_min_returns_ascending_keys() {
        for kind in [HeapKind::Binary, HeapKind::Pairing] {
            let mut heap = MinHeap::new(kind, 100);
            let mut rng = StdRng::from_seed(Default::default());
            let keys: Vec<Weight> = (0..100).map(|_| rng.gen_range(0..1000)).collect();
            for (id, &key) in keys.iter().enumerate() {
                heap.insert_or_update(key, id as NodeId);
            }

            let mut last = 0;
            for _ in 0..keys.len() {
                let id = heap.delete_min().unwrap();
                assert!(keys[id as usize] >= last);
                last = keys[id as usize];
            }
            assert!(heap.is_empty());
            assert_eq!(heap.delete_min(), Err(HeapError::Empty));
        }
    }

    #[test]
    fn test_decrease_key_moves_element_to_front() {
        for kind in [HeapKind::Binary, HeapKind::Pairing] {
            let mut heap = MinHeap::new(kind, 10);
            for id in 0..10 {
                heap.insert_or_update(10 + id, id);
            }
            heap.decrease_key(9, 0).unwrap();
            assert_eq!(heap.peek(), Ok(0));
            assert_eq!(heap.delete_min(), Ok(9));
        }
    }

    #[test]
    fn test_insert_or_update_decreases_but_never_increases() {
        for kind in [HeapKind::Binary, HeapKind::Pairing] {
            let mut heap = MinHeap::new(kind, 10);
            heap.insert_or_update(10, 0);
            heap.insert_or_update(20, 1);
            heap.insert_or_update(30, 1);
            heap.insert_or_update(5, 1);
            assert_eq!(heap.len(), 2);
            assert_eq!(heap.peek(), Ok(5));
            assert_eq!(heap.delete_min(), Ok(1));
            assert_eq!(heap.delete_min(), Ok(0));
        }
    }

    #[test]
    fn test_misuse_is_reported() {
        for kind in [HeapKind::Binary, HeapKind::Pairing] {
            let mut heap = MinHeap::new(kind, 10);
            assert_eq!(heap.delete_min(), Err(HeapError::Empty));
            assert_eq!(heap.peek(), Err(HeapError::Empty));
            assert_eq!(heap.decrease_key(2, 5), Err(HeapError::UnknownId(2)));

            heap.insert_or_update(10, 1);
            assert_eq!(heap.decrease_key(1, 15), Err(HeapError::KeyNotDecreased { current: 10, new: 15 }));
            assert_eq!(heap.decrease_key(1, 10), Err(HeapError::KeyNotDecreased { current: 10, new: 10 }));
        }
    }

    #[test]
    fn test_clear_empties_the_heap() {
        for kind in [HeapKind::Binary, HeapKind::Pairing] {
            let mut heap = MinHeap::new(kind, 10);
            for id in 0..10 {
                heap.insert_or_update(id, id);
            }
            heap.clear();
            assert!(heap.is_empty());
            heap.insert_or_update(3, 7);
            assert_eq!(heap.delete_min(), Ok(7));
        }
    }

    #[test]
    fn test_all_heaps_fulfill_the_decrease_key_contract() {
        fn exercise(heap: &mut impl DecreaseKeyHeap) {
            heap.insert_or_update(4, 0);
            heap.insert_or_update(2, 1);
            heap.insert_or_update(6, 2);
            heap.decrease_key(2, 1).unwrap();
            assert_eq!(heap.peek(), Ok(1));
            assert_eq!(heap.len(), 3);

            let mut ids = Vec::new();
            while let Ok(id) = heap.delete_min() {
                ids.push(id);
            }
            assert_eq!(ids, vec![2, 1, 0]);
            assert!(heap.is_empty());

            heap.insert_or_update(1, 0);
            heap.clear();
            assert!(heap.is_empty());
        }

        exercise(&mut BinaryMinHeap::new(5));
        exercise(&mut PairingMinHeap::new(5));
        exercise(&mut MinHeap::new(HeapKind::Pairing, 5));
    }

    #[test]
    fn test_random_operations_match_across_implementations() {
        let mut rng = StdRng::from_seed(Default::default());
        let mut binary = MinHeap::new(HeapKind::Binary, 50);
        let mut pairing = MinHeap::new(HeapKind::Pairing, 50);
        // INFINITY marks "not contained", inserted keys stay well below it
        let mut binary_keys = vec![INFINITY; 50];
        let mut pairing_keys = vec![INFINITY; 50];

        for _ in 0..1000 {
            match rng.gen_range(0..3) {
                0 => {
                    let id: NodeId = rng.gen_range(0..50);
                    let key = rng.gen_range(0..10000);
                    for keys in [&mut binary_keys, &mut pairing_keys] {
                        if key < keys[id as usize] || keys[id as usize] == INFINITY {
                            keys[id as usize] = key;
                        }
                    }
                    binary.insert_or_update(key, id);
                    pairing.insert_or_update(key, id);
                }
                1 => {
                    assert_eq!(binary.peek().ok(), pairing.peek().ok());
                }
                _ => {
                    let b = binary.delete_min();
                    let p = pairing.delete_min();
                    // both have to pop the same key, ids may differ on ties
                    assert_eq!(
                        b.ok().map(|id| binary_keys[id as usize]),
                        p.ok().map(|id| pairing_keys[id as usize])
                    );
                    if let Ok(id) = b {
                        binary_keys[id as usize] = INFINITY;
                    }
                    if let Ok(id) = p {
                        pairing_keys[id as usize] = INFINITY;
                    }
                }
            }
            assert_eq!(binary.len(), pairing.len());
        }
    }
}
