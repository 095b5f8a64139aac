//! Indexed binary max-heap.
//!
//! A max-heap over f32 priorities that additionally maintains a key→slot
//! table, so entries can be removed or re-prioritized by key in O(log n).
//! `std::collections::BinaryHeap` lacks keyed removal, which forces a full
//! rebuild whenever a stale entry must go away; the side table closes that
//! gap.
//!
//! Ordering among equal priorities is unspecified but deterministic: the
//! same insertion sequence always produces the same arrangement.

use std::collections::HashMap;
use std::hash::Hash;

use ordered_float::OrderedFloat;

use crate::error::{Error, Result};

/// Binary max-heap with O(log n) removal and update by key.
///
/// Keys must be unique; pushing a key that is already present is an
/// internal error (the caller tracks membership).
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<K> {
    /// Heap-ordered (key, priority) pairs.
    entries: Vec<(K, f32)>,
    /// Key → index into `entries`.
    slots: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> Default for IndexedMaxHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> IndexedMaxHeap<K> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Create an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    /// Current priority of `key`, if present.
    pub fn get(&self, key: K) -> Option<f32> {
        self.slots.get(&key).map(|&slot| self.entries[slot].1)
    }

    /// Read the maximum entry without removing it.
    pub fn peek(&self) -> Option<(K, f32)> {
        self.entries.first().copied()
    }

    /// Insert a new entry. Fails if `key` is already present.
    pub fn push(&mut self, key: K, priority: f32) -> Result<()> {
        if self.slots.contains_key(&key) {
            return Err(Error::Internal(
                "duplicate key pushed onto indexed heap".to_string(),
            ));
        }
        let slot = self.entries.len();
        self.entries.push((key, priority));
        self.slots.insert(key, slot);
        self.sift_up(slot);
        Ok(())
    }

    /// Remove `key` and return its priority. No-op if absent.
    pub fn remove(&mut self, key: K) -> Option<f32> {
        let slot = self.slots.remove(&key)?;
        let (_, priority) = self.entries.swap_remove(slot);
        if slot < self.entries.len() {
            // The former last entry landed in `slot`; restore heap order.
            self.slots.insert(self.entries[slot].0, slot);
            self.sift_down(slot);
            self.sift_up(slot);
        }
        Some(priority)
    }

    /// Set the priority of `key`, inserting it if absent.
    pub fn update(&mut self, key: K, priority: f32) {
        match self.slots.get(&key) {
            Some(&slot) => {
                self.entries[slot].1 = priority;
                self.sift_down(slot);
                self.sift_up(slot);
            }
            None => {
                let slot = self.entries.len();
                self.entries.push((key, priority));
                self.slots.insert(key, slot);
                self.sift_up(slot);
            }
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if OrderedFloat(self.entries[slot].1) <= OrderedFloat(self.entries[parent].1) {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.entries.len() {
                break;
            }
            let right = left + 1;
            let mut largest = left;
            if right < self.entries.len()
                && OrderedFloat(self.entries[right].1) > OrderedFloat(self.entries[left].1)
            {
                largest = right;
            }
            if OrderedFloat(self.entries[largest].1) <= OrderedFloat(self.entries[slot].1) {
                break;
            }
            self.swap_slots(slot, largest);
            slot = largest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].0, a);
        self.slots.insert(self.entries[b].0, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_peek() {
        let mut heap = IndexedMaxHeap::new();
        heap.push(1u64, 0.25).unwrap();
        heap.push(2, 0.75).unwrap();
        heap.push(3, 0.5).unwrap();

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some((2, 0.75)));
    }

    #[test]
    fn test_duplicate_push_fails() {
        let mut heap = IndexedMaxHeap::new();
        heap.push(7u64, 0.1).unwrap();
        assert!(matches!(heap.push(7, 0.2), Err(Error::Internal(_))));
    }

    #[test]
    fn test_remove_by_key() {
        let mut heap = IndexedMaxHeap::new();
        for (key, priority) in [(1u64, 0.9), (2, 0.1), (3, 0.5), (4, 0.7)] {
            heap.push(key, priority).unwrap();
        }

        assert_eq!(heap.remove(1), Some(0.9));
        assert_eq!(heap.peek(), Some((4, 0.7)));

        // Removing an absent key is a no-op.
        assert_eq!(heap.remove(99), None);
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_remove_interior_restores_order() {
        let mut heap = IndexedMaxHeap::new();
        for (key, priority) in [(1u64, 0.9), (2, 0.8), (3, 0.2), (4, 0.7), (5, 0.6)] {
            heap.push(key, priority).unwrap();
        }

        heap.remove(2);
        let mut drained = Vec::new();
        while let Some((key, _)) = heap.peek() {
            drained.push(key);
            heap.remove(key);
        }
        assert_eq!(drained, vec![1, 4, 5, 3]);
    }

    #[test]
    fn test_update_reorders() {
        let mut heap = IndexedMaxHeap::new();
        heap.push(1u64, 0.1).unwrap();
        heap.push(2, 0.2).unwrap();

        heap.update(1, 0.8);
        assert_eq!(heap.peek(), Some((1, 0.8)));

        heap.update(1, 0.05);
        assert_eq!(heap.peek(), Some((2, 0.2)));
        assert_eq!(heap.get(1), Some(0.05));
    }

    #[test]
    fn test_update_inserts_when_absent() {
        let mut heap = IndexedMaxHeap::new();
        heap.update(5u64, 0.4);
        assert_eq!(heap.peek(), Some((5, 0.4)));
    }

    #[test]
    fn test_negative_priorities() {
        let mut heap = IndexedMaxHeap::new();
        heap.push(1u64, -0.3).unwrap();
        heap.push(2, -0.1).unwrap();
        assert_eq!(heap.peek(), Some((2, -0.1)));
    }
}
