//! Per-community neighbor rows.
//!
//! Each community keeps an ordered mapping from neighbor community id to
//! the ΔQ of merging with that neighbor. The ordering matters: the merge
//! step walks two rows with a parallel cursor, which is linear only when
//! both rows iterate in the same total order. A `BTreeMap` gives that
//! order for free.
//!
//! The row also caches the entry with the maximum ΔQ, so the community's
//! contribution to the global heap is O(1) to read. The cache is
//! maintained incrementally: an insert only displaces it on a strictly
//! greater ΔQ, and a full rescan happens only when the cached entry is
//! removed. On equal ΔQ the earlier entry wins (ascending-id order during
//! rescans), which keeps the merge sequence stable across runs.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::community::CommunityId;

/// One side of a community pair: the neighbor and the current ΔQ of
/// merging with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEntry {
    /// Id of the community at the other end.
    pub neighbor: CommunityId,
    /// Modularity gain of merging with `neighbor`.
    pub delta_q: f32,
}

/// Ordered mapping {neighbor community id → ΔQ} with a cached maximum.
#[derive(Debug, Clone, Default)]
pub(crate) struct NeighborRow {
    entries: BTreeMap<CommunityId, f32>,
    best: Option<PairEntry>,
}

impl NeighborRow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, neighbor: CommunityId) -> Option<f32> {
        self.entries.get(&neighbor).copied()
    }

    /// The entry with the maximum ΔQ, or `None` for an empty row.
    pub(crate) fn best(&self) -> Option<PairEntry> {
        self.best
    }

    /// Insert a fresh entry. Callers guarantee the key is not present.
    pub(crate) fn insert(&mut self, neighbor: CommunityId, delta_q: f32) {
        let previous = self.entries.insert(neighbor, delta_q);
        debug_assert!(previous.is_none(), "duplicate neighbor row key");
        self.touch_best(neighbor, delta_q);
    }

    /// Insert unless the key is already present.
    ///
    /// Parallel edges produce repeated insert attempts during
    /// initialization; the row keeps set-of-neighbors semantics by
    /// skipping them.
    pub(crate) fn insert_if_absent(&mut self, neighbor: CommunityId, delta_q: f32) -> bool {
        if self.entries.contains_key(&neighbor) {
            return false;
        }
        self.entries.insert(neighbor, delta_q);
        self.touch_best(neighbor, delta_q);
        true
    }

    /// Remove an entry and return its ΔQ. No-op if absent.
    pub(crate) fn remove(&mut self, neighbor: CommunityId) -> Option<f32> {
        let removed = self.entries.remove(&neighbor)?;
        if self.best.is_some_and(|best| best.neighbor == neighbor) {
            self.rescan();
        }
        Some(removed)
    }

    /// Iterate entries ascending by neighbor id.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (CommunityId, f32)> + '_ {
        self.entries.iter().map(|(&neighbor, &delta_q)| (neighbor, delta_q))
    }

    fn touch_best(&mut self, neighbor: CommunityId, delta_q: f32) {
        let displaced = match self.best {
            Some(best) => OrderedFloat(delta_q) > OrderedFloat(best.delta_q),
            None => true,
        };
        if displaced {
            self.best = Some(PairEntry { neighbor, delta_q });
        }
    }

    fn rescan(&mut self) {
        let mut best: Option<PairEntry> = None;
        for (&neighbor, &delta_q) in &self.entries {
            let displaced = match best {
                Some(entry) => OrderedFloat(delta_q) > OrderedFloat(entry.delta_q),
                None => true,
            };
            if displaced {
                best = Some(PairEntry { neighbor, delta_q });
            }
        }
        self.best = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_tracks_best() {
        let mut row = NeighborRow::new();
        row.insert(3, 0.1);
        row.insert(1, 0.4);
        row.insert(2, 0.2);

        let best = row.best().unwrap();
        assert_eq!(best.neighbor, 1);
        assert_eq!(best.delta_q, 0.4);
    }

    #[test]
    fn test_remove_best_rescans() {
        let mut row = NeighborRow::new();
        row.insert(1, 0.4);
        row.insert(2, 0.2);
        row.insert(3, 0.3);

        assert_eq!(row.remove(1), Some(0.4));
        let best = row.best().unwrap();
        assert_eq!(best.neighbor, 3);
        assert_eq!(best.delta_q, 0.3);

        assert_eq!(row.remove(99), None);
    }

    #[test]
    fn test_remove_last_entry_clears_best() {
        let mut row = NeighborRow::new();
        row.insert(5, 0.1);
        row.remove(5);
        assert!(row.best().is_none());
        assert!(row.is_empty());
    }

    #[test]
    fn test_insert_if_absent_skips_duplicates() {
        let mut row = NeighborRow::new();
        assert!(row.insert_if_absent(7, 0.3));
        assert!(!row.insert_if_absent(7, 0.9));

        assert_eq!(row.len(), 1);
        assert_eq!(row.get(7), Some(0.3));
        assert_eq!(row.best().unwrap().delta_q, 0.3);
    }

    #[test]
    fn test_iteration_is_ascending_by_id() {
        let mut row = NeighborRow::new();
        row.insert(9, 0.1);
        row.insert(4, 0.2);
        row.insert(6, 0.3);

        let keys: Vec<_> = row.iter().map(|(neighbor, _)| neighbor).collect();
        assert_eq!(keys, vec![4, 6, 9]);
    }

    #[test]
    fn test_equal_delta_q_keeps_earlier_entry() {
        let mut row = NeighborRow::new();
        row.insert(2, 0.5);
        row.insert(8, 0.5);
        assert_eq!(row.best().unwrap().neighbor, 2);

        // After a rescan the smallest id among the maxima wins.
        row.insert(1, 0.5);
        row.remove(2);
        assert_eq!(row.best().unwrap().neighbor, 1);
    }
}
