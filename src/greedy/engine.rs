//! The detection engine: initialization, merging, and the main loop.
//!
//! The merge step is the Clauset-Newman-Moore row merge: the two
//! communities' neighbor rows are walked with a parallel cursor (both
//! iterate ascending by id), each emitted entry lands in the new
//! community's row, and the third community on the other end has its own
//! row and global-heap entry patched in place. The arithmetic follows
//! equations 10a-10c of the paper:
//!
//! ```text
//! 10a  K adjacent to both A and B:  ΔQ'_NK = ΔQ_AK + ΔQ_BK
//! 10b  K adjacent to A only:        ΔQ'_NK = ΔQ_AK - 2·(d_B/2m)·(d_K/2m)
//! 10c  K adjacent to B only:        ΔQ'_NK = ΔQ_BK - 2·(d_A/2m)·(d_K/2m)
//! ```
//!
//! All ΔQ arithmetic is f32; `two_m` is computed once per run.

use std::collections::BTreeMap;

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::community::{Community, CommunityId, IdSequence};
use super::row::NeighborRow;
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use crate::heap::IndexedMaxHeap;
use crate::progress::{NoProgress, ProgressObserver};

/// Merges between consecutive cancellation checks / progress reports.
const DEFAULT_REPORT_INTERVAL: usize = 100;

/// Greedy modularity maximization (Clauset-Newman-Moore) with the
/// Wakita-Tsurumi two-level heap.
///
/// The engine is single-threaded; each merge depends on the previous
/// global maximum, so the sequence is inherently sequential. Merging
/// stops at the first strictly negative gain; a ΔQ of exactly 0 is
/// still merged.
#[derive(Debug, Clone)]
pub struct GreedyModularity {
    /// How many merges pass between observer polls.
    report_interval: usize,
}

impl GreedyModularity {
    /// Create a new engine with default settings.
    pub fn new() -> Self {
        Self {
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    /// Set how many merges pass between cancellation checks and progress
    /// reports. Values below 1 are clamped to 1.
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval.max(1);
        self
    }

    /// Run the agglomeration and return the final communities, ascending
    /// by id.
    ///
    /// The observer is polled once per reporting interval; when it
    /// requests cancellation the engine returns [`Error::Cancelled`] and
    /// the partial partition is discarded. A graph with no vertices
    /// yields an empty list; a graph with no edges yields one singleton
    /// community per vertex.
    pub fn try_compute<N, E, P>(
        &self,
        graph: &UnGraph<N, E>,
        progress: &mut P,
    ) -> Result<Vec<Community>>
    where
        P: ProgressObserver,
    {
        let mut state = EngineState::build(graph)?;
        debug!(
            "seeded {} singleton communities over {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        state.run(progress, graph.node_count(), self.report_interval)?;
        Ok(state.into_communities())
    }
}

impl Default for GreedyModularity {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for GreedyModularity {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        if graph.node_count() == 0 {
            return Err(Error::EmptyInput);
        }

        let communities = self.try_compute(graph, &mut NoProgress)?;

        // Communities arrive ascending by id, so enumeration yields
        // consecutive labels.
        let mut labels = vec![0usize; graph.node_count()];
        for (label, community) in communities.iter().enumerate() {
            for &vertex in community.vertices() {
                labels[vertex.index()] = label;
            }
        }
        Ok(labels)
    }
}

/// All mutable state of one run: the community catalog, the global heap,
/// and the id source.
struct EngineState {
    /// Live communities keyed by id. A `BTreeMap` keeps the output order
    /// deterministic.
    communities: BTreeMap<CommunityId, Community>,
    /// One entry per live community with a non-empty neighbor row, valued
    /// by that community's best ΔQ.
    heap: IndexedMaxHeap<CommunityId>,
    ids: IdSequence,
    two_m: f32,
}

impl EngineState {
    /// Build singleton communities, wire neighbor rows from adjacency,
    /// compute initial ΔQs, and seed the global heap.
    fn build<N, E>(graph: &UnGraph<N, E>) -> Result<Self> {
        let n = graph.node_count();
        let two_m = 2.0 * graph.edge_count() as f32;

        // Adjacency with the degree convention pinned down: a self-loop
        // contributes one entry to its endpoint's list, parallel edges
        // contribute one entry each.
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in graph.edge_references() {
            let u = edge.source().index();
            let v = edge.target().index();
            adjacency[u].push(v);
            if u != v {
                adjacency[v].push(u);
            }
        }

        let mut ids = IdSequence::new();
        let mut node_to_id: Vec<CommunityId> = Vec::with_capacity(n);
        let mut communities = BTreeMap::new();
        for (node, adjacent) in adjacency.iter().enumerate() {
            let id = ids.next_id();
            node_to_id.push(id);
            communities.insert(
                id,
                Community::singleton(id, NodeIndex::new(node), adjacent.len()),
            );
        }

        // ΔQ_ij = 1/(2m) - k_i·k_j/(2m)² for every connected singleton
        // pair. Parallel edges collapse to a single row entry; self-loops
        // never enter a row.
        for community in communities.values_mut() {
            let node = community.vertices()[0].index();
            let k_i = adjacency[node].len() as f32;
            for &other in &adjacency[node] {
                if other == node {
                    continue;
                }
                let k_j = adjacency[other].len() as f32;
                let delta_q = 1.0 / two_m - (k_i * k_j) / (two_m * two_m);
                community
                    .neighbors_mut()
                    .insert_if_absent(node_to_id[other], delta_q);
            }
        }

        let mut heap = IndexedMaxHeap::with_capacity(n);
        for community in communities.values() {
            if let Some(best) = community.best() {
                heap.push(community.id(), best.delta_q)?;
            }
        }

        Ok(Self {
            communities,
            heap,
            ids,
            two_m,
        })
    }

    /// Main loop: pop the global maximum and merge until the heap empties
    /// or the best gain goes negative.
    fn run<P>(&mut self, progress: &mut P, total_vertices: usize, report_interval: usize) -> Result<()>
    where
        P: ProgressObserver,
    {
        let report_interval = report_interval.max(1);
        let mut merges_done = 0usize;

        while let Some((top, delta_q)) = self.heap.peek() {
            if merges_done % report_interval == 0 {
                if progress.cancellation_requested() {
                    debug!("cancellation observed after {merges_done} merges");
                    return Err(Error::Cancelled);
                }
                progress.report_progress(merges_done, total_vertices);
            }

            // Strictly negative: a zero gain is still merged.
            if delta_q < 0.0 {
                break;
            }

            let pair = self
                .communities
                .get(&top)
                .and_then(|community| community.best())
                .ok_or_else(|| {
                    Error::Internal(format!("heap entry {top} has no best neighbor"))
                })?;
            self.merge(top, pair.neighbor)?;
            merges_done += 1;
        }

        debug!(
            "stopped after {merges_done} merges, {} communities live",
            self.communities.len()
        );
        Ok(())
    }

    /// Merge communities `a_id` and `b_id` into a fresh community,
    /// re-establishing every invariant before returning.
    fn merge(&mut self, a_id: CommunityId, b_id: CommunityId) -> Result<()> {
        if a_id == b_id {
            return Err(Error::Internal(format!(
                "attempted to merge community {a_id} with itself"
            )));
        }
        let a = self.communities.remove(&a_id).ok_or_else(|| {
            Error::Internal(format!("community {a_id} missing from catalog"))
        })?;
        let b = self.communities.remove(&b_id).ok_or_else(|| {
            Error::Internal(format!("community {b_id} missing from catalog"))
        })?;
        self.heap.remove(a_id);
        self.heap.remove(b_id);

        let n_id = self.ids.next_id();
        let degree = a.degree() + b.degree();
        let a_deg = a.degree() as f32;
        let b_deg = b.degree() as f32;
        let two_m = self.two_m;

        // Linear merge of the two rows. Both iterate ascending by id, so
        // a parallel cursor visits every third community exactly once.
        // The A↔B entries themselves vanish (the edge becomes internal).
        let mut row = NeighborRow::new();
        {
            let mut ai = a.neighbors().iter().peekable();
            let mut bi = b.neighbors().iter().peekable();
            loop {
                let (third, delta_q) = match (ai.peek().copied(), bi.peek().copied()) {
                    (None, None) => break,
                    (Some((key, _)), _) if key == b_id => {
                        ai.next();
                        continue;
                    }
                    (_, Some((key, _))) if key == a_id => {
                        bi.next();
                        continue;
                    }
                    (Some((ka, qa)), Some((kb, qb))) if ka == kb => {
                        // 10a: K saw both sides.
                        ai.next();
                        bi.next();
                        (ka, qa + qb)
                    }
                    (Some((ka, qa)), Some((kb, _))) if ka < kb => {
                        // 10b: K saw only A; B's degree shifts the null model.
                        ai.next();
                        let k_deg = self.degree_of(ka)? as f32;
                        (ka, qa - 2.0 * (b_deg / two_m) * (k_deg / two_m))
                    }
                    (Some(_), Some((kb, qb))) => {
                        // 10c: K saw only B.
                        bi.next();
                        let k_deg = self.degree_of(kb)? as f32;
                        (kb, qb - 2.0 * (a_deg / two_m) * (k_deg / two_m))
                    }
                    (Some((ka, qa)), None) => {
                        ai.next();
                        let k_deg = self.degree_of(ka)? as f32;
                        (ka, qa - 2.0 * (b_deg / two_m) * (k_deg / two_m))
                    }
                    (None, Some((kb, qb))) => {
                        bi.next();
                        let k_deg = self.degree_of(kb)? as f32;
                        (kb, qb - 2.0 * (a_deg / two_m) * (k_deg / two_m))
                    }
                };

                row.insert(third, delta_q);
                self.splice_third(third, a_id, b_id, n_id, delta_q)?;
            }
        }

        let mut vertices = a.into_vertices();
        vertices.extend(b.into_vertices());

        let merged = Community::merged(n_id, vertices, degree, row);
        if let Some(best) = merged.best() {
            self.heap.push(n_id, best.delta_q)?;
        }
        self.communities.insert(n_id, merged);
        Ok(())
    }

    /// Patch a third community's row after a merge: its entries for the
    /// retired pair are replaced by one entry for the new community, and
    /// its global-heap value follows its (possibly changed) best.
    fn splice_third(
        &mut self,
        third: CommunityId,
        a_id: CommunityId,
        b_id: CommunityId,
        n_id: CommunityId,
        delta_q: f32,
    ) -> Result<()> {
        let community = self.communities.get_mut(&third).ok_or_else(|| {
            Error::Internal(format!("neighbor community {third} missing during merge"))
        })?;
        let neighbors = community.neighbors_mut();
        neighbors.remove(a_id);
        neighbors.remove(b_id);
        neighbors.insert(n_id, delta_q);

        let best = community.best().ok_or_else(|| {
            Error::Internal(format!("community {third} lost its neighbors mid-merge"))
        })?;
        self.heap.update(third, best.delta_q);
        Ok(())
    }

    fn degree_of(&self, id: CommunityId) -> Result<usize> {
        self.communities
            .get(&id)
            .map(Community::degree)
            .ok_or_else(|| Error::Internal(format!("community {id} missing from catalog")))
    }

    fn into_communities(self) -> Vec<Community> {
        self.communities.into_values().collect()
    }
}
