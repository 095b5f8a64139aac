//! Greedy agglomerative community detection.
//!
//! Start from one community per vertex and repeatedly merge the pair with
//! the largest modularity gain until no merge improves the partition.
//!
//! ## The Modularity Objective
//!
//! The quality of a partition is Newman's modularity Q, which compares the
//! number of edges within communities to the expected number in a random
//! graph with the same degree sequence:
//!
//! ```text
//! Q = Σ_c [ e_c/m - (d_c/(2m))² ]
//! ```
//!
//! Where:
//! - m = number of edges
//! - e_c = edges internal to community c
//! - d_c = sum of member degrees of community c
//!
//! For two singleton communities joined by an edge, the gain of merging is
//!
//! ```text
//! ΔQ_ij = 1/(2m) - (k_i × k_j)/(2m)²
//! ```
//!
//! and after a merge the gains toward a third community update
//! incrementally (equations 10a-10c of Clauset-Newman-Moore), so no ΔQ is
//! ever recomputed from scratch.
//!
//! ## The Two-Level Heap
//!
//! The expensive part of the greedy scheme is finding the globally best
//! pair. Following Wakita-Tsurumi, every community caches its own best
//! neighbor, and a global max-heap holds one entry per community valued by
//! that cached best. The global maximum is an O(1) peek, and a merge only
//! touches as many heap entries as there are third communities adjacent to
//! the merged pair, each in O(log n). A flat heap of all pairs would be
//! correct but asymptotically worse.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use commune::greedy::{CommunityDetection, GreedyModularity};
//!
//! // Build a graph
//! let mut graph = UnGraph::<(), ()>::new_undirected();
//! let a = graph.add_node(());
//! let b = graph.add_node(());
//! let c = graph.add_node(());
//! graph.add_edge(a, b, ());
//! graph.add_edge(b, c, ());
//!
//! // Detect communities
//! let engine = GreedyModularity::new();
//! let communities = engine.detect(&graph).unwrap();
//! // communities[i] = community ID for node i
//! ```
//!
//! ## References
//!
//! - Clauset, Newman, Moore (2004). "Finding community structure in very
//!   large networks." Physical Review E 70, 066111.
//! - Wakita, Tsurumi (2007). "Finding community structure in mega-scale
//!   social networks."
//! - Newman (2004). "Fast algorithm for detecting community structure in
//!   networks."

mod community;
mod engine;
mod row;
mod traits;

pub use community::{Community, CommunityId};
pub use engine::GreedyModularity;
pub use row::PairEntry;
pub use traits::CommunityDetection;
