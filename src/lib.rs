//! # commune
//!
//! Agglomerative community detection for undirected graphs: greedy
//! modularity maximization (Clauset-Newman-Moore) with a two-level
//! max-heap over ΔQ values (Wakita-Tsurumi).
//!
//! Graphs are petgraph [`UnGraph`](petgraph::graph::UnGraph)s; parallel
//! edges and self-loops are accepted.

pub mod error;
pub mod greedy;
pub mod heap;
pub mod meta;
pub mod metrics;
pub mod progress;


pub use error::{Error, Result};
pub use greedy::{Community, CommunityDetection, CommunityId, GreedyModularity, PairEntry};
pub use heap::IndexedMaxHeap;
pub use meta::{sort_by_metadata, HasMetadata, MetaValue, Metadata};
pub use metrics::modularity;
pub use progress::{CancelFlag, NoProgress, ProgressObserver};
