//! Community-induced subhypergraph extraction and parallel merge-back.
//!
//! A hypergraph partitioner coarsens a large hypergraph by repeatedly contracting hypernodes.
//! To exploit parallelism, the hypergraph is first decomposed into *community-induced section
//! subhypergraphs*: [`extract`] builds one standalone [`CommunitySubhypergraph`] per community,
//! each of which an external coarsening algorithm can process independently on its own worker.
//! Once every community has finished, [`merge`] re-integrates the results back into the original
//! [`Hypergraph`] through a three-phase, lock-free parallel reducer, leaving it ready for
//! uncontraction.
//!
//! The coarsening policy run inside a single community, and the partitioning/refinement layers
//! above this crate, are out of scope — this crate owns the extraction/merge-back protocol and
//! the hypergraph container it operates on.

mod bitset;
mod community;
mod contraction;
mod container_traits;
mod error;
mod extract;
mod hgr;
mod hypergraph;
mod merge;
mod pool;
mod raw_slice;

pub use community::{CommunityHyperedge, CommunitySubhypergraph};
pub use contraction::ContractionMemento;
pub use error::HgrError;
pub use extract::extract;
pub use hgr::{parse_hgr, read_communities, write_hgr, HgrFile};
pub use hypergraph::{HyperedgeId, HypernodeId, Hypergraph, PartitionId};
pub use merge::merge;
pub use pool::WorkerPool;

/// Tunable knobs for extraction and the worker pool.
#[derive(Debug, Clone)]
pub struct Config {
    /// Thread count for the worker pool backing `merge`. `0` defers to rayon's default (the
    /// number of logical CPUs).
    pub num_threads: usize,
    /// Whether `extract` stable-sorts each community's hypernodes by ascending global id.
    pub respect_hypernode_order: bool,
    /// `local_to_global_hn.len() as f64 / num_hypernodes as f64` threshold above which `extract`
    /// uses a dense `Vec<Option<u32>>` global-to-local map instead of a sparse hash map.
    pub dense_map_crossover: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: 0,
            respect_hypernode_order: true,
            dense_map_crossover: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.num_threads, 0);
        assert!(config.respect_hypernode_order);
        assert_eq!(config.dense_map_crossover, 0.1);
    }
}
