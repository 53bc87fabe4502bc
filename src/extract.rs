//! Community-induced subhypergraph extraction.

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::{debug, trace};

use crate::bitset::BitSet;
use crate::community::{plan_slot, CommunityHyperedge, CommunitySubhypergraph};
use crate::hypergraph::{HypernodeId, Hypergraph, PartitionId};
use crate::Config;

/// Maps a global hypernode id to its local id within a subhypergraph under construction.
///
/// Dense when the community covers a large share of H's hypernodes (a `Vec<Option<u32>>` avoids
/// hashing), sparse otherwise (an `AHashMap` avoids allocating a full-width vector for a tiny
/// community). The crossover is `Config::dense_map_crossover`.
enum GlobalToLocal {
    Dense(Vec<Option<u32>>),
    Sparse(AHashMap<HypernodeId, u32>),
}

impl GlobalToLocal {
    fn new(num_hypernodes: usize, local_count: usize, crossover: f64) -> Self {
        if local_count as f64 / num_hypernodes.max(1) as f64 >= crossover {
            GlobalToLocal::Dense(vec![None; num_hypernodes])
        } else {
            GlobalToLocal::Sparse(AHashMap::with_capacity(local_count))
        }
    }

    fn insert(&mut self, global: HypernodeId, local: u32) {
        match self {
            GlobalToLocal::Dense(map) => map[global as usize] = Some(local),
            GlobalToLocal::Sparse(map) => {
                map.insert(global, local);
            }
        }
    }

    fn get(&self, global: HypernodeId) -> u32 {
        match self {
            GlobalToLocal::Dense(map) => map[global as usize]
                .unwrap_or_else(|| panic!("hypernode {global} has no local mapping")),
            GlobalToLocal::Sparse(map) => *map
                .get(&global)
                .unwrap_or_else(|| panic!("hypernode {global} has no local mapping")),
        }
    }
}

/// Builds the standalone subhypergraph induced by `community`.
///
/// See `SPEC_FULL.md` §4.1. Runs in `O(pins of hyperedges touching community)`.
pub fn extract(h: &Hypergraph, community: PartitionId, config: &Config) -> CommunitySubhypergraph {
    debug!("extract: community {community} start");

    let num_hypernodes = h.initial_num_hypernodes();
    let num_hyperedges = h.initial_num_hyperedges();
    let mut visited = BitSet::new(num_hypernodes + num_hyperedges);

    let mut local_to_global_hn: Vec<HypernodeId> = Vec::new();
    let mut num_pins_not_in_community = 0usize;

    for v in h.hypernodes() {
        if h.community_id(v) != community {
            continue;
        }
        for &e in h.incident_edges(v) {
            if visited.set_and_test(num_hypernodes + e as usize) {
                continue;
            }
            for &p in h.pins(e) {
                if !visited.set_and_test(p as usize) {
                    local_to_global_hn.push(p);
                }
                if h.community_id(p) != community {
                    num_pins_not_in_community += 1;
                }
            }
        }
    }

    if config.respect_hypernode_order {
        local_to_global_hn.sort_unstable();
    }

    if local_to_global_hn.is_empty() {
        debug!("extract: community {community} has no members, returning empty subhypergraph");
        return CommunitySubhypergraph {
            community,
            local_to_global_hn,
            local_to_global_he: Vec::new(),
            num_hn_not_in_community: 0,
            num_pins_not_in_community: 0,
            child: Hypergraph::new(0, Vec::new(), Vec::new(), Vec::new()),
        };
    }

    let mut global_to_local_hn = GlobalToLocal::new(
        num_hypernodes,
        local_to_global_hn.len(),
        config.dense_map_crossover,
    );
    for (local, &global) in local_to_global_hn.iter().enumerate() {
        global_to_local_hn.insert(global, local as u32);
    }

    let num_hn_not_in_community = local_to_global_hn
        .iter()
        .filter(|&&global| h.community_id(global) != community)
        .count();

    let mut local_hyperedges: Vec<Vec<HypernodeId>> = Vec::new();
    let mut local_hyperedge_weights: Vec<u64> = Vec::new();
    let mut local_to_global_he: Vec<CommunityHyperedge> = Vec::new();

    for e in h.hyperedges() {
        if !visited.get(num_hypernodes + e as usize) {
            continue;
        }

        let mut local_pins = Vec::with_capacity(h.pins(e).len());
        let mut community_pin_counts: BTreeMap<PartitionId, usize> = BTreeMap::new();
        for &p in h.pins(e) {
            local_pins.push(global_to_local_hn.get(p));
            *community_pin_counts.entry(h.community_id(p)).or_insert(0) += 1;
        }

        let (start, end) = plan_slot(&community_pin_counts, community);

        local_hyperedges.push(local_pins);
        local_hyperedge_weights.push(h.hyperedge_weight(e));
        local_to_global_he.push(CommunityHyperedge {
            original_he: e,
            incidence_array_start: start,
            incidence_array_end: end,
        });
    }

    let local_hypernode_weights: Vec<u64> = local_to_global_hn
        .iter()
        .map(|&global| h.hypernode_weight(global))
        .collect();

    let mut child = Hypergraph::new(
        local_to_global_hn.len(),
        local_hyperedges,
        local_hyperedge_weights,
        local_hypernode_weights,
    );
    child.set_communities(
        local_to_global_hn
            .iter()
            .map(|&global| h.community_id(global))
            .collect(),
    );

    trace!(
        "extract: community {community}: {} hypernodes, {} hyperedges",
        local_to_global_hn.len(),
        local_to_global_he.len()
    );
    debug!("extract: community {community} done");

    CommunitySubhypergraph {
        community,
        local_to_global_hn,
        local_to_global_he,
        num_hn_not_in_community,
        num_pins_not_in_community,
        child,
    }
}
