//! SlotPlanner and the types the Extractor produces for one community.

use std::collections::BTreeMap;

use crate::hypergraph::{HyperedgeId, HypernodeId, Hypergraph, PartitionId};

/// A hyperedge local to a `CommunitySubhypergraph`, carrying the write window its community
/// reserved inside the original hyperedge's incidence slot in H.
#[derive(Debug, Clone, Copy)]
pub struct CommunityHyperedge {
    pub original_he: HyperedgeId,
    /// Offset relative to `H.first_entry(original_he)`.
    pub incidence_array_start: usize,
    /// Offset relative to `H.first_entry(original_he)`.
    pub incidence_array_end: usize,
}

/// Standalone subhypergraph induced by one community, ready to be coarsened independently.
pub struct CommunitySubhypergraph {
    pub community: PartitionId,
    /// Dense local hypernode id -> global hypernode id in H, in local enumeration order.
    pub local_to_global_hn: Vec<HypernodeId>,
    /// One entry per hyperedge local to this subhypergraph, same order as `child.hyperedges()`.
    pub local_to_global_he: Vec<CommunityHyperedge>,
    pub num_hn_not_in_community: usize,
    pub num_pins_not_in_community: usize,
    pub child: Hypergraph,
}

/// Given the per-community pin-count map for a hyperedge, returns `community`'s reserved
/// `[start, end)` window relative to that hyperedge's `first_entry`.
///
/// Communities are ordered ascending by id; `community`'s start is the sum of pin counts of every
/// community with a smaller id. Uses pin counts rather than node weights: the window indexes
/// positions in the incidence array, and a pin contributes exactly one slot regardless of its
/// hypernode's weight.
///
/// # Panics
/// If `community` has no entry in `community_pin_counts` (a pin whose community was never
/// recorded while walking the hyperedge is a logic bug, not a user-input error).
pub(crate) fn plan_slot(
    community_pin_counts: &BTreeMap<PartitionId, usize>,
    community: PartitionId,
) -> (usize, usize) {
    let mut start = 0;
    for (&c, &count) in community_pin_counts {
        if c == community {
            return (start, start + count);
        }
        start += count;
    }
    panic!("community {community} has no recorded pins on this hyperedge");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_disjoint_and_cover_the_range() {
        let mut counts = BTreeMap::new();
        counts.insert(0u32, 2);
        counts.insert(1u32, 3);
        counts.insert(4u32, 1);

        assert_eq!(plan_slot(&counts, 0), (0, 2));
        assert_eq!(plan_slot(&counts, 1), (2, 5));
        assert_eq!(plan_slot(&counts, 4), (5, 6));
    }

    #[test]
    #[should_panic(expected = "no recorded pins")]
    fn missing_community_panics() {
        let counts = BTreeMap::new();
        plan_slot(&counts, 0);
    }
}
