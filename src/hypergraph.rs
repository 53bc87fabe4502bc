use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;

use crate::raw_slice::RawSliceMut;

/// Dense hypernode identifier; hypernodes are always numbered `0..num_hypernodes`.
pub type HypernodeId = u32;
/// Dense hyperedge identifier; hyperedges are always numbered `0..num_hyperedges`.
pub type HyperedgeId = u32;
/// Community / partition label carried by each hypernode.
pub type PartitionId = u32;

/// Seed `edgeHash` is reset to before a Phase-3 rescan (`kEdgeHashSeed`).
pub const EDGE_HASH_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sentinel stored in `contraction_index` for hypernodes never contracted.
pub const NOT_CONTRACTED: i64 = -1;

/// Per-pin contribution to a hyperedge's `edgeHash`, used by MergeBack Phase 3.
///
/// Grounded in the same `ahash::RandomState::with_seeds` double-hashing idiom used elsewhere in
/// this crate for content-addressing a collection of ids.
pub(crate) fn hash_pin(p: HypernodeId) -> u64 {
    const SEED1: u64 = 0x243F_6A88_85A3_08D3;
    const SEED2: u64 = 0x1319_8A2E_0370_7344;
    const SEED3: u64 = 0xA409_3822_299F_31D0;
    const SEED4: u64 = 0x082E_FA98_EC4E_6C89;
    let hasher_factory = RandomState::with_seeds(SEED1, SEED2, SEED3, SEED4);
    let mut hasher = hasher_factory.build_hasher();
    hasher.write_u32(p);
    hasher.finish()
}

/// Concrete flat-incidence-array hypergraph container.
///
/// Hypernodes and hyperedges are dense, contiguous ids. The incidence array stores every
/// hyperedge's pins back to back; each hyperedge's slot `[first_entry(e), first_entry(e+1))` is
/// fixed for the hypergraph's lifetime, with the enabled pins forming the prefix
/// `[first_entry(e), first_invalid_entry(e))` and contractions accumulating in the suffix.
///
/// This is the type playing the role of "H" throughout `section_coarsening`: the same struct
/// backs both the original hypergraph and every community's child hypergraph, since both need
/// exactly the same operations (see `SPEC_FULL.md` §6).
pub struct Hypergraph {
    initial_num_hypernodes: usize,
    initial_num_hyperedges: usize,
    initial_num_pins: usize,

    current_num_hypernodes: usize,
    current_num_hyperedges: usize,
    current_num_pins: usize,

    incidence_array: Vec<HypernodeId>,
    hyperedge_first_entry: Vec<usize>,
    hyperedge_size: Vec<usize>,
    hyperedge_weight: Vec<AtomicU64>,
    hyperedge_enabled: Vec<bool>,
    hyperedge_hash: Vec<u64>,

    hypernode_weight: Vec<u64>,
    hypernode_enabled: Vec<bool>,
    hypernode_community: Vec<PartitionId>,
    hypernode_incident_edges: Vec<Vec<HyperedgeId>>,
}

impl Hypergraph {
    /*
    ===============================================================================
    |                               CONSTRUCTION                                 |
    ===============================================================================
    */

    /// Builds a hypergraph from raw hyperedge pin lists and weights.
    ///
    /// `hyperedge_weights` and `hypernode_weights` are zero-filled if shorter than the
    /// corresponding count; every hypernode starts in community `0`.
    ///
    /// # Performance
    /// - `O(n + total pins)`.
    pub fn new(
        num_hypernodes: usize,
        hyperedges: Vec<Vec<HypernodeId>>,
        hyperedge_weights: Vec<u64>,
        hypernode_weights: Vec<u64>,
    ) -> Self {
        let num_hyperedges = hyperedges.len();

        let mut incidence_array = Vec::new();
        let mut hyperedge_first_entry = Vec::with_capacity(num_hyperedges + 1);
        let mut hyperedge_size = Vec::with_capacity(num_hyperedges);
        hyperedge_first_entry.push(0);

        for edge in &hyperedges {
            incidence_array.extend_from_slice(edge);
            hyperedge_first_entry.push(incidence_array.len());
            hyperedge_size.push(edge.len());
        }
        let initial_num_pins = incidence_array.len();

        let hyperedge_weight = (0..num_hyperedges)
            .map(|i| AtomicU64::new(hyperedge_weights.get(i).copied().unwrap_or(0)))
            .collect();

        let hypernode_weight: Vec<u64> = (0..num_hypernodes)
            .map(|i| hypernode_weights.get(i).copied().unwrap_or(0))
            .collect();

        let mut hypernode_incident_edges = vec![Vec::new(); num_hypernodes];
        for (e, edge) in hyperedges.iter().enumerate() {
            for &pin in edge {
                hypernode_incident_edges[pin as usize].push(e as HyperedgeId);
            }
        }

        Self {
            initial_num_hypernodes: num_hypernodes,
            initial_num_hyperedges: num_hyperedges,
            initial_num_pins,
            current_num_hypernodes: num_hypernodes,
            current_num_hyperedges: num_hyperedges,
            current_num_pins: initial_num_pins,
            incidence_array,
            hyperedge_first_entry,
            hyperedge_size,
            hyperedge_weight,
            hyperedge_enabled: vec![true; num_hyperedges],
            hyperedge_hash: vec![EDGE_HASH_SEED; num_hyperedges],
            hypernode_weight,
            hypernode_enabled: vec![true; num_hypernodes],
            hypernode_community: vec![0; num_hypernodes],
            hypernode_incident_edges,
        }
    }

    /// Assigns a community id to every hypernode, in hypernode order.
    ///
    /// # Panics
    /// If `communities.len() != initial_num_hypernodes()`.
    pub fn set_communities(&mut self, communities: Vec<PartitionId>) {
        assert_eq!(
            communities.len(),
            self.initial_num_hypernodes,
            "community assignment length does not match hypernode count"
        );
        self.hypernode_community = communities;
    }

    /*
    ===============================================================================
    |                                  COUNTS                                     |
    ===============================================================================
    */

    pub fn initial_num_hypernodes(&self) -> usize {
        self.initial_num_hypernodes
    }

    pub fn initial_num_hyperedges(&self) -> usize {
        self.initial_num_hyperedges
    }

    pub fn initial_num_pins(&self) -> usize {
        self.initial_num_pins
    }

    pub fn current_num_hypernodes(&self) -> usize {
        self.current_num_hypernodes
    }

    pub fn current_num_hyperedges(&self) -> usize {
        self.current_num_hyperedges
    }

    pub fn current_num_pins(&self) -> usize {
        self.current_num_pins
    }

    /// Adjusts the three aggregate counters by the given signed deltas.
    ///
    /// Used exclusively by `MergeBack`'s pre-phase; everywhere else the counters follow from
    /// `enable`/`disable` calls instead.
    pub(crate) fn adjust_aggregate_counts(
        &mut self,
        delta_hypernodes: i64,
        delta_pins: i64,
        delta_hyperedges: i64,
    ) {
        self.current_num_hypernodes = (self.current_num_hypernodes as i64 + delta_hypernodes) as usize;
        self.current_num_pins = (self.current_num_pins as i64 + delta_pins) as usize;
        self.current_num_hyperedges = (self.current_num_hyperedges as i64 + delta_hyperedges) as usize;
    }

    /*
    ===============================================================================
    |                              ENUMERATION                                    |
    ===============================================================================
    */

    /// Hypernodes in stable (ascending id) enumeration order.
    pub fn hypernodes(&self) -> impl Iterator<Item = HypernodeId> + '_ {
        0..self.initial_num_hypernodes as HypernodeId
    }

    /// Hyperedges in stable (ascending id) enumeration order.
    pub fn hyperedges(&self) -> impl Iterator<Item = HyperedgeId> + '_ {
        0..self.initial_num_hyperedges as HyperedgeId
    }

    /// Hyperedges incident to `v`, in insertion order.
    pub fn incident_edges(&self, v: HypernodeId) -> &[HyperedgeId] {
        &self.hypernode_incident_edges[v as usize]
    }

    /// Currently enabled pins of `e`, i.e. the slot's prefix.
    pub fn pins(&self, e: HyperedgeId) -> &[HypernodeId] {
        let start = self.first_entry(e);
        let end = self.first_invalid_entry(e);
        &self.incidence_array[start..end]
    }

    /// All pins ever assigned to `e`'s slot, enabled and disabled alike.
    pub fn all_pins(&self, e: HyperedgeId) -> &[HypernodeId] {
        let start = self.first_entry(e);
        let end = self.first_entry(e + 1);
        &self.incidence_array[start..end]
    }

    /*
    ===============================================================================
    |                              METADATA                                       |
    ===============================================================================
    */

    pub fn community_id(&self, v: HypernodeId) -> PartitionId {
        self.hypernode_community[v as usize]
    }

    pub fn hypernode_weight(&self, v: HypernodeId) -> u64 {
        self.hypernode_weight[v as usize]
    }

    pub fn hyperedge_weight(&self, e: HyperedgeId) -> u64 {
        self.hyperedge_weight[e as usize].load(Ordering::Relaxed)
    }

    pub fn is_hypernode_enabled(&self, v: HypernodeId) -> bool {
        self.hypernode_enabled[v as usize]
    }

    pub fn is_hyperedge_enabled(&self, e: HyperedgeId) -> bool {
        self.hyperedge_enabled[e as usize]
    }

    pub fn edge_hash(&self, e: HyperedgeId) -> u64 {
        self.hyperedge_hash[e as usize]
    }

    /// Offset of `e`'s slot into the incidence array. `first_entry(num_hyperedges)` is the
    /// total incidence length.
    pub fn first_entry(&self, e: HyperedgeId) -> usize {
        self.hyperedge_first_entry[e as usize]
    }

    /// End of `e`'s enabled prefix.
    pub fn first_invalid_entry(&self, e: HyperedgeId) -> usize {
        self.first_entry(e) + self.hyperedge_size[e as usize]
    }

    /*
    ===============================================================================
    |                       SERIAL MUTATORS (public API)                          |
    ===============================================================================
    */

    /// Disables hyperedge `e` and decrements the aggregate edge count.
    ///
    /// This is the entry point the (external, out-of-scope) coarsening algorithm uses on a
    /// community's child hypergraph; `MergeBack` writes back to the original hypergraph through
    /// `raw_parts` instead, since its aggregate counters are reconciled separately in the
    /// pre-phase (see `adjust_aggregate_counts`).
    pub fn disable_hyperedge(&mut self, e: HyperedgeId) {
        let idx = e as usize;
        if self.hyperedge_enabled[idx] {
            self.hyperedge_enabled[idx] = false;
            self.current_num_hyperedges -= 1;
        }
    }

    pub fn enable_hyperedge(&mut self, e: HyperedgeId) {
        let idx = e as usize;
        if !self.hyperedge_enabled[idx] {
            self.hyperedge_enabled[idx] = true;
            self.current_num_hyperedges += 1;
        }
    }

    /// Disables hypernode `v` (the external coarsening algorithm's way of marking `v` as
    /// contracted away) and decrements the aggregate hypernode count.
    pub fn disable_hypernode(&mut self, v: HypernodeId) {
        let idx = v as usize;
        if self.hypernode_enabled[idx] {
            self.hypernode_enabled[idx] = false;
            self.current_num_hypernodes -= 1;
        }
    }

    pub fn enable_hypernode(&mut self, v: HypernodeId) {
        let idx = v as usize;
        if !self.hypernode_enabled[idx] {
            self.hypernode_enabled[idx] = true;
            self.current_num_hypernodes += 1;
        }
    }

    pub fn set_weight(&mut self, e: HyperedgeId, weight: u64) {
        self.hyperedge_weight[e as usize].store(weight, Ordering::Relaxed);
    }

    pub fn set_edge_hash(&mut self, e: HyperedgeId, hash: u64) {
        self.hyperedge_hash[e as usize] = hash;
    }

    /// Overrides the enabled-prefix length directly, bypassing `disable_hyperedge`'s aggregate
    /// bookkeeping. Used by `Clone` to replicate a partially-coarsened hyperedge's exact slot
    /// split without double-adjusting `current_num_hyperedges`.
    pub(crate) fn set_enabled_prefix_len(&mut self, e: HyperedgeId, len: usize) {
        self.hyperedge_size[e as usize] = len;
    }

    /*
    ===============================================================================
    |             CONCURRENT ACCESS FOR EXTRACTOR / MERGEBACK (crate-private)     |
    ===============================================================================
    */

    /// Atomically raises `e`'s weight to `candidate` if it is currently lower, returning the
    /// previous value. Used by `MergeBack` Phase 1, where two different communities may touch
    /// the same hyperedge's weight concurrently even though their incidence-array windows are
    /// disjoint (see SPEC_FULL.md §4.3, "Resolved open question").
    pub(crate) fn fetch_max_weight(&self, e: HyperedgeId, candidate: u64) -> u64 {
        self.hyperedge_weight[e as usize].fetch_max(candidate, Ordering::Relaxed)
    }

    /// Bundles raw, disjoint-write access to every array `MergeBack` mutates concurrently.
    ///
    /// # Safety contract
    /// Every caller of the returned parts must only ever write to indices it can prove, from
    /// SlotPlanner's windows (Phase 1) or from a hyperedge-range partition (Phase 3), are not
    /// touched by any other concurrently running closure. See `raw_slice` module docs.
    pub(crate) fn raw_parts(&self) -> HypergraphRawParts<'_> {
        // SAFETY: see contract above; every call site upholds disjoint-index access.
        unsafe {
            HypergraphRawParts {
                incidence_array: RawSliceMut::from_shared(&self.incidence_array),
                hyperedge_size: RawSliceMut::from_shared(&self.hyperedge_size),
                hyperedge_enabled: RawSliceMut::from_shared(&self.hyperedge_enabled),
                hyperedge_hash: RawSliceMut::from_shared(&self.hyperedge_hash),
                hypernode_weight: RawSliceMut::from_shared(&self.hypernode_weight),
                hypernode_enabled: RawSliceMut::from_shared(&self.hypernode_enabled),
                hypernode_incident_edges: RawSliceMut::from_shared(&self.hypernode_incident_edges),
                marker: std::marker::PhantomData,
            }
        }
    }
}

/// Raw, disjoint-write handles into a `Hypergraph`'s backing arrays.
///
/// Returned by `Hypergraph::raw_parts`; every field must only be written at indices the caller
/// has already established are exclusive to it for the scope's duration.
pub(crate) struct HypergraphRawParts<'a> {
    pub incidence_array: RawSliceMut<HypernodeId>,
    pub hyperedge_size: RawSliceMut<usize>,
    pub hyperedge_enabled: RawSliceMut<bool>,
    pub hyperedge_hash: RawSliceMut<u64>,
    pub hypernode_weight: RawSliceMut<u64>,
    pub hypernode_enabled: RawSliceMut<bool>,
    pub hypernode_incident_edges: RawSliceMut<Vec<HyperedgeId>>,
    #[allow(dead_code)]
    marker: std::marker::PhantomData<&'a Hypergraph>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hypergraph {
        // e0 = {0,1,2,3}
        Hypergraph::new(4, vec![vec![0, 1, 2, 3]], vec![1], vec![1, 1, 1, 1])
    }

    #[test]
    fn first_entry_and_invalid_entry() {
        let h = sample();
        assert_eq!(h.first_entry(0), 0);
        assert_eq!(h.first_entry(1), 4);
        assert_eq!(h.first_invalid_entry(0), 4);
        assert_eq!(h.pins(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn disable_enable_tracks_current_count() {
        let mut h = sample();
        assert_eq!(h.current_num_hyperedges(), 1);
        h.disable_hyperedge(0);
        assert_eq!(h.current_num_hyperedges(), 0);
        assert!(!h.is_hyperedge_enabled(0));
        h.enable_hyperedge(0);
        assert_eq!(h.current_num_hyperedges(), 1);
    }

    #[test]
    fn weight_monotone_max() {
        let h = sample();
        assert_eq!(h.fetch_max_weight(0, 5), 1);
        assert_eq!(h.hyperedge_weight(0), 5);
        assert_eq!(h.fetch_max_weight(0, 3), 5);
        assert_eq!(h.hyperedge_weight(0), 5);
    }
}
