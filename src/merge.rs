//! MergeBack: writes independently coarsened community subhypergraphs back into H.

use log::{debug, error};
use rayon::prelude::*;

use crate::bitset::BitSet;
use crate::community::CommunitySubhypergraph;
use crate::contraction::{build_contraction_index, ContractionMemento};
use crate::hypergraph::{hash_pin, HyperedgeId, Hypergraph, HypergraphRawParts, EDGE_HASH_SEED, NOT_CONTRACTED};
use crate::pool::WorkerPool;

/// Re-integrates every community's coarsening result into `h`. See `SPEC_FULL.md` §4.3 for the
/// three-phase protocol this function implements.
pub fn merge(
    h: &mut Hypergraph,
    pool: &WorkerPool,
    subhypergraphs: &[CommunitySubhypergraph],
    history: &[ContractionMemento],
) {
    debug!("merge: pre-phase start");
    pre_phase(h, subhypergraphs);
    debug!("merge: pre-phase done");

    // Every remaining phase only ever needs shared reads of `h` plus disjoint raw writes
    // through `raw_parts`; reborrowing once here keeps the parallel closures below free of a
    // captured `&mut Hypergraph` (which rayon's `Sync` bound on shared closures would reject).
    let h: &Hypergraph = h;

    debug!("merge: phase 1 start ({} communities)", subhypergraphs.len());
    pool.scope(|_| {
        let raw = h.raw_parts();
        subhypergraphs
            .par_iter()
            .for_each(|s| phase1_subhypergraph(h, &raw, s));
    });
    debug!("merge: phase 1 done");

    debug!("merge: phase 2 start ({} history entries)", history.len());
    let contraction_index = build_contraction_index(history, h.initial_num_hypernodes(), pool);
    debug!("merge: phase 2 done");

    debug!("merge: phase 3 start ({} hyperedges)", h.initial_num_hyperedges());
    let hyperedges: Vec<HyperedgeId> = h.hyperedges().collect();
    pool.scope(|_| {
        let raw = h.raw_parts();
        hyperedges
            .par_iter()
            .for_each(|&e| phase3_hyperedge(h, &raw, &contraction_index, e));
    });
    debug!("merge: phase 3 done");
}

/// Every hypernode belongs to exactly one community's "owned" set (`communityID(v) == C`), so
/// summing each community's enabled-owned-node count across all communities reconstructs H's
/// true total directly, rather than adjusting it incrementally — unlike hyperedges, which can be
/// shared by several communities and so are only ever adjusted by the shrinkage (disabled count)
/// each community contributes. `Hypergraph::adjust_aggregate_counts` only exposes a delta API,
/// so the reconstructed hypernode/pin totals are converted to a delta against H's current value
/// before being applied.
fn pre_phase(h: &mut Hypergraph, subhypergraphs: &[CommunitySubhypergraph]) {
    let mut total_hypernodes = 0i64;
    let mut total_pins = 0i64;
    let mut shrinkage_hyperedges = 0i64;

    for s in subhypergraphs {
        total_hypernodes += s.child.current_num_hypernodes() as i64 - s.num_hn_not_in_community as i64;
        total_pins += s.child.current_num_pins() as i64 - s.num_pins_not_in_community as i64;
        shrinkage_hyperedges +=
            s.child.initial_num_hyperedges() as i64 - s.child.current_num_hyperedges() as i64;
    }

    let delta_hypernodes = total_hypernodes - h.current_num_hypernodes() as i64;
    let delta_pins = total_pins - h.current_num_pins() as i64;
    let delta_hyperedges = -shrinkage_hyperedges;

    h.adjust_aggregate_counts(delta_hypernodes, delta_pins, delta_hyperedges);
}

fn phase1_subhypergraph(h: &Hypergraph, raw: &HypergraphRawParts<'_>, s: &CommunitySubhypergraph) {
    if s.local_to_global_hn.is_empty() {
        return;
    }

    let mut visited = BitSet::new(s.child.initial_num_hyperedges());

    for hn in s.child.hypernodes() {
        if s.child.community_id(hn) != s.community {
            continue;
        }
        let original_hn = s.local_to_global_hn[hn as usize];

        let mut incident_nets = Vec::with_capacity(s.child.incident_edges(hn).len());
        for &local_he in s.child.incident_edges(hn) {
            let community_he = s.local_to_global_he[local_he as usize];
            incident_nets.push(community_he.original_he);

            if visited.set_and_test(local_he as usize) {
                continue;
            }

            let original_he = community_he.original_he;
            let mut write_cursor = h.first_entry(original_he) + community_he.incidence_array_start;
            for &pin in s.child.pins(local_he) {
                if s.child.community_id(pin) == s.community {
                    let global_pin = s.local_to_global_hn[pin as usize];
                    // SAFETY: SlotPlanner reserved this community's window disjointly from every
                    // other community touching `original_he`.
                    unsafe { raw.incidence_array.write(write_cursor, global_pin) };
                    write_cursor += 1;
                }
            }

            h.fetch_max_weight(original_he, s.child.hyperedge_weight(local_he));

            if !s.child.is_hyperedge_enabled(local_he) {
                // SAFETY: at most one community ever disables a shared hyperedge; see
                // SPEC_FULL.md §4.3.
                unsafe { raw.hyperedge_enabled.write(original_he as usize, false) };
            }

            let expected_end = h.first_entry(original_he) + community_he.incidence_array_end;
            if write_cursor != expected_end {
                error!(
                    "phase 1 write cursor mismatch on hyperedge {original_he}: wrote to {write_cursor}, expected {expected_end}"
                );
            }
            assert_eq!(write_cursor, expected_end, "phase 1 write cursor mismatch");
        }

        // SAFETY: `original_hn` belongs to exactly one community, so no other worker writes
        // this index concurrently.
        unsafe {
            raw.hypernode_weight.write(original_hn as usize, s.child.hypernode_weight(hn));
            raw.hypernode_enabled
                .write(original_hn as usize, s.child.is_hypernode_enabled(hn));
            raw.hypernode_incident_edges.write(original_hn as usize, incident_nets);
        }
    }
}

fn phase3_hyperedge(
    h: &Hypergraph,
    raw: &HypergraphRawParts<'_>,
    contraction_index: &[i64],
    e: HyperedgeId,
) {
    let was_disabled = !h.is_hyperedge_enabled(e);
    if was_disabled {
        // SAFETY: only this task ever touches hyperedge `e`'s fields; hyperedges are
        // partitioned into disjoint, non-overlapping tasks.
        unsafe { raw.hyperedge_enabled.write(e as usize, true) };
    }

    let start = h.first_entry(e);
    let end = h.first_entry(e + 1);

    let mut j = start;
    let mut hash = EDGE_HASH_SEED;
    let mut valid_end = h.first_invalid_entry(e);
    while j < valid_end {
        let p = h.all_pins(e)[j - start];
        if !h.is_hypernode_enabled(p) {
            // SAFETY: swapping within `e`'s own exclusive slot.
            unsafe {
                let last = valid_end - 1;
                let tmp = *raw.incidence_array.get_mut(last);
                *raw.incidence_array.get_mut(last) = p;
                *raw.incidence_array.get_mut(j) = tmp;
                *raw.hyperedge_size.get_mut(e as usize) -= 1;
            }
            valid_end -= 1;
            continue;
        }
        hash = hash.wrapping_add(hash_pin(p));
        j += 1;
    }
    unsafe { raw.hyperedge_hash.write(e as usize, hash) };

    if end > valid_end {
        // SAFETY: same exclusive slot argument as above.
        let suffix = unsafe {
            std::slice::from_raw_parts_mut(raw.incidence_array.get_mut(valid_end) as *mut _, end - valid_end)
        };
        suffix.sort_unstable_by(|&a, &b| {
            let ia = contraction_index[a as usize];
            let ib = contraction_index[b as usize];
            debug_assert_ne!(ia, NOT_CONTRACTED, "disabled pin {a} missing from contraction history");
            debug_assert_ne!(ib, NOT_CONTRACTED, "disabled pin {b} missing from contraction history");
            ib.cmp(&ia)
        });
    }

    if was_disabled {
        // SAFETY: same as above.
        unsafe { raw.hyperedge_enabled.write(e as usize, false) };
    }
}
