use std::fmt::{Debug, Display};

use super::hypergraph::Hypergraph;

impl Clone for Hypergraph {
    fn clone(&self) -> Self {
        // `AtomicU64` is not `Clone`, so rebuild the weight vector through a load/store round
        // trip instead of deriving.
        let mut clone = Self::new(
            self.initial_num_hypernodes(),
            self.hyperedges_for_clone(),
            (0..self.initial_num_hyperedges())
                .map(|e| self.hyperedge_weight(e as u32))
                .collect(),
            (0..self.initial_num_hypernodes())
                .map(|v| self.hypernode_weight(v as u32))
                .collect(),
        );
        clone.set_communities(
            (0..self.initial_num_hypernodes())
                .map(|v| self.community_id(v as u32))
                .collect(),
        );
        for e in self.hyperedges() {
            clone.set_edge_hash(e, self.edge_hash(e));
            clone.set_enabled_prefix_len(e, self.first_invalid_entry(e) - self.first_entry(e));
            if !self.is_hyperedge_enabled(e) {
                clone.disable_hyperedge(e);
            }
        }
        for v in self.hypernodes() {
            if !self.is_hypernode_enabled(v) {
                clone.disable_hypernode(v);
            }
        }
        clone.adjust_aggregate_counts(0, self.current_num_pins() as i64 - clone.current_num_pins() as i64, 0);
        clone
    }
}

impl Hypergraph {
    /// Reconstructs the nested pin-list shape `Hypergraph::new` expects, from `all_pins`
    /// (enabled and disabled pins alike), so the clone preserves a partially-coarsened slot's
    /// exact contents and ordering.
    fn hyperedges_for_clone(&self) -> Vec<Vec<u32>> {
        self.hyperedges().map(|e| self.all_pins(e).to_vec()).collect()
    }
}

impl Debug for Hypergraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hypergraph {{")?;
        for e in self.hyperedges() {
            writeln!(
                f,
                "\t e{} = {:?} (weight {}, enabled {})",
                e,
                self.all_pins(e),
                self.hyperedge_weight(e),
                self.is_hyperedge_enabled(e)
            )?;
        }
        write!(f, "}}")
    }
}

impl Display for Hypergraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hypergraph with {} hypernodes and {} hyperedges ({} pins)",
            self.current_num_hypernodes(),
            self.current_num_hyperedges(),
            self.current_num_pins()
        )
    }
}
