//! Contraction history and the index derived from it.

use log::debug;

use crate::hypergraph::{HypernodeId, NOT_CONTRACTED};
use crate::pool::WorkerPool;

/// One step of the global contraction history: the hypernode that was contracted away.
#[derive(Debug, Clone, Copy)]
pub struct ContractionMemento {
    pub contracted_hypernode: HypernodeId,
}

/// Fills `contraction_index[v]` with `v`'s position in `history`, or `NOT_CONTRACTED` if `v`
/// never appears.
///
/// Below `sequential_threshold` history entries per worker, runs on the calling thread instead
/// of dispatching to the pool: a load-balancing choice, not a correctness requirement (see
/// `SPEC_FULL.md` §4.4).
pub(crate) fn build_contraction_index(
    history: &[ContractionMemento],
    num_hypernodes: usize,
    pool: &WorkerPool,
) -> Vec<i64> {
    let mut contraction_index = vec![NOT_CONTRACTED; num_hypernodes];

    let num_workers = pool.num_threads().max(1);
    let chunk_len = history.len().div_ceil(num_workers).max(1);

    if history.len() < num_workers {
        debug!("contraction index: history too small to parallelize, filling sequentially");
        fill_slice(&mut contraction_index, history, 0);
        return contraction_index;
    }

    debug!("contraction index: filling {} entries across {num_workers} workers", history.len());
    let raw = RawIndex {
        ptr: contraction_index.as_mut_ptr(),
    };
    pool.scope(|_| {
        rayon::scope(|scope| {
            for (chunk_start, chunk) in history.chunks(chunk_len).enumerate() {
                let offset = chunk_start * chunk_len;
                let raw = &raw;
                scope.spawn(move |_| {
                    for (i, memento) in chunk.iter().enumerate() {
                        let v = memento.contracted_hypernode as usize;
                        // SAFETY: `history` entries are disjoint by construction (each
                        // hypernode is contracted at most once), and chunks partition the
                        // slice into non-overlapping index ranges.
                        unsafe {
                            let slot = &mut *raw.ptr.add(v);
                            assert_eq!(*slot, NOT_CONTRACTED, "hypernode {v} contracted twice");
                            *slot = (offset + i) as i64;
                        }
                    }
                });
            }
        });
    });

    contraction_index
}

fn fill_slice(contraction_index: &mut [i64], history: &[ContractionMemento], offset: usize) {
    for (i, memento) in history.iter().enumerate() {
        let v = memento.contracted_hypernode as usize;
        assert_eq!(contraction_index[v], NOT_CONTRACTED, "hypernode {v} contracted twice");
        contraction_index[v] = (offset + i) as i64;
    }
}

struct RawIndex {
    ptr: *mut i64,
}

// SAFETY: each spawned task writes a disjoint set of hypernode indices; see `build_contraction_index`.
unsafe impl Send for RawIndex {}
unsafe impl Sync for RawIndex {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn sequential_fill_assigns_positions() {
        let pool = WorkerPool::new(&Config::default());
        let history = vec![
            ContractionMemento { contracted_hypernode: 3 },
            ContractionMemento { contracted_hypernode: 1 },
        ];
        let index = build_contraction_index(&history, 5, &pool);
        assert_eq!(index, vec![-1, 1, -1, 0, -1]);
    }

    #[test]
    fn parallel_fill_assigns_positions() {
        let pool = WorkerPool::new(&Config {
            num_threads: 4,
            ..Config::default()
        });
        let history: Vec<ContractionMemento> = (0..20)
            .map(|v| ContractionMemento { contracted_hypernode: v })
            .collect();
        let index = build_contraction_index(&history, 20, &pool);
        for v in 0..20 {
            assert_eq!(index[v as usize], v as i64);
        }
    }
}
