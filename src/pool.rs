//! Thin wrapper over a `rayon::ThreadPool`, giving MergeBack a named barrier primitive.

use crate::Config;

/// Wraps a `rayon::ThreadPool`. `scope` is the barrier MergeBack uses between its three phases:
/// it returns only once every task spawned inside the closure has completed.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    pub fn new(config: &Config) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .expect("failed to build worker thread pool");
        Self { pool }
    }

    /// Runs `f` to completion, with `self` in scope for recursive calls. Internally forwards to
    /// `rayon::ThreadPool::install`, which blocks the calling thread until `f` (and anything it
    /// spawns via `rayon::scope`) has finished.
    pub fn scope<'a>(&self, f: impl FnOnce(&WorkerPool) + 'a) {
        self.pool.install(|| f(self));
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_runs_closure() {
        let pool = WorkerPool::new(&Config::default());
        let mut ran = false;
        pool.scope(|_| ran = true);
        assert!(ran);
    }

    #[test]
    fn num_threads_is_positive() {
        let pool = WorkerPool::new(&Config::default());
        assert!(pool.num_threads() > 0);
    }
}
