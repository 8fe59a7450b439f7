//! API options for the batched-apply fallback.
//!
//! Custom operators without their own batched action apply `matvec` to
//! every column of the input block. With the `rayon` feature these columns
//! may be processed in parallel once there are enough of them.

/// Column-by-column `matmat` settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmatOptions {
    /// Process columns on the rayon pool.
    pub parallel: bool,

    /// Fewest columns for which the parallel path is taken.
    pub min_parallel_columns: usize,
}

impl MatmatOptions {
    /// Always process columns one after another.
    pub fn sequential() -> Self {
        Self { parallel: false, min_parallel_columns: usize::MAX }
    }

    pub(crate) fn use_parallel(&self, ncols: usize) -> bool {
        cfg!(feature = "rayon") && self.parallel && ncols >= self.min_parallel_columns
    }
}

impl Default for MatmatOptions {
    #[cfg(feature = "rayon")]
    fn default() -> Self {
        Self { parallel: true, min_parallel_columns: num_cpus::get().max(2) }
    }

    #[cfg(not(feature = "rayon"))]
    fn default() -> Self {
        Self::sequential()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_never_goes_parallel() {
        let opts = MatmatOptions::sequential();
        assert!(!opts.use_parallel(1_000));
    }

    #[test]
    fn threshold_is_respected() {
        let opts = MatmatOptions { parallel: true, min_parallel_columns: 4 };
        assert!(!opts.use_parallel(3));
        assert_eq!(opts.use_parallel(4), cfg!(feature = "rayon"));
    }
}
