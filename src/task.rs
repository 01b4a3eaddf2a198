//! Fork-join bitonic sort over a rayon work-stealing pool.
//!
//! The pool is entered once per sort call. Inside, every node above the sequential threshold
//! submits its two halves with [`rayon::join`], which doubles as the join barrier: the merge of a
//! node never starts before both of its sub-builds returned.

use log::{debug, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;
use crate::padding::with_padding;
use crate::scalar;
use crate::{hardware_concurrency, SortOrder, Sorter};

/// Subproblems up to this size run on the scalar core.
pub const DEFAULT_SEQUENTIAL_THRESHOLD: usize = 1024;

/// Bitonic sort as nested rayon tasks.
///
/// Without a dedicated pool the global rayon pool is used. Either way the whole recursion, top
/// level node included, runs on pool workers.
#[derive(Debug)]
pub struct TaskSorter {
    pool: Option<ThreadPool>,
    threshold: usize,
}

impl Default for TaskSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSorter {
    /// Creates a sorter running on rayon's global pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
        }
    }

    /// Creates a sorter with its own pool of `workers` threads. `0` resolves to the host's hardware
    /// concurrency.
    pub fn with_workers(workers: usize) -> Result<Self> {
        let workers = if workers > 0 {
            workers
        } else {
            hardware_concurrency()
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("bitonic-task-{i}"))
            .build()?;

        Ok(Self {
            pool: Some(pool),
            threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
        })
    }

    /// Overrides the size up to which subproblems run on the scalar core.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of worker threads the sort will be scheduled on.
    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn sort_rec(&self, v: &mut [i32], order: SortOrder) {
        let len = v.len();
        if len <= 1 {
            return;
        }

        let (left, right) = v.split_at_mut(len / 2);
        if len > self.threshold {
            trace!("submitting sub-builds of {len} elements");
            rayon::join(
                || self.sort_rec(left, SortOrder::Ascending),
                || self.sort_rec(right, SortOrder::Descending),
            );
            self.merge_rec(v, order);
        } else {
            scalar::bitonic_sort(left, SortOrder::Ascending);
            scalar::bitonic_sort(right, SortOrder::Descending);
            scalar::bitonic_merge(v, order);
        }
    }

    fn merge_rec(&self, v: &mut [i32], order: SortOrder) {
        let len = v.len();
        if len <= 1 {
            return;
        }

        // Top-level pass runs in the current task, only the halves are submitted.
        scalar::half_cleaner(v, order);

        let (left, right) = v.split_at_mut(len / 2);
        if len > self.threshold {
            rayon::join(
                || self.merge_rec(left, order),
                || self.merge_rec(right, order),
            );
        } else {
            scalar::bitonic_merge(left, order);
            scalar::bitonic_merge(right, order);
        }
    }
}

impl Sorter for TaskSorter {
    fn sort(&self, v: &mut Vec<i32>, order: SortOrder) -> Result<()> {
        with_padding(v, order, |v| {
            if v.len() <= self.threshold {
                scalar::bitonic_sort(v, order);
                return Ok(());
            }

            debug!("entering task pool with {} workers", self.workers());
            match &self.pool {
                Some(pool) => pool.install(|| self.sort_rec(v, order)),
                None => rayon::scope(|_| self.sort_rec(v, order)),
            }

            Ok(())
        })
    }

    fn identify(&self) -> String {
        format!("TaskBitonicSorter(workers={})", self.workers())
    }
}
