//! Fork-join bitonic sort over native threads.
//!
//! Each build and merge node larger than the sequential threshold may hand one of its halves to a
//! freshly spawned scoped thread while the current thread works on the other half. Whether it may
//! do so is decided by a [`ThreadBudget`] that lives for exactly one sort call.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::{debug, trace, warn};

use crate::error::Result;
use crate::padding::with_padding;
use crate::scalar;
use crate::{hardware_concurrency, SortOrder, Sorter};

/// Subproblems up to this size are never forked.
pub const DEFAULT_SEQUENTIAL_THRESHOLD: usize = 1024;

const WORKER_NAME: &str = "bitonic-worker";

/// Live thread accounting for one sort call.
///
/// The counter starts at 1 for the calling thread. A fork reserves two slots and is only granted
/// while `active * 2 <= max_threads`. Check and reservation happen in a single compare-exchange,
/// so the cap is hard: two branches racing for the last slots can not both observe the same stale
/// count and overshoot it.
#[derive(Debug)]
pub struct ThreadBudget {
    max_threads: usize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ThreadBudget {
    pub fn new(max_threads: usize) -> Self {
        Self {
            max_threads,
            active: AtomicUsize::new(1),
            peak: AtomicUsize::new(1),
        }
    }

    /// Reserves two slots if the budget allows another fork.
    ///
    /// The slots are released when the returned permit is dropped.
    pub fn try_acquire(&self) -> Option<BudgetPermit<'_>> {
        let mut current = self.active.load(Ordering::Acquire);

        loop {
            if current.saturating_mul(2) > self.max_threads {
                return None;
            }

            match self.active.compare_exchange_weak(
                current,
                current + 2,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.peak.fetch_max(current + 2, Ordering::Relaxed);
                    return Some(BudgetPermit { budget: self });
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Currently reserved slots, including the calling thread.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Highest value [`Self::active`] reached so far.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }
}

/// Two reserved budget slots, given back on drop.
#[derive(Debug)]
pub struct BudgetPermit<'a> {
    budget: &'a ThreadBudget,
}

impl Drop for BudgetPermit<'_> {
    fn drop(&mut self) {
        self.budget.active.fetch_sub(2, Ordering::AcqRel);
    }
}

/// Bitonic sort that forks onto native threads within a thread budget.
///
/// If a worker thread can not be spawned the sort call fails with
/// [`SortError::Spawn`](crate::SortError::Spawn). There is no silent fallback to sequential
/// execution for the failed subtree. The sequence keeps all of its values but is left unsorted.
#[derive(Debug, Clone)]
pub struct ThreadedSorter {
    max_threads: usize,
    threshold: usize,
    stack_size: Option<usize>,
}

impl ThreadedSorter {
    /// Creates a sorter with a budget of `max_threads`. `0` resolves to the host's hardware
    /// concurrency, or 1 if that can not be determined.
    pub fn new(max_threads: usize) -> Self {
        let max_threads = if max_threads > 0 {
            max_threads
        } else {
            hardware_concurrency()
        };

        Self {
            max_threads,
            threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
            stack_size: None,
        }
    }

    /// Overrides the size up to which subproblems run on the scalar core.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Stack size in bytes for spawned workers. Without it the platform default is used.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn worker(&self) -> thread::Builder {
        let builder = thread::Builder::new().name(WORKER_NAME.into());
        match self.stack_size {
            Some(bytes) => builder.stack_size(bytes),
            None => builder,
        }
    }

    fn permit<'b>(&self, len: usize, budget: &'b ThreadBudget) -> Option<BudgetPermit<'b>> {
        if len > self.threshold {
            budget.try_acquire()
        } else {
            None
        }
    }

    fn sort_rec(&self, v: &mut [i32], order: SortOrder, budget: &ThreadBudget) -> Result<()> {
        let len = v.len();
        if len <= 1 {
            return Ok(());
        }

        let (left, right) = v.split_at_mut(len / 2);
        match self.permit(len, budget) {
            Some(permit) => fork(
                self.worker(),
                permit,
                || self.sort_rec(left, SortOrder::Ascending, budget),
                || self.sort_rec(right, SortOrder::Descending, budget),
            )?,
            None => {
                scalar::bitonic_sort(left, SortOrder::Ascending);
                scalar::bitonic_sort(right, SortOrder::Descending);
            }
        }

        self.merge_rec(v, order, budget)
    }

    fn merge_rec(&self, v: &mut [i32], order: SortOrder, budget: &ThreadBudget) -> Result<()> {
        let len = v.len();
        if len <= 1 {
            return Ok(());
        }

        scalar::half_cleaner(v, order);

        let (left, right) = v.split_at_mut(len / 2);
        match self.permit(len, budget) {
            Some(permit) => fork(
                self.worker(),
                permit,
                || self.merge_rec(left, order, budget),
                || self.merge_rec(right, order, budget),
            ),
            None => {
                scalar::bitonic_merge(left, order);
                scalar::bitonic_merge(right, order);
                Ok(())
            }
        }
    }
}

/// Runs `spawned` on a new scoped thread built by `worker` and `inline` on the current one, then
/// joins.
///
/// `permit` is held until after the join, so the reserved slots stay unavailable to other branches
/// for exactly the lifetime of the spawned thread.
fn fork<A, B>(
    worker: thread::Builder,
    permit: BudgetPermit<'_>,
    spawned: A,
    inline: B,
) -> Result<()>
where
    A: FnOnce() -> Result<()> + Send,
    B: FnOnce() -> Result<()>,
{
    trace!(
        "forking worker, {} of {} thread slots reserved",
        permit.budget.active(),
        permit.budget.max_threads()
    );

    let result = thread::scope(|s| -> Result<()> {
        let handle = worker.spawn_scoped(s, spawned).map_err(|err| {
            warn!("failed to spawn {WORKER_NAME}: {err}");
            err
        })?;

        let inline_result = inline();
        let spawned_result = match handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        };

        inline_result.and(spawned_result)
    });

    drop(permit);
    result
}

impl Sorter for ThreadedSorter {
    fn sort(&self, v: &mut Vec<i32>, order: SortOrder) -> Result<()> {
        with_padding(v, order, |v| {
            let budget = ThreadBudget::new(self.max_threads);
            let result = self.sort_rec(v, order, &budget);
            debug!(
                "thread budget peak {} of {} slots",
                budget.peak(),
                budget.max_threads()
            );
            result
        })
    }

    fn identify(&self) -> String {
        format!("ThreadedBitonicSorter(max_threads={})", self.max_threads)
    }
}
