//! Bitonic sorting network for `i32` sequences.
//!
//! The sort/merge algebra lives in [`scalar`] and is shared by every strategy as its base case.
//! On top of it sit three execution strategies:
//!
//! - [`threaded::ThreadedSorter`]: fork-join over native threads, gated by a thread budget.
//! - [`task::TaskSorter`]: fork-join over a rayon work-stealing pool.
//! - [`simd::SimdSorter`]: block-wise compare-exchange over vector lanes.
//!
//! All strategies pad non power-of-two inputs with sentinels (see [`padding`]) and produce exactly
//! the output of the scalar network.

use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod padding;
pub mod scalar;
pub mod simd;
pub mod task;
pub mod threaded;

pub use error::{Result, SortError};
pub use scalar::ScalarSorter;
pub use simd::{SimdSorter, VectorEngineType};
pub use task::TaskSorter;
pub use threaded::{ThreadBudget, ThreadedSorter};

/// Direction of a sort or merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Returns `true` if `a` and `b`, in this position, violate the order.
    #[inline(always)]
    pub fn is_violated(self, a: i32, b: i32) -> bool {
        match self {
            SortOrder::Ascending => a > b,
            SortOrder::Descending => a < b,
        }
    }
}

/// Common surface of every bitonic sorting strategy.
pub trait Sorter: Send + Sync {
    /// Sorts `v` in place according to `order`.
    ///
    /// Any length is accepted. On success `v` holds the same multiset of values, ordered per
    /// `order`, with its length unchanged. On failure `v` still holds the same multiset but its
    /// order is unspecified.
    fn sort(&self, v: &mut Vec<i32>, order: SortOrder) -> Result<()>;

    /// Human readable name, used for reporting only.
    fn identify(&self) -> String;
}

/// Explicit strategy selector, mostly useful for benchmarks and test matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Scalar,
    Threaded,
    Task,
    Simd,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Scalar,
        Strategy::Threaded,
        Strategy::Task,
        Strategy::Simd,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Scalar => "scalar",
            Strategy::Threaded => "threaded",
            Strategy::Task => "task",
            Strategy::Simd => "simd",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SortError::UnknownStrategy(s.to_string()))
    }
}

/// Builds a sorter for `strategy` with its default configuration.
pub fn make_sorter(strategy: Strategy) -> Box<dyn Sorter> {
    match strategy {
        Strategy::Scalar => Box::new(ScalarSorter),
        Strategy::Threaded => Box::new(ThreadedSorter::new(0)),
        Strategy::Task => Box::new(TaskSorter::new()),
        Strategy::Simd => Box::new(SimdSorter::new()),
    }
}

/// Number of hardware threads, at least 1.
pub(crate) fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
