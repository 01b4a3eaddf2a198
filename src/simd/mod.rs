//! Vectorized bitonic sort.
//!
//! A merge step compares element `i` with `i + k` for every `i` in the first half, where `k` is
//! half the range. The two index ranges `[0, k)` and `[k, 2k)` are contiguous, so they can be cut
//! into `WIDTH` wide blocks and handled with one lane-wise min/max per block. Whatever does not
//! fill a whole block falls back to scalar compare-exchange, as does every subproblem below the
//! sequential threshold.

use log::debug;

use crate::error::{Result, SortError};
use crate::padding::with_padding;
use crate::scalar;
use crate::{SortOrder, Sorter};

mod engine;
mod portable;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod x86;

pub use engine::{detect_vector_engine, VectorEngine, VectorEngineType};
#[cfg(target_arch = "aarch64")]
pub use neon::Neon;
pub use portable::Portable4;
#[cfg(target_arch = "x86_64")]
pub use x86::{Avx2, Sse41};

/// Subproblems smaller than this use the scalar core.
pub const DEFAULT_SEQUENTIAL_THRESHOLD: usize = 64;

/// Binds the engine type matching a [`VectorEngineType`] to `$E` and evaluates `$body`.
///
/// Engines not compiled for this target resolve to the portable engine. Callers check
/// availability first, so that arm only exists to keep the match exhaustive.
macro_rules! with_engine_type {
    ($engine:expr, $E:ident => $body:expr) => {
        match $engine {
            #[cfg(target_arch = "x86_64")]
            VectorEngineType::Avx2 => {
                type $E = x86::Avx2;
                $body
            }
            #[cfg(target_arch = "x86_64")]
            VectorEngineType::Sse41 => {
                type $E = x86::Sse41;
                $body
            }
            #[cfg(target_arch = "aarch64")]
            VectorEngineType::Neon => {
                type $E = neon::Neon;
                $body
            }
            #[allow(unreachable_patterns)]
            _ => {
                type $E = portable::Portable4;
                $body
            }
        }
    };
}

/// Compare-exchanges `E::WIDTH` elements starting at `left` against `E::WIDTH` elements starting at
/// `right`, lane by lane.
///
/// For [`SortOrder::Ascending`] the minima end up in the left block, for
/// [`SortOrder::Descending`] the maxima. Equivalent to
/// `for i in 0..E::WIDTH { compare_and_swap(v, left + i, right + i, order) }`.
///
/// Panics if the blocks overlap (`right < left + E::WIDTH`) or exceed `v`.
///
/// # Safety
///
/// The CPU must support `E`, see [`VectorEngineType::is_available`].
#[inline(always)]
pub unsafe fn compare_exchange_block<E: VectorEngine>(
    v: &mut [i32],
    left: usize,
    right: usize,
    order: SortOrder,
) {
    debug_assert!(E::KIND.is_available(), "{} is not available", E::KIND);

    let (head, tail) = v.split_at_mut(right);
    let lo = &mut head[left..left + E::WIDTH];
    let hi = &mut tail[..E::WIDTH];

    let a = E::load(lo);
    let b = E::load(hi);
    let min = E::min(a, b);
    let max = E::max(a, b);

    match order {
        SortOrder::Ascending => {
            E::store(lo, min);
            E::store(hi, max);
        }
        SortOrder::Descending => {
            E::store(lo, max);
            E::store(hi, min);
        }
    }
}

/// Compare-exchanges the first half of `v` against the second half, whole `E::WIDTH` blocks
/// through `E` and the remainder on the scalar core.
///
/// Backs [`VectorEngine::half_cleaner`]. Inlined into each engine's implementation, which carries
/// the engine's target features.
///
/// # Safety
///
/// The CPU must support `E`.
#[inline(always)]
pub unsafe fn half_cleaner_blocks<E: VectorEngine>(v: &mut [i32], order: SortOrder) {
    let k = v.len() / 2;
    let blocks = k / E::WIDTH;

    for block in 0..blocks {
        let i = block * E::WIDTH;
        compare_exchange_block::<E>(v, i, i + k, order);
    }

    for i in (blocks * E::WIDTH)..k {
        scalar::compare_and_swap(v, i, i + k, order);
    }
}

/// Checked, engine dispatched version of [`compare_exchange_block`].
pub fn compare_exchange_block_with(
    engine: VectorEngineType,
    v: &mut [i32],
    left: usize,
    right: usize,
    order: SortOrder,
) -> Result<()> {
    if !engine.is_available() {
        return Err(SortError::UnsupportedEngine(engine));
    }

    // SAFETY: availability was checked above.
    with_engine_type!(engine, E => unsafe {
        compare_exchange_block::<E>(v, left, right, order)
    });

    Ok(())
}

/// Bitonic sort with vectorized merge passes.
#[derive(Debug, Clone, Copy)]
pub struct SimdSorter {
    engine: VectorEngineType,
    threshold: usize,
}

impl Default for SimdSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimdSorter {
    /// Creates a sorter using the widest engine the CPU supports.
    pub fn new() -> Self {
        Self {
            engine: detect_vector_engine(),
            threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
        }
    }

    /// Creates a sorter pinned to `engine`, failing if this CPU does not support it.
    pub fn with_engine(engine: VectorEngineType) -> Result<Self> {
        if !engine.is_available() {
            return Err(SortError::UnsupportedEngine(engine));
        }

        Ok(Self {
            engine,
            threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
        })
    }

    /// Overrides the size below which subproblems use the scalar core. Merges additionally need at
    /// least two full vectors to take the vector path.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn engine(&self) -> VectorEngineType {
        self.engine
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn sort_rec<E: VectorEngine>(&self, v: &mut [i32], order: SortOrder) {
        let len = v.len();
        if len <= 1 {
            return;
        }

        if len < self.threshold {
            scalar::bitonic_sort(v, order);
            return;
        }

        let (left, right) = v.split_at_mut(len / 2);
        self.sort_rec::<E>(left, SortOrder::Ascending);
        self.sort_rec::<E>(right, SortOrder::Descending);

        self.merge_rec::<E>(v, order);
    }

    fn merge_rec<E: VectorEngine>(&self, v: &mut [i32], order: SortOrder) {
        let len = v.len();
        if len <= 1 {
            return;
        }

        if len < 2 * E::WIDTH || len < self.threshold {
            scalar::bitonic_merge(v, order);
            return;
        }

        // SAFETY: `SimdSorter` is only constructed with available engines.
        unsafe { E::half_cleaner(v, order) };

        let k = len / 2;
        let (left, right) = v.split_at_mut(k);
        self.merge_rec::<E>(left, order);
        self.merge_rec::<E>(right, order);
    }
}

impl Sorter for SimdSorter {
    fn sort(&self, v: &mut Vec<i32>, order: SortOrder) -> Result<()> {
        with_padding(v, order, |v| {
            debug!("vector engine {} width {}", self.engine, self.engine.width());
            with_engine_type!(self.engine, E => self.sort_rec::<E>(v, order));
            Ok(())
        })
    }

    fn identify(&self) -> String {
        format!(
            "SimdBitonicSorter({}, width={})",
            self.engine,
            self.engine.width()
        )
    }
}
