//! The reference bitonic network.
//!
//! Every function works on a sub-slice: the `(seq, low, count)` range of the classic formulation is
//! `&mut seq[low..low + count]`. Lengths are expected to be powers of two, the padding layer
//! guarantees that for the top level call and halving preserves it.

use crate::error::Result;
use crate::padding::with_padding;
use crate::{SortOrder, Sorter};

/// Swaps `v[i]` and `v[j]` if they violate `order`.
#[inline(always)]
pub fn compare_and_swap(v: &mut [i32], i: usize, j: usize, order: SortOrder) {
    if order.is_violated(v[i], v[j]) {
        v.swap(i, j);
    }
}

/// One compare-exchange pass of a merge step: element `i` against `i + len / 2` for the first
/// half of `v`.
#[inline]
pub fn half_cleaner(v: &mut [i32], order: SortOrder) {
    let half = v.len() / 2;
    let (left, right) = v.split_at_mut(half);

    for (a, b) in left.iter_mut().zip(right.iter_mut()) {
        if order.is_violated(*a, *b) {
            std::mem::swap(a, b);
        }
    }
}

/// Merges a bitonic sequence into `order`.
pub fn bitonic_merge(v: &mut [i32], order: SortOrder) {
    if v.len() <= 1 {
        return;
    }

    half_cleaner(v, order);

    let (left, right) = v.split_at_mut(v.len() / 2);
    bitonic_merge(left, order);
    bitonic_merge(right, order);
}

/// Sorts `v` into `order`.
///
/// The first half is always built ascending and the second half descending, independent of
/// `order`. That is what turns the whole range into a bitonic sequence for the final merge.
pub fn bitonic_sort(v: &mut [i32], order: SortOrder) {
    if v.len() <= 1 {
        return;
    }

    let (left, right) = v.split_at_mut(v.len() / 2);
    bitonic_sort(left, SortOrder::Ascending);
    bitonic_sort(right, SortOrder::Descending);

    bitonic_merge(v, order);
}

/// Single threaded bitonic sort, the reference every other strategy must match.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarSorter;

impl Sorter for ScalarSorter {
    fn sort(&self, v: &mut Vec<i32>, order: SortOrder) -> Result<()> {
        with_padding(v, order, |v| {
            bitonic_sort(v, order);
            Ok(())
        })
    }

    fn identify(&self) -> String {
        "ScalarBitonicSorter".into()
    }
}
