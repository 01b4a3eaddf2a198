//! Power-of-two padding with order dependent sentinels.
//!
//! The bitonic network only handles power-of-two lengths. Shorter inputs are extended with a
//! sentinel that can never sort before real data: `i32::MAX` for ascending requests and `i32::MIN`
//! for descending ones. After sorting the sentinels occupy the tail and are cut off again.
//!
//! Real values equal to the sentinel are fine. They compare equal to the padding, so the tail of
//! the sorted buffer is indistinguishable from real data and truncating it still leaves exactly the
//! right multiset in front.

use log::debug;

use crate::error::{Result, SortError};
use crate::SortOrder;

/// Sizes computed once per sort call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub original_len: usize,
    pub padded_len: usize,
}

impl Padding {
    /// Computes the padded size for a sequence of `len` elements.
    ///
    /// `0` stays `0`. Fails with [`SortError::SizeLimit`] if the next power of two does not fit
    /// into `usize`.
    pub fn for_len(len: usize) -> Result<Self> {
        let padded_len = if len == 0 {
            0
        } else {
            len.checked_next_power_of_two()
                .ok_or(SortError::SizeLimit { len })?
        };

        Ok(Self {
            original_len: len,
            padded_len,
        })
    }

    #[inline]
    pub fn is_padded(&self) -> bool {
        self.padded_len > self.original_len
    }
}

/// The fill value that sorts to the discarded tail for `order`.
#[inline]
pub fn sentinel(order: SortOrder) -> i32 {
    match order {
        SortOrder::Ascending => i32::MAX,
        SortOrder::Descending => i32::MIN,
    }
}

/// Extends `v` to the next power of two with sentinels for `order`.
pub fn pad(v: &mut Vec<i32>, order: SortOrder) -> Result<Padding> {
    let padding = Padding::for_len(v.len())?;

    if padding.is_padded() {
        let extra = padding.padded_len - padding.original_len;
        v.try_reserve_exact(extra)?;
        v.resize(padding.padded_len, sentinel(order));
    }

    Ok(padding)
}

/// Restores the length recorded in `padding`.
pub fn unpad(v: &mut Vec<i32>, padding: Padding) {
    if padding.is_padded() {
        v.truncate(padding.original_len);
    }
}

/// Removes the sentinels of `padding` from an unsorted buffer.
///
/// Used when a sort aborted halfway and the padding is no longer guaranteed to sit at the tail.
/// Sentinel copies are interchangeable, so dropping the first `padded_len - original_len`
/// occurrences restores the original multiset.
fn strip_sentinels(v: &mut Vec<i32>, padding: Padding, order: SortOrder) {
    let fill = sentinel(order);
    let mut remaining = padding.padded_len - padding.original_len;

    v.retain(|&x| {
        if remaining > 0 && x == fill {
            remaining -= 1;
            false
        } else {
            true
        }
    });
}

/// Owns a padded buffer for the duration of one sort call.
///
/// Dropping the guard undoes the padding: a plain truncate after a completed sort, otherwise the
/// sentinels are stripped wherever the aborted sort left them. This also covers unwinding out of
/// the sort, for example a worker panic re-raised on the calling thread.
struct PaddedBuffer<'a> {
    v: &'a mut Vec<i32>,
    padding: Padding,
    order: SortOrder,
    sorted: bool,
}

impl Drop for PaddedBuffer<'_> {
    fn drop(&mut self) {
        if self.sorted {
            unpad(self.v, self.padding);
        } else if self.padding.is_padded() {
            strip_sentinels(self.v, self.padding, self.order);
        }
    }
}

/// Pads `v`, runs `sort` over the padded buffer and unpads again.
///
/// The buffer is unpadded even if `sort` fails or panics, so callers never observe sentinels.
pub fn with_padding<F>(v: &mut Vec<i32>, order: SortOrder, sort: F) -> Result<()>
where
    F: FnOnce(&mut [i32]) -> Result<()>,
{
    if v.len() <= 1 {
        return Ok(());
    }

    let padding = pad(v, order)?;
    debug!(
        "sorting {} elements (padded to {}) {:?}",
        padding.original_len, padding.padded_len, order
    );

    let mut buffer = PaddedBuffer {
        v,
        padding,
        order,
        sorted: false,
    };

    let result = sort(buffer.v.as_mut_slice());
    buffer.sorted = result.is_ok();
    result
}
