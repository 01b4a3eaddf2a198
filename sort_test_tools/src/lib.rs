//! Shared test tooling for the bitonic sorters.
//!
//! Sort implementations plug into [`Sort`] and get a full test suite from
//! [`instantiate_sort_tests!`]. Inputs come from [`patterns`], which are seeded once per process so
//! failures can be reproduced with `OVERRIDE_SEED`.

pub mod patterns;

#[doc(hidden)]
pub use paste;

/// Requested output direction, mirrors the sort order of the library under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

pub trait Sort {
    fn name() -> String;

    fn sort(v: &mut Vec<i32>, direction: Direction);
}
