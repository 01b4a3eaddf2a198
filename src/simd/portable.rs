use super::engine::{VectorEngine, VectorEngineType};
use crate::SortOrder;

/// Four lanes emulated with a plain array. Used where no native engine is available.
pub struct Portable4;

impl VectorEngine for Portable4 {
    const WIDTH: usize = 4;
    const KIND: VectorEngineType = VectorEngineType::Portable;

    type Vector = [i32; 4];

    #[inline(always)]
    unsafe fn load(src: &[i32]) -> Self::Vector {
        let mut lanes = [0; 4];
        lanes.copy_from_slice(&src[..4]);
        lanes
    }

    #[inline(always)]
    unsafe fn store(dst: &mut [i32], v: Self::Vector) {
        dst[..4].copy_from_slice(&v);
    }

    #[inline(always)]
    unsafe fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        std::array::from_fn(|i| a[i].min(b[i]))
    }

    #[inline(always)]
    unsafe fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        std::array::from_fn(|i| a[i].max(b[i]))
    }

    #[inline(always)]
    unsafe fn half_cleaner(v: &mut [i32], order: SortOrder) {
        super::half_cleaner_blocks::<Self>(v, order)
    }
}
