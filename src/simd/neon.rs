use std::arch::aarch64::{int32x4_t, vld1q_s32, vmaxq_s32, vminq_s32, vst1q_s32};

use super::engine::{VectorEngine, VectorEngineType};
use crate::SortOrder;

/// 128-bit NEON engine. NEON is part of the aarch64 baseline.
pub struct Neon;

#[allow(unsafe_op_in_unsafe_fn)]
impl VectorEngine for Neon {
    const WIDTH: usize = 4;
    const KIND: VectorEngineType = VectorEngineType::Neon;

    type Vector = int32x4_t;

    #[inline(always)]
    unsafe fn load(src: &[i32]) -> Self::Vector {
        debug_assert!(src.len() >= Self::WIDTH);
        vld1q_s32(src.as_ptr())
    }

    #[inline(always)]
    unsafe fn store(dst: &mut [i32], v: Self::Vector) {
        debug_assert!(dst.len() >= Self::WIDTH);
        vst1q_s32(dst.as_mut_ptr(), v)
    }

    #[inline(always)]
    unsafe fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        vminq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        vmaxq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn half_cleaner(v: &mut [i32], order: SortOrder) {
        super::half_cleaner_blocks::<Self>(v, order)
    }
}
