//! x86_64 engines. Both need runtime feature detection before use.

use std::arch::x86_64::{
    __m128i, __m256i, _mm256_loadu_si256, _mm256_max_epi32, _mm256_min_epi32,
    _mm256_storeu_si256, _mm_loadu_si128, _mm_max_epi32, _mm_min_epi32, _mm_storeu_si128,
};

use super::engine::{VectorEngine, VectorEngineType};
use crate::SortOrder;

/// 128-bit engine, `_mm_min_epi32`/`_mm_max_epi32` need SSE4.1.
pub struct Sse41;

#[allow(unsafe_op_in_unsafe_fn)]
impl VectorEngine for Sse41 {
    const WIDTH: usize = 4;
    const KIND: VectorEngineType = VectorEngineType::Sse41;

    type Vector = __m128i;

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn load(src: &[i32]) -> Self::Vector {
        debug_assert!(src.len() >= Self::WIDTH);
        _mm_loadu_si128(src.as_ptr() as *const __m128i)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn store(dst: &mut [i32], v: Self::Vector) {
        debug_assert!(dst.len() >= Self::WIDTH);
        _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, v)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        _mm_min_epi32(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        _mm_max_epi32(a, b)
    }

    #[target_feature(enable = "sse4.1")]
    unsafe fn half_cleaner(v: &mut [i32], order: SortOrder) {
        super::half_cleaner_blocks::<Self>(v, order)
    }
}

/// 256-bit engine.
pub struct Avx2;

#[allow(unsafe_op_in_unsafe_fn)]
impl VectorEngine for Avx2 {
    const WIDTH: usize = 8;
    const KIND: VectorEngineType = VectorEngineType::Avx2;

    type Vector = __m256i;

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load(src: &[i32]) -> Self::Vector {
        debug_assert!(src.len() >= Self::WIDTH);
        _mm256_loadu_si256(src.as_ptr() as *const __m256i)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn store(dst: &mut [i32], v: Self::Vector) {
        debug_assert!(dst.len() >= Self::WIDTH);
        _mm256_storeu_si256(dst.as_mut_ptr() as *mut __m256i, v)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        _mm256_min_epi32(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector {
        _mm256_max_epi32(a, b)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn half_cleaner(v: &mut [i32], order: SortOrder) {
        super::half_cleaner_blocks::<Self>(v, order)
    }
}
