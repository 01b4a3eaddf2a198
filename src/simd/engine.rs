//! Portable interface over `i32` vector lanes, and runtime selection of the widest engine.
//!
//! | Engine      | Target  | Lanes |
//! | ----------- | ------- | ----- |
//! | `Portable4` | any     | 4     |
//! | `Sse41`     | x86_64  | 4     |
//! | `Avx2`      | x86_64  | 8     |
//! | `Neon`      | aarch64 | 4     |

use std::fmt;

use log::info;
use once_cell::sync::Lazy;

use crate::SortOrder;

/// Lane-wise operations needed for a block compare-exchange.
///
/// All methods are `unsafe`: callers must make sure the CPU supports the engine (see
/// [`VectorEngineType::is_available`]) and that slices passed to `load`/`store` hold at least
/// `WIDTH` elements.
pub trait VectorEngine {
    /// Number of `i32` lanes in one vector.
    const WIDTH: usize;

    /// The runtime tag of this engine, used to check availability.
    const KIND: VectorEngineType;

    type Vector: Copy;

    /// Unaligned load of the first `WIDTH` elements of `src`.
    unsafe fn load(src: &[i32]) -> Self::Vector;

    /// Unaligned store into the first `WIDTH` elements of `dst`.
    unsafe fn store(dst: &mut [i32], v: Self::Vector);

    /// Lane-wise signed minimum.
    unsafe fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector;

    /// Lane-wise signed maximum.
    unsafe fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector;

    /// One merge step over `v`: compare-exchanges `v[i]` with `v[i + v.len() / 2]` for every `i`
    /// in the first half, see [`half_cleaner_blocks`](super::half_cleaner_blocks).
    ///
    /// Engines compile this with their target features enabled, so the lane operations above
    /// inline into the loop.
    unsafe fn half_cleaner(v: &mut [i32], order: SortOrder);
}

/// Available vector engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorEngineType {
    /// Plain arrays, always available.
    Portable,
    /// 128-bit SSE4.1, x86_64 only.
    Sse41,
    /// 256-bit AVX2, x86_64 only.
    Avx2,
    /// 128-bit NEON, aarch64 only.
    Neon,
}

impl VectorEngineType {
    pub const ALL: [VectorEngineType; 4] = [
        VectorEngineType::Portable,
        VectorEngineType::Sse41,
        VectorEngineType::Avx2,
        VectorEngineType::Neon,
    ];

    /// Number of `i32` lanes.
    pub fn width(self) -> usize {
        match self {
            VectorEngineType::Portable => 4,
            VectorEngineType::Sse41 => 4,
            VectorEngineType::Avx2 => 8,
            VectorEngineType::Neon => 4,
        }
    }

    /// Whether this engine can run on the current CPU.
    pub fn is_available(self) -> bool {
        match self {
            VectorEngineType::Portable => true,
            #[cfg(target_arch = "x86_64")]
            VectorEngineType::Sse41 => is_x86_feature_detected!("sse4.1"),
            #[cfg(target_arch = "x86_64")]
            VectorEngineType::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            VectorEngineType::Neon => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }
}

impl fmt::Display for VectorEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VectorEngineType::Portable => "portable",
            VectorEngineType::Sse41 => "sse4.1",
            VectorEngineType::Avx2 => "avx2",
            VectorEngineType::Neon => "neon",
        };
        f.write_str(name)
    }
}

static DETECTED_ENGINE: Lazy<VectorEngineType> = Lazy::new(|| {
    let engine = [
        VectorEngineType::Avx2,
        VectorEngineType::Sse41,
        VectorEngineType::Neon,
    ]
    .into_iter()
    .find(|engine| engine.is_available())
    .unwrap_or(VectorEngineType::Portable);

    info!(
        "using vector engine {engine} ({} x i32 lanes)",
        engine.width()
    );
    engine
});

/// The widest engine supported by this CPU. Probed once per process.
pub fn detect_vector_engine() -> VectorEngineType {
    *DETECTED_ENGINE
}
