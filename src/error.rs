use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

use crate::simd::VectorEngineType;

#[derive(Error, Debug)]
pub enum SortError {
    #[error("sequence of length {len} cannot be padded to a power of two")]
    SizeLimit { len: usize },

    #[error("failed to allocate padding: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("failed to build task pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("vector engine {0} is not supported on this host")]
    UnsupportedEngine(VectorEngineType),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, SortError>;
