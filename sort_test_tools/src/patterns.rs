use std::env;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use rand::prelude::*;
use zipf::ZipfDistribution;

// --- Public ---

/// Full `i32` range.
pub fn random(len: usize) -> Vec<i32> {
    let mut rng = new_seeded_rng();

    (0..len).map(|_| rng.gen::<i32>()).collect()
}

/// Values drawn uniformly from `range`.
pub fn random_uniform(len: usize, range: RangeInclusive<i32>) -> Vec<i32> {
    let mut rng = new_seeded_rng();
    let dist = rand::distributions::Uniform::from(range);

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

/// Zipfian distributed values, lots of duplicates for larger exponents.
pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut rng = new_seeded_rng();
    let dist = ZipfDistribution::new(len, exponent).unwrap();

    (0..len).map(|_| dist.sample(&mut rng) as i32).collect()
}

/// Mostly `i32::MIN`, `i32::MAX` and zero, the values that collide with padding sentinels.
pub fn extremes(len: usize) -> Vec<i32> {
    let mut rng = new_seeded_rng();
    let choices = [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX];

    (0..len).map(|_| *choices.choose(&mut rng).unwrap()).collect()
}

pub fn all_equal(len: usize) -> Vec<i32> {
    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    (0..len as i32).rev().collect()
}

/// `saw_count` ascending runs of random values.
pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut vals = random(len);
    let chunk_len = len.div_ceil(saw_count.max(1));
    for chunk in vals.chunks_mut(chunk_len) {
        chunk.sort_unstable();
    }

    vals
}

/// Ascending first half, descending second half.
pub fn pipe_organ(len: usize) -> Vec<i32> {
    let mut vals = random(len);
    let half = len / 2;
    vals[..half].sort_unstable();
    vals[half..].sort_unstable_by(|a, b| b.cmp(a));

    vals
}

pub fn random_init_seed() -> u64 {
    *SEED
}

// --- Private ---

static SEED: Lazy<u64> = Lazy::new(|| {
    let seed = env::var("OVERRIDE_SEED")
        .ok()
        .and_then(|seed| seed.parse::<u64>().ok())
        .unwrap_or_else(|| thread_rng().gen());

    println!("Seed: {seed}");
    seed
});

fn new_seeded_rng() -> StdRng {
    rand::SeedableRng::seed_from_u64(*SEED)
}
