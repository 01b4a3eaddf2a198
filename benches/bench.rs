use std::env;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::prelude::*;
use regex::Regex;

use bitonic_sort_rs::{
    ScalarSorter, SimdSorter, SortOrder, Sorter, TaskSorter, ThreadedSorter,
};

const SIZES: [usize; 6] = [1 << 6, 1 << 8, 1 << 10, 1 << 12, 1 << 14, 1 << 16];

fn generate_data(len: usize, pattern: &str) -> Vec<i32> {
    match pattern {
        "random" => {
            let mut rng = StdRng::seed_from_u64(42);
            let upper = (len * 10).min(i32::MAX as usize) as i32;
            (0..len).map(|_| rng.gen_range(0..=upper)).collect()
        }
        "sorted" => (0..len as i32).collect(),
        "reversed" => (0..len as i32).rev().collect(),
        _ => panic!("unknown pattern {pattern}"),
    }
}

fn thread_counts() -> Vec<usize> {
    let hardware = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let mut counts = vec![1, 2];
    let mut n = 4;
    while n <= hardware {
        counts.push(n);
        n *= 2;
    }
    counts.push(0);
    counts
}

fn sorters() -> Vec<Box<dyn Sorter>> {
    let mut sorters: Vec<Box<dyn Sorter>> = vec![Box::new(ScalarSorter)];

    for threads in thread_counts() {
        sorters.push(Box::new(ThreadedSorter::new(threads)));
    }

    sorters.push(Box::new(TaskSorter::new()));
    sorters.push(Box::new(SimdSorter::new()));

    // BENCH_STRATEGIES="Simd|Threaded" limits the run to matching sorter names.
    if let Ok(filter) = env::var("BENCH_STRATEGIES") {
        let re = Regex::new(&filter).expect("BENCH_STRATEGIES is not a valid regex");
        sorters.retain(|sorter| re.is_match(&sorter.identify()));
    }

    sorters
}

fn bench_sorters(c: &mut Criterion) {
    let sorters = sorters();

    for pattern in ["random", "sorted", "reversed"] {
        let mut group = c.benchmark_group(format!("bitonic-{pattern}"));

        for len in SIZES {
            let data = generate_data(len, pattern);

            for sorter in &sorters {
                group.bench_with_input(
                    BenchmarkId::new(sorter.identify(), len),
                    &data,
                    |b, data| {
                        b.iter_batched(
                            || data.clone(),
                            |mut v| {
                                sorter.sort(&mut v, SortOrder::Ascending).unwrap();
                                black_box(v)
                            },
                            BatchSize::LargeInput,
                        )
                    },
                );
            }
        }

        group.finish();
    }
}

criterion_group!(benches, bench_sorters);
criterion_main!(benches);
