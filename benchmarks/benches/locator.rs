use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use litswap::locator::core::{LineIndex, locate_all};

fn generate_source(lines: usize) -> String {
    let mut src = String::new();
    for i in 0..lines {
        src.push_str(&format!(
            "  <div className=\"bg-[#0d0d0d] p-{}\">ligne {} café</div>\n",
            i % 8,
            i
        ));
    }
    src
}

fn bench_locating(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_benchmarks");

    let src = generate_source(5_000);
    let len = src.chars().count();
    let offsets: Vec<usize> = (0..64).map(|i| i * len / 64).collect();

    group.bench_function("build_index_5k_lines", |b| {
        b.iter(|| LineIndex::new(black_box(&src)))
    });

    let index = LineIndex::new(&src);
    group.bench_function("lookup_64_offsets", |b| {
        b.iter(|| {
            for &o in &offsets {
                black_box(index.locate(black_box(o)).unwrap());
            }
        })
    });

    group.bench_function("locate_all_64_offsets", |b| {
        b.iter(|| locate_all(black_box(&src), black_box(&offsets)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_locating);
criterion_main!(benches);
