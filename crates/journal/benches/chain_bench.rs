//! Performance benchmarks for version chain operations
//!
//! Run with: cargo bench --package rcs-journal

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rcs_journal::{VersionRecord, VersionedFile};
use tempfile::TempDir;

/// A ~200 line document with one line edited per revision
fn revision(n: usize) -> String {
    let mut text = String::new();
    for line in 0..200 {
        if line == n % 200 {
            text.push_str(&format!("line {} edited in revision {}\n", line, n));
        } else {
            text.push_str(&format!("line {} unchanged\n", line));
        }
    }
    text
}

fn bench_commit(c: &mut Criterion) {
    c.bench_function("record_commit", |b| {
        b.iter_with_setup(
            || {
                let mut record = VersionRecord::empty();
                record.commit(&revision(0), "base", 0.0).unwrap();
                record
            },
            |mut record| {
                let id = record.commit(&revision(1), "edit", 1.0).unwrap();
                black_box(id);
            },
        );
    });
}

fn bench_reconstruct_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_oldest");

    for depth in [10usize, 100, 500] {
        let mut record = VersionRecord::empty();
        let oldest = record.commit(&revision(0), "r0", 0.0).unwrap();
        for n in 1..depth {
            record.commit(&revision(n), "edit", n as f64).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let text = record.reconstruct(oldest.as_str()).unwrap();
                black_box(text);
            });
        });
    }

    group.finish();
}

fn bench_put_roundtrip(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let file = VersionedFile::open(temp_dir.path().join("bench.txt"));
    for n in 0..50 {
        file.put(&revision(n), "seed").unwrap();
    }

    let mut n = 50;
    c.bench_function("file_put_50_deep", |b| {
        b.iter(|| {
            n += 1;
            let id = file.put(&revision(n), "bench").unwrap();
            black_box(id);
        });
    });
}

criterion_group!(benches, bench_commit, bench_reconstruct_depth, bench_put_roundtrip);
criterion_main!(benches);
