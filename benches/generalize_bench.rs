use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_generalize::{Dataset, Feature, Generalizer};
use geo_types::{LineString, Polygon};

/// An n x n grid of adjacent unit squares, each interior edge shared by two
/// features.
fn generate_grid(n: usize) -> Dataset {
    let mut ds = Dataset::new(None, vec![]);
    for row in 0..n {
        for col in 0..n {
            let (x, y) = (col as f64, row as f64);
            ds.push(Feature {
                geometry: Polygon::new(
                    LineString::from(vec![
                        (x, y),
                        (x + 1.0, y),
                        (x + 1.0, y + 1.0),
                        (x, y + 1.0),
                        (x, y),
                    ]),
                    vec![],
                ),
                values: vec![],
            });
        }
    }
    ds
}

fn bench_generalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("generalize");
    group.sample_size(10);

    for size in [4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("grid", size), size, |b, &size| {
            let ds = generate_grid(size);
            b.iter(|| {
                let out = Generalizer::new(0.05).run(&ds).expect("run failed");
                assert_eq!(out.len(), size * size);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generalize);
criterion_main!(benches);
