use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use footprint::{extract_footprint, AffineTransform, FootprintConfig, RasterSample};

/// Synthetic raster with a diagonal nodata band, producing a ragged
/// boundary that exercises tracing and simplification.
fn diagonal_sample(size: usize) -> RasterSample {
    let nd = -9999.0;
    let mut data = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            if col + row < size / 4 || col + row > 2 * size - size / 4 {
                data.push(nd);
            } else {
                data.push((row * size + col) as f64);
            }
        }
    }
    let transform = AffineTransform::from_origin(0.0, size as f64 * 0.001, 0.001, -0.001);
    RasterSample::new(data, size, size, Some(nd), transform, 4326).unwrap()
}

/// Fully valid raster, the common fast path.
fn full_sample(size: usize) -> RasterSample {
    let data = vec![1.0; size * size];
    let transform = AffineTransform::from_origin(0.0, size as f64 * 0.001, 0.001, -0.001);
    RasterSample::new(data, size, size, None, transform, 4326).unwrap()
}

fn bench_extract_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_full");
    for size in [64, 256, 1024] {
        let sample = full_sample(size);
        let config = FootprintConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &sample, |b, sample| {
            b.iter(|| extract_footprint(black_box(sample), &config).unwrap());
        });
    }
    group.finish();
}

fn bench_extract_ragged(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_ragged");
    for size in [64, 256, 1024] {
        let sample = diagonal_sample(size);
        let config = FootprintConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &sample, |b, sample| {
            b.iter(|| extract_footprint(black_box(sample), &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extract_full, bench_extract_ragged);
criterion_main!(benches);
