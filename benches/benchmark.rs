#![warn(clippy::all)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use m7err::errormap::{error_map, FULL_SCALE};
use m7err::geometry::Geometry;
use m7err::projection::{Precision, Variant};

pub fn criterion_benchmark(c: &mut Criterion) {
  c.bench_function("error_map/240x160", move |b| {
    let g = Geometry::default();
    // error_map returns the whole raster, so use iter_batched to keep the drop
    // out of the measurement.
    b.iter_batched(
      || (),
      |_| error_map(&g, Precision::GBA, Variant::Rounded, FULL_SCALE).unwrap(),
      BatchSize::SmallInput,
    );
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
