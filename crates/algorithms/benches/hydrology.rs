//! Benchmarks for least-cost-path routing and accumulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use runoff_algorithms::hydrology::{
    accumulate_flow, lcp_routing, AccumulationParams, ElevationBand, RoutingParams,
};
use runoff_core::{GeoTransform, Raster};

/// Create a DEM with a basin shape: higher edges sloping toward center outlet
fn create_basin_dem(size: usize) -> Raster<i32> {
    let mut dem = Raster::new(size, size);
    dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
    let center = size as f64 / 2.0;
    for row in 0..size {
        for col in 0..size {
            let dx = col as f64 - center;
            let dy = row as f64 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            // Bowl in decimetres plus noise so ties and pits appear
            let noise = ((row * 7 + col * 13) % 17) as i32;
            dem.set(row, col, (dist * 10.0) as i32 + noise).unwrap();
        }
    }
    dem
}

fn bench_lcp_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydrology/lcp_routing");
    for size in [256, 512, 1024, 2048] {
        let dem = create_basin_dem(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| lcp_routing(black_box(&dem), &RoutingParams::default()).unwrap())
        });
    }
    group.finish();
}

fn bench_lcp_routing_with_flats(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydrology/lcp_routing_flats");
    let params = RoutingParams {
        bands: vec![ElevationBand::new(5)],
    };
    for size in [256, 1024] {
        let dem = create_basin_dem(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| lcp_routing(black_box(&dem), &params).unwrap())
        });
    }
    group.finish();
}

fn bench_accumulate_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydrology/accumulate_flow");
    for size in [256, 512, 1024, 2048] {
        let dem = create_basin_dem(size);
        let routing = lcp_routing(&dem, &RoutingParams::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| accumulate_flow(black_box(&routing), &AccumulationParams::default()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lcp_routing,
    bench_lcp_routing_with_flats,
    bench_accumulate_flow
);
criterion_main!(benches);
