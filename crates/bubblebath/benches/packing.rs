mod common;

use std::hint::black_box;

use bubblebath::packing::{bubblebath, bubblebath_from_distribution, PackOptions};
use bubblebath::radii::UniformRadius;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DVec2, DVec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

const COUNTS: [usize; 3] = [100, 400, 1600];

fn packing_2d_benches(c: &mut Criterion) {
    let extent = DVec2::new(200.0, 200.0);
    let options = PackOptions::new().with_verbose(false).with_max_tries(2_000);
    let mut group = c.benchmark_group("packing/2d");

    for &count in &COUNTS {
        let radii = common::mixed_radii(count, 0.5);
        group.throughput(common::elements_throughput(count));
        let mut rng = StdRng::seed_from_u64(0xB0B_u64 ^ count as u64);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let spheres = bubblebath(&radii, extent, &options, &mut rng).unwrap();
                black_box(spheres.len());
            });
        });
    }

    group.finish();
}

fn packing_3d_min_distance_benches(c: &mut Criterion) {
    let extent = DVec3::splat(40.0);
    let mut group = c.benchmark_group("packing/3d_min_distance");

    for &min_distance in &[0.0, 0.5, 1.0] {
        let options = PackOptions::new()
            .with_verbose(false)
            .with_max_tries(2_000)
            .with_min_distance(min_distance);
        let radii = common::mixed_radii(400, 0.5);
        group.throughput(common::elements_throughput(radii.len()));
        let mut rng = StdRng::seed_from_u64(0xD15C ^ min_distance.to_bits());

        group.bench_with_input(
            BenchmarkId::from_parameter(min_distance),
            &min_distance,
            |b, _| {
                b.iter(|| {
                    let spheres = bubblebath(&radii, extent, &options, &mut rng).unwrap();
                    black_box(spheres.len());
                });
            },
        );
    }

    group.finish();
}

fn packing_distribution_benches(c: &mut Criterion) {
    let extent = DVec2::new(100.0, 100.0);
    let options = PackOptions::new().with_verbose(false).with_max_tries(1_000);
    let dist = UniformRadius::new(0.5, 2.0).unwrap();
    let mut group = c.benchmark_group("packing/distribution");

    for &phi in &[0.1, 0.2, 0.3] {
        let mut rng = StdRng::seed_from_u64(0xF1 ^ phi.to_bits());
        group.bench_with_input(BenchmarkId::from_parameter(phi), &phi, |b, &phi| {
            b.iter(|| {
                let spheres =
                    bubblebath_from_distribution(&dist, phi, extent, &options, &mut rng).unwrap();
                black_box(spheres.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = packing_2d_benches, packing_3d_min_distance_benches, packing_distribution_benches
}
criterion_main!(benches);
