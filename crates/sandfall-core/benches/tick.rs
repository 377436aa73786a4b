use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::IVec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use sandfall_core::simulation::MaterialId;
use sandfall_core::world::World;

/// Sand and water poured over a stone shelf, with room left to fall
fn busy_world(size: i32) -> World {
    let mut world = World::with_size(size, size).unwrap();
    world.fill_rect(
        IVec2::new(size / 4, size / 4),
        IVec2::new(size * 3 / 4, size / 4),
        MaterialId::STONE,
    );
    world.fill_rect(
        IVec2::new(0, size / 2),
        IVec2::new(size / 2, size - 1),
        MaterialId::SAND,
    );
    world.fill_rect(
        IVec2::new(size / 2 + 1, size / 2),
        IVec2::new(size - 1, size - 1),
        MaterialId::WATER,
    );
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_tick");

    for size in [64, 128, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut world = busy_world(size);
            let mut rng = Xoshiro256StarStar::seed_from_u64(0);
            b.iter(|| world.advance_tick(&mut rng));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
