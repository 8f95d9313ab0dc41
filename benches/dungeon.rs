//! Level generation and field-of-view benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use gloomcrawl::world::{update_fov, Dungeon};

fn generate(c: &mut Criterion) {
    c.bench_function("generate 80x40", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| {
            let mut dungeon = Dungeon::new(80, 40);
            dungeon.generate(&mut rng);
            black_box(dungeon.rooms.len())
        })
    });
}

fn fov(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut dungeon = Dungeon::new(80, 40);
    dungeon.generate(&mut rng);
    let center = dungeon.rooms[0].center();

    c.bench_function("fov range 8", |b| {
        b.iter(|| {
            update_fov(&mut dungeon, center.x, center.y, black_box(8));
            black_box(dungeon.visible_tiles.len())
        })
    });
}

criterion_group!(benches, generate, fov);
criterion_main!(benches);
