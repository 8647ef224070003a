use criterion::{criterion_group, criterion_main, Criterion};
use backtracker_mazes::{cells::GridCoordinate, generators, grid::Grid, pathing};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_32", |b| {
        b.iter(|| generators::build(32, Some(1)).unwrap())
    });
}

fn bench_recursive_backtracker_maze_128(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_128", |b| {
        b.iter(|| generators::build(128, Some(1)).unwrap())
    });
}

fn bench_carving_steps_55(c: &mut Criterion) {
    c.bench_function("carving_steps_55", |b| {
        b.iter(|| {
            let mut g = Grid::new(55).unwrap();
            let rng = XorShiftRng::seed_from_u64(1);
            generators::recursive_backtracker(&mut g, rng, GridCoordinate::new(0, 0), None)
                .unwrap()
                .count()
        })
    });
}

fn bench_longest_path_64(c: &mut Criterion) {
    let g = generators::build(64, Some(1)).unwrap();
    c.bench_function("longest_path_64", move |b| b.iter(|| pathing::longest_path(&g)));
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_128,
    bench_carving_steps_55,
    bench_longest_path_64
);
criterion_main!(benches);
