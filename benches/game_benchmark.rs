//! Benchmarks for terrain generation and full game rounds.
//!
//! Round-end passes sweep every tile several times; these are the hot paths.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hexrealm::game::{LandStrategy, TerrainParams};
use hexrealm::{GameConfig, Grid, Session};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_terrain(c: &mut Criterion) {
    let strategies = [
        ("biased", LandStrategy::default()),
        ("uniform", LandStrategy::Uniform),
        ("bordered", LandStrategy::Bordered { probability: 0.5 }),
    ];

    for (name, strategy) in strategies {
        let params = TerrainParams {
            proportion: 0.35,
            strategy,
        };
        c.bench_function(&format!("terrain_{name}_50x30"), |b| {
            b.iter_batched(
                || (Grid::new(50, 30).unwrap(), ChaCha8Rng::seed_from_u64(42)),
                |(mut grid, mut rng)| {
                    grid.generate_terrain(black_box(&params), &mut rng).unwrap();
                    black_box(grid)
                },
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_session_setup(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("session_setup_2p", |b| {
        b.iter(|| black_box(Session::new(black_box(&config), 42).unwrap()));
    });
}

fn bench_round(c: &mut Criterion) {
    let config = GameConfig {
        cols: 50,
        rows: 30,
        players: 4,
        ..GameConfig::default()
    };
    let session = Session::new(&config, 42).unwrap();

    c.bench_function("play_round_4p_50x30", |b| {
        b.iter_batched(
            || session.clone(),
            |mut session| black_box(session.play_round().unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_full_game(c: &mut Criterion) {
    let config = GameConfig {
        players: 4,
        ..GameConfig::default()
    };

    c.bench_function("full_game_4p_50_rounds", |b| {
        b.iter(|| {
            let mut session = Session::new(&config, black_box(7)).unwrap();
            black_box(session.play_rounds(config.rounds).unwrap())
        });
    });
}

criterion_group!(benches, bench_terrain, bench_session_setup, bench_round, bench_full_game);
criterion_main!(benches);
