use criterion::{black_box, criterion_group, criterion_main, Criterion};
use letter_cascade::core::{find_words, Dictionary, Grid};
use letter_cascade::engine::{Engine, EngineConfig};
use letter_cascade::types::{GameCommand, GameStatus, TICK_MS};

fn packed_grid() -> Grid {
    Grid::parse(&[
        "CATSDOGS", "ARTEMOON", "TEARSBEE", "SUNHENAX", "DOGCOWRA", "OWLBATPI", "GNUANTEL",
        "SEALRAMS",
    ])
    .unwrap()
}

fn bench_find_words_empty(c: &mut Criterion) {
    let grid = Grid::new(8, 8);
    let dictionary = Dictionary::builtin();

    c.bench_function("find_words_empty_8x8", |b| {
        b.iter(|| find_words(black_box(&grid), black_box(&dictionary)))
    });
}

fn bench_find_words_packed(c: &mut Criterion) {
    let grid = packed_grid();
    let dictionary = Dictionary::builtin();

    c.bench_function("find_words_packed_8x8", |b| {
        b.iter(|| find_words(black_box(&grid), black_box(&dictionary)))
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default(), Dictionary::builtin()).unwrap();
    engine.start();

    c.bench_function("engine_tick_16ms", |b| {
        b.iter(|| {
            if engine.status() == GameStatus::GameOver {
                engine.reset();
                engine.start();
            }
            engine.tick(black_box(TICK_MS));
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default(), Dictionary::builtin()).unwrap();
    engine.start();

    c.bench_function("spawn_and_hard_drop", |b| {
        b.iter(|| {
            if engine.status() == GameStatus::GameOver {
                engine.reset();
                engine.start();
            }
            engine.tick(TICK_MS);
            engine.send(black_box(GameCommand::Drop));
        })
    });
}

criterion_group!(
    benches,
    bench_find_words_empty,
    bench_find_words_packed,
    bench_tick,
    bench_hard_drop
);
criterion_main!(benches);
