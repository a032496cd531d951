use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drum_sequencer::{
    Catalogue, DrumMachine, EngineConfig, InstrumentId, NullEmitter, Pattern, builtin_catalogue,
};
use std::sync::Arc;

/// Benchmark the lookahead poll at several tempos (runs every few ms on the scheduler thread)
fn bench_scheduler_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_poll");

    for tempo in [120.0, 480.0, 960.0] {
        let mut machine = DrumMachine::new(EngineConfig::default(), Arc::new(NullEmitter)).unwrap();
        machine.select_pattern("afrohouse").unwrap();
        machine.set_tempo(tempo).unwrap();
        let mut scheduler = machine.scheduler();
        machine.play();

        group.bench_with_input(BenchmarkId::from_parameter(tempo), &tempo, |b, _| {
            let mut now = 0.0;
            b.iter(|| {
                now += 0.005;
                black_box(scheduler.poll(black_box(now)));
            });
        });
    }
    group.finish();
}

/// Benchmark step activation lookups (read on every scheduled step)
fn bench_step_lookup(c: &mut Criterion) {
    let pattern = Pattern::silent("bench", 0, 32).unwrap();
    for i in (0..32).step_by(3) {
        pattern.set_step_active(i, InstrumentId::Hat, true).unwrap();
    }

    c.bench_function("step_active_instruments", |b| {
        b.iter(|| {
            let mut count = 0;
            for step in pattern.steps() {
                count += step.active_instruments().count();
            }
            black_box(count)
        });
    });
}

/// Benchmark catalogue parsing and validation (startup and restore path)
fn bench_catalogue(c: &mut Criterion) {
    let json = builtin_catalogue().unwrap().to_json().unwrap();

    c.bench_function("catalogue_parse", |b| {
        b.iter(|| black_box(Catalogue::from_json(black_box(&json)).unwrap()));
    });

    let catalogue = Catalogue::from_json(&json).unwrap();
    c.bench_function("catalogue_load", |b| {
        b.iter(|| black_box(catalogue.load().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_scheduler_poll,
    bench_step_lookup,
    bench_catalogue
);
criterion_main!(benches);
