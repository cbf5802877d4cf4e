use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timing_search::{Encoding, TimingOracle};
use timing_targets::{ConstantTime, EarlyExit, Spin};

fn bench_measure(c: &mut Criterion) {
    let encoding = Encoding::digits(10).unwrap();
    let close = encoding.parse("0123456780").unwrap();
    let far = encoding.parse("9999999999").unwrap();

    let mut group = c.benchmark_group("timing_oracle_measure");
    group.sample_size(30);

    let leaky = TimingOracle::new(EarlyExit::with_work("0123456789", Spin(100)), 10).unwrap();
    group.bench_function("early_exit_far", |b| {
        b.iter(|| black_box(leaky.measure(black_box(&far)).unwrap().fitness))
    });
    group.bench_function("early_exit_close", |b| {
        b.iter(|| black_box(leaky.measure(black_box(&close)).unwrap().fitness))
    });

    let flat = TimingOracle::new(ConstantTime::new("0123456789"), 10).unwrap();
    group.bench_function("constant_time", |b| {
        b.iter(|| black_box(flat.measure(black_box(&far)).unwrap().fitness))
    });
    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let encoding = Encoding::digits(10).unwrap();
    c.bench_function("to_symbolic", |b| {
        b.iter(|| encoding.to_symbolic(black_box(1_234_567_890)).unwrap())
    });
}

criterion_group!(benches, bench_measure, bench_encoding);
criterion_main!(benches);
