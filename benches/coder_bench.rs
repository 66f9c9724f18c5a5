use arith::{BitReader, BitWriter, Decoder, Encoder};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_adaptive(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive");
    // Mildly skewed byte-like source, 10k symbols.
    let input: Vec<usize> = (0..10_000).map(|i| (i * i + i / 5) % 256).collect();

    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut enc = Encoder::<_, 16>::new(256, BitWriter::new()).unwrap();
            for &s in &input {
                enc.encode(s).unwrap();
            }
            enc.flush().unwrap();
            enc.into_writer().finish()
        })
    });

    let mut enc = Encoder::<_, 16>::new(256, BitWriter::new()).unwrap();
    for &s in &input {
        enc.encode(s).unwrap();
    }
    enc.flush().unwrap();
    let bytes = enc.into_writer().finish();

    group.bench_function("decode", |b| {
        b.iter(|| {
            let mut dec = Decoder::<_, 16>::new(256, BitReader::new(&bytes)).unwrap();
            for _ in 0..input.len() {
                dec.decode().unwrap();
            }
        })
    });
}

fn bench_cost_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    let input: Vec<usize> = (0..1_000).map(|i| (i * 31 + 11) % 64).collect();

    group.bench_function("bounded_probe", |b| {
        let mut enc = Encoder::<_, 16>::new(64, BitWriter::new()).unwrap();
        b.iter(|| {
            let state = enc.save_state();
            let cost = enc
                .estimate_cost_bounded(input.iter().copied(), u64::MAX)
                .unwrap();
            enc.restore_state(state);
            cost
        })
    });
}

criterion_group!(benches, bench_adaptive, bench_cost_estimation);
criterion_main!(benches);
