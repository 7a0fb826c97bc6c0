use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lzw_trie::compression::{compress_with, decompress_with, pack_bytes, LzwConfig, OnFull};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn text_like(len: usize) -> Vec<u8> {
    let words: [&[u8]; 8] = [
        b"the ", b"quick ", b"brown ", b"fox ", b"jumps ", b"over ", b"lazy ", b"dog ",
    ];
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = Vec::with_capacity(len + 8);
    while data.len() < len {
        data.extend_from_slice(words[rng.gen_range(0..words.len())]);
    }
    data.truncate(len);
    data
}

fn random(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..len).map(|_| rng.gen()).collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_compress");
    for &size in &[4 * 1024, 64 * 1024, 1024 * 1024] {
        let text = text_like(size);
        let noise = random(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("text", size), &text, |b, data| {
            b.iter(|| compress_with(black_box(data), LzwConfig::default()))
        });
        group.bench_with_input(BenchmarkId::new("random", size), &noise, |b, data| {
            b.iter(|| compress_with(black_box(data), LzwConfig::default()))
        });
        group.bench_with_input(BenchmarkId::new("packed_text", size), &text, |b, data| {
            b.iter(|| pack_bytes(black_box(data), LzwConfig::default()))
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_decompress");
    for config in [
        LzwConfig::default(),
        LzwConfig::new(12, OnFull::Reset).expect("valid width"),
    ] {
        let text = text_like(1024 * 1024);
        let codes = compress_with(&text, config);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("{:?}", config.on_full()), config.max_code_width()),
            &codes,
            |b, codes| b.iter(|| decompress_with(black_box(codes), config).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
