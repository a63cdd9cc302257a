use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fx3_mcprotocol::{parse_symbol, Codec, CpuModel, Device, Encoding};

fn ascii_response(words: usize) -> Vec<u8> {
    let mut frame = b"8100".to_vec();
    for i in 0..words {
        frame.extend_from_slice(format!("{:02X}{:02X}", i & 0xFF, i >> 8).as_bytes());
    }
    frame
}

fn bench_symbols(c: &mut Criterion) {
    c.bench_function("parse_symbol", |b| {
        b.iter(|| parse_symbol(black_box(" m8000 ")))
    });
    c.bench_function("validate_fx3u", |b| {
        let profile = CpuModel::FX3U.profile();
        b.iter(|| profile.validate(black_box(Device::D), black_box(100), black_box(64)))
    });
}

fn bench_ascii(c: &mut Criterion) {
    let codec = Encoding::Ascii.codec();
    let response = ascii_response(64);
    let values: Vec<u16> = (0..64).collect();

    c.bench_function("ascii_build_read_words", |b| {
        b.iter(|| codec.build_read_words(black_box(Device::D), black_box(100), black_box(64)))
    });
    c.bench_function("ascii_parse_read_words_64", |b| {
        b.iter(|| codec.parse_read_words(black_box(&response), 64))
    });
    c.bench_function("ascii_build_write_words_64", |b| {
        b.iter(|| codec.build_write_words(Device::D, 100, black_box(&values)))
    });
}

fn bench_binary(c: &mut Criterion) {
    let codec = Encoding::Binary.codec();
    let mut response = vec![0x81, 0x00, 0x00, 0x00];
    response.extend((0..126u8).map(|b| b.wrapping_mul(7)));

    c.bench_function("binary_build_read_words", |b| {
        b.iter(|| codec.build_read_words(black_box(Device::D), black_box(100), black_box(64)))
    });
    c.bench_function("binary_parse_read_words_64", |b| {
        b.iter(|| codec.parse_read_words(black_box(&response), 64))
    });
}

criterion_group!(benches, bench_symbols, bench_ascii, bench_binary);
criterion_main!(benches);
