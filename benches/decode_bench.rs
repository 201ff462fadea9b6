use criterion::{black_box, criterion_group, criterion_main, Criterion};

use uplc_flat::{decode_from_hex, decode_program, encode_program, BuiltinFunction, Program, Term, Version};

/// Left-nested application chain of `depth` integer arguments
fn sample_program(depth: u64) -> Vec<u8> {
    let term = (0..depth).fold(Term::builtin(BuiltinFunction::AddInteger), |acc, n| {
        acc.apply(Term::constant(i64::try_from(n * 7919).unwrap_or(i64::MAX)))
    });
    encode_program(&Program::new(Version::V1_0_0, term)).unwrap()
}

fn decode_small_bench(c: &mut Criterion) {
    let bytes = sample_program(8);
    c.bench_function("decode_program_small", |b| {
        b.iter(|| decode_program(black_box(&bytes)).unwrap())
    });
}

fn decode_large_bench(c: &mut Criterion) {
    let bytes = sample_program(900);
    c.bench_function("decode_program_large", |b| {
        b.iter(|| decode_program(black_box(&bytes)).unwrap())
    });
}

fn decode_wrapped_hex_bench(c: &mut Criterion) {
    let hex = "56550500023371c911071a5f783625ee8c004838b40181";
    c.bench_function("decode_from_hex_wrapped", |b| {
        b.iter(|| decode_from_hex(black_box(hex)).unwrap())
    });
}

criterion_group! {
    name = decode_benches;
    config = Criterion::default();
    targets = decode_small_bench, decode_large_bench, decode_wrapped_hex_bench
}

criterion_main!(decode_benches);
