//! printf engine benchmarks.
//!
//! Measures directive parsing, integer rendering, and whole-template
//! formatting through the capped-buffer entry.

use criterion::{criterion_group, criterion_main, Criterion};
use printf_rs_core::{parse_specifier, snprintf, Arg};

fn bench_parse_directive(c: &mut Criterion) {
    c.bench_function("parse_plain", |b| {
        b.iter(|| criterion::black_box(parse_specifier(criterion::black_box(b"d"))));
    });
    c.bench_function("parse_loaded", |b| {
        b.iter(|| criterion::black_box(parse_specifier(criterion::black_box(b"-+ #012.7llx"))));
    });
    c.bench_function("parse_positional", |b| {
        b.iter(|| criterion::black_box(parse_specifier(criterion::black_box(b"1$*2$.*3$d"))));
    });
}

fn bench_render_integers(c: &mut Criterion) {
    let mut buf = [0u8; 64];
    c.bench_function("render_decimal", |b| {
        b.iter(|| {
            criterion::black_box(snprintf(
                &mut buf,
                64,
                b"%d",
                &[Arg::Int(criterion::black_box(-1234567890))],
            ))
        });
    });
    c.bench_function("render_hex_padded", |b| {
        b.iter(|| {
            criterion::black_box(snprintf(
                &mut buf,
                64,
                b"%#018x",
                &[Arg::Uint(criterion::black_box(0xdead_beef_u64))],
            ))
        });
    });
}

fn bench_whole_template(c: &mut Criterion) {
    let mut buf = [0u8; 256];
    let args = [
        Arg::Int(42),
        Arg::Str(Some(b"benchmark")),
        Arg::Uint(0xffff),
        Arg::Ptr(0x7fff_0000),
    ];
    c.bench_function("template_mixed", |b| {
        b.iter(|| {
            criterion::black_box(snprintf(
                &mut buf,
                256,
                b"id=%08d name=%-12s mask=%#x at %p\n",
                criterion::black_box(&args),
            ))
        });
    });

    let positional = [Arg::Str(Some(b"world")), Arg::Str(Some(b"hello"))];
    c.bench_function("template_positional", |b| {
        b.iter(|| {
            criterion::black_box(snprintf(
                &mut buf,
                256,
                b"%2$s %1$s",
                criterion::black_box(&positional),
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_parse_directive,
    bench_render_integers,
    bench_whole_template
);
criterion_main!(benches);
