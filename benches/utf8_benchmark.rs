use criterion::{black_box, criterion_group, criterion_main, Criterion};

use websocket_payload::{is_valid_utf8, Utf8StreamValidator};

fn validation(c: &mut Criterion) {
    let ascii = "Hello, world! ".repeat(4096);
    let mixed = "h\u{e9}llo \u{20ac} \u{1F600} \u{65e5}\u{672c} ".repeat(2048);
    c.bench_function("utf8 ascii", |b| b.iter(|| {
        black_box(is_valid_utf8(black_box(ascii.as_bytes())))
    }));
    c.bench_function("utf8 mixed", |b| b.iter(|| {
        black_box(is_valid_utf8(black_box(mixed.as_bytes())))
    }));
    c.bench_function("utf8 mixed streamed", |b| b.iter(|| {
        let mut v = Utf8StreamValidator::new();
        for chunk in black_box(mixed.as_bytes()).chunks(1000) {
            let _ = v.add_data(chunk);
        }
        black_box(v.finish())
    }));
}

criterion_group!{
    name = benches;
    config = Criterion::default().significance_level(0.02);
    targets = validation
}
criterion_main!(benches);
