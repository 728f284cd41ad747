//! Criterion benchmarks for the per-key hot path: normalizing a raw key
//! signal and feeding it through the hotkey set.
//!
//! Run with:
//! ```bash
//! cargo bench --package keyshare-core --bench normalizer_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyshare_core::{HotkeyAction, HotkeyMatcher, HotkeySet, KeyAction, KeyEvent, KeyPressNormalizer};

fn bench_normalize_tap(c: &mut Criterion) {
    let mut normalizer = KeyPressNormalizer::new("f8");
    let down = KeyEvent::down("x");
    let up = KeyEvent::up("x");

    c.bench_function("normalize_tap", |b| {
        b.iter(|| {
            black_box(normalizer.process(black_box(&down)));
            black_box(normalizer.process(black_box(&up)));
        })
    });
}

fn bench_normalize_auto_repeat(c: &mut Criterion) {
    let mut normalizer = KeyPressNormalizer::new("f8");
    let down = KeyEvent::down("left");
    normalizer.process(&down);

    c.bench_function("normalize_auto_repeat", |b| {
        b.iter(|| black_box(normalizer.process(black_box(&down))))
    });
}

fn bench_hotkey_dispatch(c: &mut Criterion) {
    let mut hotkeys = HotkeySet::new();
    hotkeys.register(HotkeyMatcher::parse("shift+q", || HotkeyAction::Continue));
    hotkeys.register(HotkeyMatcher::parse("ctrl+c", || HotkeyAction::Continue));

    c.bench_function("hotkey_dispatch_miss", |b| {
        b.iter(|| black_box(hotkeys.dispatch(black_box("x"), KeyAction::Press)))
    });
}

criterion_group!(
    benches,
    bench_normalize_tap,
    bench_normalize_auto_repeat,
    bench_hotkey_dispatch
);
criterion_main!(benches);
