use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use vizij_keyframe_core::{InterpRegistry, Keyframe, KeyframeAnimation, RectF, Value};

fn make_anim(keys: usize, value: impl Fn(usize) -> Value) -> KeyframeAnimation {
    let mut anim = KeyframeAnimation::with_registry(Arc::new(InterpRegistry::new()));
    anim.set_duration(10_000).unwrap();
    anim.set_key_values((0..keys).map(|i| Keyframe::new(i as f64 / (keys - 1) as f64, value(i))))
        .unwrap();
    anim
}

fn bench_step(c: &mut Criterion) {
    // Small steps stay inside the cached interval most of the time.
    let mut anim = make_anim(64, |i| Value::Double(i as f64));
    let mut t = 0i64;
    c.bench_function("keyframe_step_double_64", |b| {
        b.iter(|| {
            t = (t + 1) % 10_000;
            anim.on_time_advanced(black_box(t));
        })
    });

    // Large jumps force a re-bracket on nearly every tick.
    let mut anim = make_anim(1024, |i| Value::Double(i as f64));
    let mut t = 0i64;
    c.bench_function("keyframe_seek_double_1024", |b| {
        b.iter(|| {
            t = (t + 3_779) % 10_000;
            anim.on_time_advanced(black_box(t));
        })
    });

    let mut anim = make_anim(16, |i| {
        let f = i as f64;
        Value::RectF(RectF::new(f, f, 10.0 + f, 10.0 + f))
    });
    let mut t = 0i64;
    c.bench_function("keyframe_step_rectf_16", |b| {
        b.iter(|| {
            t = (t + 7) % 10_000;
            anim.on_time_advanced(black_box(t));
        })
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
