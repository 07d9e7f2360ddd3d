//! Performance benchmarks for the inf unit build pipeline.
//!
//! - Scripts: the scripts under `test_scripts/`
//! - Generated: long constant-only and symbolic-only sources
//! - Evaluation: running a built symbolic function
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to record the scanner, parser
//! and compiler scopes into puffin frames and print a frame summary:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use inf::{IntKind, Integer, Unit, Value};
use std::fmt::Write as _;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Print the number of recorded frames and their average span and scope count.
#[cfg(feature = "profile-with-puffin")]
fn print_frame_summary() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let (mut frames, mut span_ns, mut scopes) = (0u64, 0i64, 0usize);
    for frame in view.recent_frames() {
        let meta = frame.meta();
        frames += 1;
        span_ns += meta.range_ns.1 - meta.range_ns.0;
        scopes += meta.num_scopes;
    }
    if frames == 0 {
        return;
    }
    println!(
        "puffin: {frames} frames, {:?} avg span, {} scopes per frame",
        std::time::Duration::from_nanos((span_ns / frames as i64).max(0) as u64),
        scopes as u64 / frames
    );
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_frame_summary() {}

/// `count` constant statements mixing every operator and several widths.
fn constant_source(count: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        let _ = writeln!(source, "({i}u32 + 7u8) * 3 - -{i} / 2 % 5;");
    }
    source
}

/// `count` symbolic statements over the parameters `a` and `b`.
fn symbolic_source(count: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        let _ = writeln!(source, "(a + {i}i32) * b - -a % 7i32;");
    }
    source
}

fn build(name: &str, parameters: &[(&str, IntKind)], source: &str) -> Unit {
    let mut unit = Unit::new();
    unit.declare_global("limit", Integer::from(1000i32)).unwrap();
    unit.add_source_with_parameters(name, parameters, source).unwrap();
    let _ = unit.build();
    unit
}

/// Benchmark building the test scripts.
fn script_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("unit/scripts");
    let scripts = [
        ("constants", include_str!("../test_scripts/constants.inf")),
        ("promotion", include_str!("../test_scripts/promotion.inf")),
        ("errors", include_str!("../test_scripts/errors.inf")),
        ("symbolic", include_str!("../test_scripts/symbolic.inf")),
    ];
    let parameters = [("a", IntKind::I32), ("b", IntKind::I32)];

    for (name, source) in scripts {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let unit = build(name, &parameters, black_box(source));
                end_profiling_frame();
                black_box(unit.function_count())
            });
        });
    }

    group.finish();
}

/// Benchmark building long generated sources.
fn generated_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit/generated");
    let parameters = [("a", IntKind::I32), ("b", IntKind::I32)];

    for count in [100, 1000, 5000] {
        let constants = constant_source(count);
        group.throughput(Throughput::Bytes(constants.len() as u64));
        group.bench_function(format!("constants_{count}"), |b| {
            b.iter(|| {
                let unit = build("constants", &[], black_box(&constants));
                end_profiling_frame();
                black_box(unit.function_count())
            });
        });

        let symbolic = symbolic_source(count);
        group.throughput(Throughput::Bytes(symbolic.len() as u64));
        group.bench_function(format!("symbolic_{count}"), |b| {
            b.iter(|| {
                let unit = build("symbolic", &parameters, black_box(&symbolic));
                end_profiling_frame();
                black_box(unit.function_count())
            });
        });
    }

    group.finish();
}

/// Benchmark evaluating a built function.
fn evaluation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit/evaluate");
    let parameters = [("a", IntKind::I32), ("b", IntKind::I32)];

    for count in [100, 1000] {
        let mut unit = build("symbolic", &parameters, &symbolic_source(count));
        group.bench_function(format!("symbolic_{count}"), |b| {
            b.iter(|| {
                let values = unit
                    .evaluate("symbolic", black_box(&[Value::I32(3), Value::I32(4)]))
                    .unwrap();
                end_profiling_frame();
                black_box(values.len())
            });
        });
    }

    group.finish();
    print_frame_summary();
}

criterion_group!(
    benches,
    script_benchmarks,
    generated_benchmarks,
    evaluation_benchmarks
);
criterion_main!(benches);
