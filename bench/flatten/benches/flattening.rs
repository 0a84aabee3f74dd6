#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use spline::geom::{CircularArc, ConicSegment, CubicBezierSegment};
use spline_bench::*;

const N: usize = 1;

static TOLERANCES: [f32; 6] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0];

fn bench_flatten_cubic(curves: &[CubicBezierSegment<f32>], tolerance: f32) {
    for _ in 0..N {
        for curve in curves {
            curve.for_each_flattened_with_t(tolerance, &mut |seg, t| {
                criterion::black_box((seg, t));
            });
        }
    }
}

fn bench_flatten_conic(conics: &[ConicSegment<f32>], tolerance: f32) {
    for _ in 0..N {
        for conic in conics {
            conic.for_each_flattened_with_t(tolerance, &mut |seg, t| {
                criterion::black_box((seg, t));
            });
        }
    }
}

fn bench_arc_to_cubics(arcs: &[CircularArc<f32>], tolerance: f32) {
    for _ in 0..N {
        for arc in arcs {
            let _ = arc.for_each_cubic_bezier(tolerance, &mut |curve| {
                criterion::black_box(curve);
                true
            });
        }
    }
}

fn bench_flatten_arc(arcs: &[CircularArc<f32>], tolerance: f32) {
    for _ in 0..N {
        for arc in arcs {
            let _ = arc.for_each_flattened_with_t(tolerance, &mut |seg, t| {
                criterion::black_box((seg, t));
            });
        }
    }
}

fn cubic_flatten(c: &mut Criterion) {
    let curves = generate_bezier_curves();
    let mut g = c.benchmark_group("cubic");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("recursive", tol), tol, |b, tol| {
            b.iter(|| bench_flatten_cubic(&curves, *tol))
        });
    }
}

fn conic_flatten(c: &mut Criterion) {
    let conics = generate_conics();
    let mut g = c.benchmark_group("conic");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("midpoint", tol), tol, |b, tol| {
            b.iter(|| bench_flatten_conic(&conics, *tol))
        });
    }
}

fn arc_decompose(c: &mut Criterion) {
    let arcs = generate_arcs();
    let mut g = c.benchmark_group("arc");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("cubics", tol), tol, |b, tol| {
            b.iter(|| bench_arc_to_cubics(&arcs, *tol))
        });
        g.bench_with_input(BenchmarkId::new("flattened", tol), tol, |b, tol| {
            b.iter(|| bench_flatten_arc(&arcs, *tol))
        });
    }
}

criterion_group!(flatten, cubic_flatten, conic_flatten, arc_decompose);

criterion_main!(flatten);
