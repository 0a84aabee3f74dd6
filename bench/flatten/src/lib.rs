//! Curves shared by the flattening benchmarks.

use spline::geom::{CircularArc, ConicSegment, CubicBezierSegment};
use spline::math::{point, Angle};

use std::f32::consts::PI;

/// A deterministic mix of cubic bézier curves: loops, cusps, inflections and nearly
/// flat curves, at a few scales.
pub fn generate_bezier_curves() -> Vec<CubicBezierSegment<f32>> {
    let shapes = [
        [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        [(0.0, 0.0), (100.0, 100.0), (0.0, 100.0), (100.0, 0.0)],
        [(0.0, 0.0), (150.0, 100.0), (-50.0, 100.0), (100.0, 0.0)],
        [(0.0, 0.0), (30.0, 40.0), (70.0, -40.0), (100.0, 0.0)],
        [(0.0, 0.0), (40.0, 1.0), (60.0, -1.0), (100.0, 0.0)],
        [(0.0, 0.0), (0.0, 0.0), (100.0, 100.0), (100.0, 100.0)],
    ];

    let mut curves = Vec::new();
    for &scale in &[0.1, 1.0, 10.0] {
        for (i, shape) in shapes.iter().enumerate() {
            let offset = i as f32 * 10.0;
            let p = |(x, y): (f32, f32)| point(x * scale + offset, y * scale - offset);
            curves.push(CubicBezierSegment {
                from: p(shape[0]),
                ctrl1: p(shape[1]),
                ctrl2: p(shape[2]),
                to: p(shape[3]),
            });
        }
    }

    curves
}

/// Conics of the same control polygons with weights ranging from ellipses to hyperbolas.
pub fn generate_conics() -> Vec<ConicSegment<f32>> {
    let mut conics = Vec::new();
    for &scale in &[0.1, 1.0, 10.0] {
        for &weight in &[0.1, 0.5, std::f32::consts::FRAC_1_SQRT_2, 1.0, 2.0, 10.0] {
            conics.push(ConicSegment {
                from: point(0.0, 0.0),
                ctrl: point(50.0 * scale, 100.0 * scale),
                weight,
                to: point(100.0 * scale, 0.0),
            });
        }
    }

    conics
}

/// Arcs of various radii and sweeps, in both directions.
pub fn generate_arcs() -> Vec<CircularArc<f32>> {
    let mut arcs = Vec::new();
    for &radius in &[1.0, 10.0, 100.0, 1000.0] {
        for &sweep in &[PI * 0.25, PI, PI * 2.0, -PI * 1.5] {
            arcs.push(CircularArc {
                center: point(radius, 0.0),
                radius,
                start_angle: Angle::radians(0.3),
                end_angle: Angle::radians(0.3 + sweep),
            });
        }
    }

    arcs
}
