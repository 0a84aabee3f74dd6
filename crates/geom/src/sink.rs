//! Receivers for the output of the decomposition algorithms.
//!
//! Closures implement both traits. Other types can implement them to receive the output
//! directly, for example to build a polyline:
//!
//! ```
//! use spline_geom::{point, CubicBezierSegment, LineSegment, LineSink, Point};
//! use std::ops::Range;
//!
//! struct Polyline {
//!     points: Vec<Point<f32>>,
//! }
//!
//! impl LineSink<f32> for Polyline {
//!     fn line_segment(&mut self, segment: &LineSegment<f32>, _t: Range<f32>) {
//!         self.points.push(segment.to);
//!     }
//! }
//!
//! let curve = CubicBezierSegment {
//!     from: point(0.0, 0.0),
//!     ctrl1: point(50.0, 0.0),
//!     ctrl2: point(100.0, 50.0),
//!     to: point(100.0, 100.0),
//! };
//!
//! let mut polyline = Polyline { points: vec![curve.from] };
//! curve.decompose(0.1, &mut polyline);
//!
//! assert!(polyline.points.len() > 2);
//! assert_eq!(polyline.points.last(), Some(&curve.to));
//! ```

use crate::{CubicBezierSegment, LineSegment};

use core::ops::Range;

/// Receives the line segments produced by flattening a curve.
///
/// Segments arrive in increasing parameter order. `t` is the range of the original
/// curve's parameter covered by the segment.
pub trait LineSink<S> {
    fn line_segment(&mut self, segment: &LineSegment<S>, t: Range<S>);
}

impl<S, F> LineSink<S> for F
where
    F: FnMut(&LineSegment<S>, Range<S>) + ?Sized,
{
    #[inline]
    fn line_segment(&mut self, segment: &LineSegment<S>, t: Range<S>) {
        self(segment, t)
    }
}

/// Receives the cubic bézier curves approximating an arc.
///
/// Returning `false` stops the decomposition: no other curve is emitted afterwards.
pub trait CurveSink<S> {
    fn cubic_bezier(&mut self, curve: &CubicBezierSegment<S>) -> bool;
}

impl<S, F> CurveSink<S> for F
where
    F: FnMut(&CubicBezierSegment<S>) -> bool + ?Sized,
{
    #[inline]
    fn cubic_bezier(&mut self, curve: &CubicBezierSegment<S>) -> bool {
        self(curve)
    }
}
