use crate::progress::{ProgressTracker, MIN_PROGRESS};
use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::sink::LineSink;
use crate::{normalize_or_zero, LineSegment, Point, Vector};

use core::ops::Range;

#[cfg(test)]
use std::vec::Vec;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Create a curve from its points in order: `[from, ctrl1, ctrl2, to]`.
    #[inline]
    pub fn from_points(points: [Point<S>; 4]) -> Self {
        CubicBezierSegment {
            from: points[0],
            ctrl1: points[1],
            ctrl2: points[2],
            to: points[3],
        }
    }

    #[inline]
    pub fn to_points(&self) -> [Point<S>; 4] {
        [self.from, self.ctrl1, self.ctrl2, self.to]
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// The coefficients `[a, b, c, d]` of the curve in the power basis:
    /// `P(t) = a * t³ + b * t² + c * t + d`.
    pub fn power_basis(&self) -> [Vector<S>; 4] {
        let p0 = self.from.to_vector();
        let p1 = self.ctrl1.to_vector();
        let p2 = self.ctrl2.to_vector();
        let p3 = self.to.to_vector();

        [
            p3 - p2 * S::THREE + p1 * S::THREE - p0,
            p2 * S::THREE - p1 * S::SIX + p0 * S::THREE,
            (p1 - p0) * S::THREE,
            p0,
        ]
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let [a, b, c, d] = self.power_basis();
        sample_power_basis(a, b, c, d, t)
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let [a, b, c, _] = self.power_basis();
        derivative_power_basis(a, b, c, t)
    }

    /// Sample the position and the unit tangent of the curve at t.
    ///
    /// Where the derivative vanishes (for example at `t = 0` when `ctrl1 == from`), the
    /// tangent is the zero vector.
    pub fn evaluate(&self, t: S) -> (Point<S>, Vector<S>) {
        let [a, b, c, d] = self.power_basis();

        (
            sample_power_basis(a, b, c, d, t),
            normalize_or_zero(derivative_power_basis(a, b, c, t)),
        )
    }

    /// Split this curve into two sub-curves.
    ///
    /// Values of `t` outside of `0..1` extrapolate the curve.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);
        let ctrl1aaa = ctrl1aa.lerp(ctrl2aa, t);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> CubicBezierSegment<S> {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> CubicBezierSegment<S> {
        self.split(t).1
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// Returns the line segment between the start and the end of the curve.
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if the curve can't be replaced with its baseline.
    ///
    /// The control points are compared with the points at one third and two thirds of
    /// the baseline, using the manhattan distance. The curve deviates from its baseline
    /// by at most three quarters of the largest of the two distances.
    pub fn is_too_curvy(&self, tolerance: S) -> bool {
        let p1 = self.from.lerp(self.to, S::ONE / S::THREE);
        if (p1.x - self.ctrl1.x).abs() + (p1.y - self.ctrl1.y).abs() > tolerance {
            return true;
        }

        let p2 = self.from.lerp(self.to, S::TWO / S::THREE);
        (p2.x - self.ctrl2.x).abs() + (p2.y - self.ctrl2.y).abs() > tolerance
    }

    /// Approximate the curve with line segments, delivered to a sink.
    ///
    /// The curve is split in halves until each piece passes the flatness test of
    /// [`is_too_curvy`](Self::is_too_curvy), or until a piece covers less than
    /// [`MIN_PROGRESS`] of the parameter range.
    ///
    /// The segments' parameter ranges tile `0..1`. A curve reduced to a single point
    /// produces no segment at all.
    ///
    /// # Panics
    ///
    /// If the endpoints of the curve are NaN.
    pub fn decompose<Sink>(&self, tolerance: S, sink: &mut Sink)
    where
        Sink: LineSink<S> + ?Sized,
    {
        let mut tracker = ProgressTracker::new(self.from, sink);

        decompose_recursive(self, tolerance, S::ONE, &mut tracker);

        tracker.finish(self.to);
    }

    /// Compute a flattened approximation of the curve, invoking a callback at
    /// each step.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    ///
    /// The end of the t parameter range at the final segment is guaranteed to be equal to `1.0`.
    pub fn for_each_flattened_with_t<F>(&self, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        self.decompose(tolerance, callback);
    }

    /// Compute a flattened approximation of the curve, invoking a callback at
    /// each step.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    pub fn for_each_flattened<F>(&self, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>),
    {
        self.decompose(tolerance, &mut |segment: &LineSegment<S>, _: Range<S>| {
            callback(segment)
        });
    }
}

#[inline]
fn sample_power_basis<S: Scalar>(
    a: Vector<S>,
    b: Vector<S>,
    c: Vector<S>,
    d: Vector<S>,
    t: S,
) -> Point<S> {
    (((a * t + b) * t + c) * t + d).to_point()
}

#[inline]
fn derivative_power_basis<S: Scalar>(a: Vector<S>, b: Vector<S>, c: Vector<S>, t: S) -> Vector<S> {
    (a * (S::THREE * t) + b * S::TWO) * t + c
}

fn decompose_recursive<S, Sink>(
    curve: &CubicBezierSegment<S>,
    tolerance: S,
    progress: S,
    tracker: &mut ProgressTracker<S, Sink>,
) where
    S: Scalar,
    Sink: LineSink<S> + ?Sized,
{
    if progress < S::value(MIN_PROGRESS) || !curve.is_too_curvy(tolerance) {
        tracker.add_point(curve.to, progress);
        return;
    }

    let (left, right) = curve.split(S::HALF);
    let half = progress * S::HALF;

    decompose_recursive(&left, tolerance, half, tracker);
    decompose_recursive(&right, tolerance, half, tracker);
}

impl<S: Scalar> Segment for CubicBezierSegment<S> {
    impl_segment!(S);
}

#[cfg(test)]
fn collect_flattened(
    curve: &CubicBezierSegment<f32>,
    tolerance: f32,
) -> Vec<(LineSegment<f32>, Range<f32>)> {
    let mut segments = Vec::new();
    curve.for_each_flattened_with_t(tolerance, &mut |s, t| {
        segments.push((*s, t));
    });

    segments
}

#[cfg(test)]
fn test_curves() -> Vec<CubicBezierSegment<f32>> {
    use crate::point;

    std::vec![
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 0.0),
            ctrl2: point(1.0, 1.0),
            to: point(0.0, 1.0),
        },
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(100.0, 0.0),
            ctrl2: point(0.0, 100.0),
            to: point(100.0, 100.0),
        },
        CubicBezierSegment {
            from: point(141.0, 135.0),
            ctrl1: point(141.0, 130.0),
            ctrl2: point(140.0, 130.0),
            to: point(131.0, 130.0),
        },
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 0.0),
            ctrl2: point(50.0, 70.0),
            to: point(100.0, 100.0),
        },
        CubicBezierSegment {
            from: point(11.71726, 9.07143),
            ctrl1: point(1.889879, 13.22917),
            ctrl2: point(18.142855, 19.27679),
            to: point(18.142855, 19.27679),
        },
        // A cusp.
        CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(100.0, 100.0),
            ctrl2: point(0.0, 100.0),
            to: point(100.0, 0.0),
        },
    ]
}

#[test]
fn evaluate_endpoints() {
    for curve in &test_curves() {
        let (start, _) = curve.evaluate(0.0);
        assert_eq!(start, curve.from);

        let (end, _) = curve.evaluate(1.0);
        assert!((end - curve.to).length() < 1e-3, "{:?} != {:?}", end, curve.to);
    }
}

#[test]
fn evaluate_tangent() {
    use crate::{point, vector};

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(2.0, 0.0),
        to: point(3.0, 0.0),
    };

    for &t in &[0.0, 0.25, 0.5, 1.0] {
        let (position, tangent) = curve.evaluate(t);
        assert!((position - point(3.0 * t, 0.0)).length() < 1e-5);
        assert!((tangent - vector(1.0, 0.0)).length() < 1e-5);
    }

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 10.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };
    let (_, tangent) = curve.evaluate(0.0);
    assert!((tangent - vector(0.0, 1.0)).length() < 1e-5);
    let (_, tangent) = curve.evaluate(0.5);
    assert!((tangent - vector(1.0, 0.0)).length() < 1e-5);
    let (_, tangent) = curve.evaluate(1.0);
    assert!((tangent - vector(0.0, -1.0)).length() < 1e-5);
}

#[test]
fn evaluate_degenerate_tangent() {
    use crate::point;

    let p = point(3.0f32, 4.0);
    let curve = CubicBezierSegment {
        from: p,
        ctrl1: p,
        ctrl2: p,
        to: p,
    };

    let (position, tangent) = curve.evaluate(0.5);
    assert_eq!(position, p);
    assert_eq!(tangent.length(), 0.0);
}

#[test]
fn sample_matches_bernstein_form() {
    for curve in &test_curves() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let one_t = 1.0 - t;
            let expected = curve.from.to_vector() * (one_t * one_t * one_t)
                + curve.ctrl1.to_vector() * (3.0 * one_t * one_t * t)
                + curve.ctrl2.to_vector() * (3.0 * one_t * t * t)
                + curve.to.to_vector() * (t * t * t);

            assert!((curve.sample(t).to_vector() - expected).length() < 1e-3);
        }
    }
}

#[test]
fn split_is_continuous() {
    for curve in &test_curves() {
        for &t in &[0.1, 0.25, 0.5, 0.7, 0.9] {
            let (left, right) = curve.split(t);
            let expected = curve.sample(t);

            assert_eq!(left.to, right.from);
            assert_eq!(left.from, curve.from);
            assert_eq!(right.to, curve.to);

            let (a, _) = left.evaluate(1.0);
            let (b, _) = right.evaluate(0.0);
            assert!((a - expected).length() < 1e-3);
            assert!((b - expected).length() < 1e-3);

            // The halves cover the original curve.
            assert!((left.sample(0.5) - curve.sample(t * 0.5)).length() < 1e-3);
            assert!((right.sample(0.5) - curve.sample(t + (1.0 - t) * 0.5)).length() < 1e-3);
        }
    }
}

#[test]
fn flattened_ranges_tile_unit_interval() {
    for curve in &test_curves() {
        for &tolerance in &[1.0, 0.25, 0.1, 0.01, 0.001] {
            let segments = collect_flattened(curve, tolerance);

            assert!(!segments.is_empty());
            assert_eq!(segments[0].0.from, curve.from);
            assert_eq!(segments[0].1.start, 0.0);
            for pair in segments.windows(2) {
                assert_eq!(pair[0].1.end, pair[1].1.start);
                assert_eq!(pair[0].0.to, pair[1].0.from);
                assert!(pair[0].1.start < pair[0].1.end);
            }
            let last = segments.last().unwrap();
            assert_eq!(last.0.to, curve.to);
            assert_eq!(last.1.end, 1.0);
        }
    }
}

#[test]
fn flattened_within_tolerance() {
    for curve in &test_curves() {
        for &tolerance in &[1.0, 0.1, 0.01] {
            for (segment, t) in collect_flattened(curve, tolerance) {
                for i in 0..=8 {
                    let s = t.start + (t.end - t.start) * (i as f32 / 8.0);
                    let d = segment.distance_to_point(curve.sample(s));
                    assert!(d <= tolerance, "{:?} is {} away from {:?}", s, d, segment);
                }
            }
        }
    }
}

#[test]
fn flattening_straight_line() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(10.0, 10.0),
        ctrl2: point(20.0, 20.0),
        to: point(30.0, 30.0),
    };

    let segments = collect_flattened(&curve, 0.01);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].0, curve.baseline());
    assert_eq!(segments[0].1, 0.0..1.0);
}

#[test]
fn flattening_a_point() {
    use crate::point;

    let p = point(1.0f32, 2.0);
    let curve = CubicBezierSegment {
        from: p,
        ctrl1: p,
        ctrl2: p,
        to: p,
    };

    for &tolerance in &[1.0, 0.01, 0.0001] {
        assert!(collect_flattened(&curve, tolerance).is_empty());
    }
}

#[test]
fn flattening_zero_tolerance_terminates() {
    let curve = test_curves()[1];

    let segments = collect_flattened(&curve, 0.0);
    // Pieces stop being split once they cover less than the minimum progress.
    assert!(segments.len() <= 2048);
    assert!(segments.len() >= 1024);
    assert_eq!(segments.last().unwrap().1.end, 1.0);
}

#[test]
fn flatten_end() {
    use crate::point;

    let segment = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(100.0, 0.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 200.0),
    };

    let mut last = segment.from;
    segment.for_each_flattened(0.0001, &mut |s| {
        last = s.to;
    });

    assert_eq!(last, segment.to);
}

#[test]
fn issue_652() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(-1061.0f32, -3327.0),
        ctrl1: point(-1061.0, -3177.0),
        ctrl2: point(-1061.0, -3477.0),
        to: point(-1061.0, -3327.0),
    };

    for &tolerance in &[1.0, 0.1, 0.01] {
        let segments = collect_flattened(&curve, tolerance);
        assert!(segments.len() > 1);
        assert_eq!(segments.last().unwrap().1.end, 1.0);
    }
}

#[test]
fn flatten_f64() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(100.0, 0.0),
        ctrl2: point(100.0, 100.0),
        to: point(0.0, 100.0),
    };

    let mut end = 0.0;
    let mut count = 0;
    curve.for_each_flattened_with_t(0.05, &mut |s, t| {
        assert_eq!(t.start, end);
        end = t.end;
        count += 1;
        for i in 0..=4 {
            let p = curve.sample(t.start + (t.end - t.start) * (i as f64 / 4.0));
            assert!(s.distance_to_point(p) <= 0.05);
        }
    });

    assert_eq!(end, 1.0);
    assert!(count > 8);
}

#[test]
fn segment_trait_object_callback() {
    let curve = test_curves()[0];
    let mut count = 0;
    Segment::for_each_flattened_with_t(&curve, 0.01, &mut |_, _| count += 1);
    assert_eq!(count, collect_flattened(&curve, 0.01).len());
}
