//! Conics, also known as rational quadratic bézier curves.

use crate::progress::{ProgressTracker, MIN_PROGRESS};
use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::sink::LineSink;
use crate::{normalize_or_zero, point, LineSegment, Point, Vector};

use core::ops::Range;

#[cfg(test)]
use std::vec::Vec;

/// A quadratic bézier curve with a weight on its control point.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = ((1 - t)² * from + 2 * (1 - t) * t * weight * ctrl + t² * to) / ((1 - t)² + 2 * (1 - t) * t * weight + t²)```
///
/// A weight of 1 gives a regular quadratic bézier curve. Weights below 1 give arcs of
/// ellipses, in particular `cos(angle / 2)` gives an exact circular arc of `angle`
/// radians when the control point is at the intersection of the tangents. Weights above
/// 1 give arcs of hyperbolas.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ConicSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub weight: S,
    pub to: Point<S>,
}

impl<S: Scalar> ConicSegment<S> {
    #[inline]
    pub fn new(from: Point<S>, ctrl: Point<S>, weight: S, to: Point<S>) -> Self {
        debug_assert!(weight >= S::ZERO, "Negative conic weight {:?}", weight);
        ConicSegment {
            from,
            ctrl,
            weight,
            to,
        }
    }

    /// A conic with a weight of one, which is the quadratic bézier curve `from, ctrl, to`.
    #[inline]
    pub fn from_quadratic(from: Point<S>, ctrl: Point<S>, to: Point<S>) -> Self {
        ConicSegment::new(from, ctrl, S::ONE, to)
    }

    /// Create a conic from four points `[from, ctrl, (weight, _), to]`.
    ///
    /// This is the layout used to store conics next to cubic bézier curves. The y
    /// coordinate of the third point is ignored.
    #[inline]
    pub fn from_points(points: [Point<S>; 4]) -> Self {
        ConicSegment::new(points[0], points[1], points[2].x, points[3])
    }

    /// The four point layout of [`from_points`](Self::from_points).
    #[inline]
    pub fn to_points(&self) -> [Point<S>; 4] {
        [self.from, self.ctrl, point(self.weight, S::ZERO), self.to]
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        ConicPowerBasis::new(self).sample(t)
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let d = ConicPowerBasis::new(self).denominator(t);

        self.tangent_polynomial(t) * (S::TWO / (d * d))
    }

    /// Sample the position and the unit tangent of the curve at t.
    ///
    /// When the control point is on top of the endpoint being evaluated the derivative
    /// vanishes. The direction from `from` to `to` is used as the tangent in this case.
    pub fn evaluate(&self, t: S) -> (Point<S>, Vector<S>) {
        let position = ConicPowerBasis::new(self).sample(t);

        let degenerate = (t <= S::ZERO && self.from == self.ctrl)
            || (t >= S::ONE && self.ctrl == self.to);

        let tangent = self.tangent_polynomial(t);
        if degenerate || tangent == Vector::zero() {
            return (position, normalize_or_zero(self.to - self.from));
        }

        (position, normalize_or_zero(tangent))
    }

    // The numerator of the derivative divided by two. It has the direction of the
    // tangent since the denominator is positive.
    fn tangent_polynomial(&self, t: S) -> Vector<S> {
        let w = self.weight;
        let chord = self.to - self.from;
        let ctrl = self.ctrl - self.from;

        let a = chord * (w - S::ONE);
        let b = chord - ctrl * (S::TWO * w);
        let c = ctrl * w;

        (a * t + b) * t + c
    }

    /// Split this curve into two sub-curves.
    ///
    /// This is the de Casteljau algorithm applied to the homogeneous control points. The
    /// sub-curves are normalized so that their endpoints have a weight of one, which
    /// changes their parametrization unless the weight is one.
    pub fn split(&self, t: S) -> (ConicSegment<S>, ConicSegment<S>) {
        let from = Homogeneous::new(self.from, S::ONE);
        let ctrl = Homogeneous::new(self.ctrl, self.weight);
        let to = Homogeneous::new(self.to, S::ONE);

        let a = from.lerp(&ctrl, t);
        let b = ctrl.lerp(&to, t);
        let m = a.lerp(&b, t);

        let split_point = m.project();
        let sqrt_w = m.w.sqrt();

        (
            ConicSegment {
                from: self.from,
                ctrl: a.project(),
                weight: a.w / sqrt_w,
                to: split_point,
            },
            ConicSegment {
                from: split_point,
                ctrl: b.project(),
                weight: b.w / sqrt_w,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> ConicSegment<S> {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> ConicSegment<S> {
        self.split(t).1
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        ConicSegment {
            from: self.to,
            ctrl: self.ctrl,
            weight: self.weight,
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

    /// Approximate the curve with line segments, delivered to a sink.
    ///
    /// The parameter range is recursively halved. A range is kept as a single segment
    /// once the curve's point at the middle of the range is within `tolerance` (on each
    /// axis) of the middle of the segment, or once it is smaller than [`MIN_PROGRESS`].
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
        let basis = ConicPowerBasis::new(self);
        let mut tracker = ProgressTracker::new(self.from, sink);

        subdivide(
            &basis,
            tolerance,
            (self.from, S::ZERO),
            (self.to, S::ONE),
            &mut tracker,
        );

        tracker.finish(self.to);
    }

    /// Compute a flattened approximation of the curve, invoking a callback at
    /// each step.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    pub fn for_each_flattened_with_t<F>(&self, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        self.decompose(tolerance, callback);
    }

    /// Compute a flattened approximation of the curve, invoking a callback at
    /// each step.
    pub fn for_each_flattened<F>(&self, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>),
    {
        self.decompose(tolerance, &mut |segment: &LineSegment<S>, _: Range<S>| {
            callback(segment)
        });
    }
}

impl<S: Scalar> Segment for ConicSegment<S> {
    impl_segment!(S);
}

/// The numerator and the denominator of the conic as quadratic polynomials.
///
/// The denominator only depends on the weight so it is the same for both coordinates.
struct ConicPowerBasis<S> {
    numerator: [Vector<S>; 3],
    denominator: [S; 3],
}

impl<S: Scalar> ConicPowerBasis<S> {
    fn new(curve: &ConicSegment<S>) -> Self {
        let w = curve.weight;
        let p0 = curve.from.to_vector();
        let pw = curve.ctrl.to_vector() * w;
        let p2 = curve.to.to_vector();

        let d = S::TWO * (w - S::ONE);

        ConicPowerBasis {
            numerator: [p2 - pw * S::TWO + p0, (pw - p0) * S::TWO, p0],
            denominator: [-d, d, S::ONE],
        }
    }

    #[inline]
    fn denominator(&self, t: S) -> S {
        let [a, b, c] = self.denominator;
        (a * t + b) * t + c
    }

    #[inline]
    fn sample(&self, t: S) -> Point<S> {
        let [a, b, c] = self.numerator;
        let numerator = (a * t + b) * t + c;

        (numerator / self.denominator(t)).to_point()
    }
}

#[derive(Copy, Clone)]
struct Homogeneous<S> {
    xy: Vector<S>,
    w: S,
}

impl<S: Scalar> Homogeneous<S> {
    fn new(p: Point<S>, w: S) -> Self {
        Homogeneous {
            xy: p.to_vector() * w,
            w,
        }
    }

    fn lerp(&self, other: &Self, t: S) -> Self {
        Homogeneous {
            xy: self.xy.lerp(other.xy, t),
            w: self.w * (S::ONE - t) + other.w * t,
        }
    }

    fn project(&self) -> Point<S> {
        (self.xy / self.w).to_point()
    }
}

// Compares the middle of the chord with the point of the curve at the middle of the
// parameter range, independently on each axis.
fn is_too_curvy<S: Scalar>(from: Point<S>, mid: Point<S>, to: Point<S>, tolerance: S) -> bool {
    ((from.x + to.x) * S::HALF - mid.x).abs() > tolerance
        || ((from.y + to.y) * S::HALF - mid.y).abs() > tolerance
}

fn subdivide<S, Sink>(
    basis: &ConicPowerBasis<S>,
    tolerance: S,
    (from, t0): (Point<S>, S),
    (to, t1): (Point<S>, S),
    tracker: &mut ProgressTracker<S, Sink>,
) where
    S: Scalar,
    Sink: LineSink<S> + ?Sized,
{
    let t = (t0 + t1) * S::HALF;
    let mid = basis.sample(t);

    if t1 - t0 < S::value(MIN_PROGRESS) || !is_too_curvy(from, mid, to, tolerance) {
        tracker.add_point(to, t1 - t0);
        return;
    }

    subdivide(basis, tolerance, (from, t0), (mid, t), tracker);
    subdivide(basis, tolerance, (mid, t), (to, t1), tracker);
}

#[cfg(test)]
fn quarter_circle(radius: f32) -> ConicSegment<f32> {
    ConicSegment::new(
        point(radius, 0.0),
        point(radius, radius),
        core::f32::consts::FRAC_1_SQRT_2,
        point(0.0, radius),
    )
}

#[cfg(test)]
fn collect_flattened(
    curve: &ConicSegment<f32>,
    tolerance: f32,
) -> Vec<(LineSegment<f32>, Range<f32>)> {
    let mut segments = Vec::new();
    curve.for_each_flattened_with_t(tolerance, &mut |s, t| {
        segments.push((*s, t));
    });

    segments
}

#[test]
fn packed_points() {
    let points = [
        point(0.0f32, 0.0),
        point(10.0, 10.0),
        point(0.5, 123.0),
        point(20.0, 0.0),
    ];
    let conic = ConicSegment::from_points(points);

    assert_eq!(conic.from, points[0]);
    assert_eq!(conic.ctrl, points[1]);
    assert_eq!(conic.weight, 0.5);
    assert_eq!(conic.to, points[3]);
    assert_eq!(conic.to_points()[2], point(0.5, 0.0));
}

#[test]
fn evaluate_endpoints() {
    let curves = [
        quarter_circle(10.0),
        ConicSegment::new(point(0.0, 0.0), point(50.0, 100.0), 3.0, point(100.0, 0.0)),
        ConicSegment::from_quadratic(point(-5.0, 2.0), point(0.0, 40.0), point(25.0, 10.0)),
    ];

    for curve in &curves {
        let (start, _) = curve.evaluate(0.0);
        assert_eq!(start, curve.from);

        let (end, _) = curve.evaluate(1.0);
        assert!((end - curve.to).length() < 1e-4, "{:?} != {:?}", end, curve.to);
    }
}

#[test]
fn quarter_circle_is_exact() {
    let curve = quarter_circle(10.0);
    for i in 0..=16 {
        let t = i as f32 / 16.0;
        let p = curve.sample(t);
        assert!((p.to_vector().length() - 10.0).abs() < 1e-4);
    }
}

#[test]
fn evaluate_tangent() {
    use crate::vector;

    let curve = quarter_circle(1.0);

    let (_, tangent) = curve.evaluate(0.0);
    assert!((tangent - vector(0.0, 1.0)).length() < 1e-5);

    let (_, tangent) = curve.evaluate(1.0);
    assert!((tangent - vector(-1.0, 0.0)).length() < 1e-5);

    // On a circle the tangent is orthogonal to the radius.
    for i in 1..8 {
        let (position, tangent) = curve.evaluate(i as f32 / 8.0);
        assert!(position.to_vector().dot(tangent).abs() < 1e-5);
        assert!((tangent.length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn evaluate_degenerate_tangent() {
    use crate::vector;

    let curve = ConicSegment::new(point(0.0f32, 0.0), point(0.0, 0.0), 0.5, point(3.0, 4.0));
    let (_, tangent) = curve.evaluate(0.0);
    assert_eq!(tangent, vector(0.6, 0.8));

    let curve = ConicSegment::new(point(0.0f32, 0.0), point(3.0, 4.0), 2.0, point(3.0, 4.0));
    let (_, tangent) = curve.evaluate(1.0);
    assert_eq!(tangent, vector(0.6, 0.8));

    let p = point(1.0f32, 1.0);
    let curve = ConicSegment::new(p, p, 1.0, p);
    let (position, tangent) = curve.evaluate(0.0);
    assert_eq!(position, p);
    assert_eq!(tangent, vector(0.0, 0.0));
}

#[test]
fn derivative_matches_finite_differences() {
    let curve = ConicSegment::new(point(0.0f32, 0.0), point(5.0, 10.0), 2.0, point(10.0, 0.0));
    let h = 1e-3;
    for i in 1..10 {
        let t = i as f32 / 10.0;
        let expected = (curve.sample(t + h) - curve.sample(t - h)) / (2.0 * h);
        let d = curve.derivative(t);
        assert!((d - expected).length() < 0.05 * expected.length().max(1.0));
    }
}

#[test]
fn split_stays_on_the_curve() {
    let curve = quarter_circle(10.0);
    for &t in &[0.1, 0.5, 0.8] {
        let (left, right) = curve.split(t);

        assert_eq!(left.from, curve.from);
        assert_eq!(right.to, curve.to);
        assert_eq!(left.to, right.from);
        assert!((left.to - curve.sample(t)).length() < 1e-4);

        for i in 0..=8 {
            let s = i as f32 / 8.0;
            assert!((left.sample(s).to_vector().length() - 10.0).abs() < 1e-3);
            assert!((right.sample(s).to_vector().length() - 10.0).abs() < 1e-3);
        }
    }
}

#[test]
fn split_quadratic_keeps_parametrization() {
    let curve = ConicSegment::from_quadratic(point(0.0f32, 0.0), point(10.0, 20.0), point(30.0, 0.0));
    let (left, right) = curve.split(0.25);

    assert_eq!(left.weight, 1.0);
    assert_eq!(right.weight, 1.0);
    for i in 0..=4 {
        let s = i as f32 / 4.0;
        assert!((left.sample(s) - curve.sample(0.25 * s)).length() < 1e-4);
        assert!((right.sample(s) - curve.sample(0.25 + 0.75 * s)).length() < 1e-4);
    }
}

#[test]
fn flattened_ranges_tile_unit_interval() {
    let curves = [
        quarter_circle(100.0),
        ConicSegment::new(point(0.0, 0.0), point(50.0, 100.0), 3.0, point(100.0, 0.0)),
        ConicSegment::new(point(0.0, 0.0), point(50.0, 100.0), 0.1, point(100.0, 0.0)),
        ConicSegment::new(point(0.0, 0.0), point(0.0, 0.0), 1.0, point(100.0, 50.0)),
    ];

    for curve in &curves {
        for &tolerance in &[1.0, 0.25, 0.1, 0.01] {
            let segments = collect_flattened(curve, tolerance);

            assert!(!segments.is_empty());
            assert_eq!(segments[0].0.from, curve.from);
            assert_eq!(segments[0].1.start, 0.0);
            for pair in segments.windows(2) {
                assert_eq!(pair[0].1.end, pair[1].1.start);
                assert_eq!(pair[0].0.to, pair[1].0.from);
            }
            let last = segments.last().unwrap();
            assert_eq!(last.0.to, curve.to);
            assert_eq!(last.1.end, 1.0);
        }
    }
}

#[test]
fn flattened_quarter_circle_within_tolerance() {
    let curve = quarter_circle(100.0);
    for &tolerance in &[1.0, 0.1, 0.01] {
        let segments = collect_flattened(&curve, tolerance);
        assert!(segments.len() > 1);
        for (segment, t) in segments {
            for i in 0..=8 {
                let s = t.start + (t.end - t.start) * (i as f32 / 8.0);
                let d = segment.distance_to_point(curve.sample(s));
                assert!(d <= 2.0 * tolerance, "{} is {} away from {:?}", s, d, segment);
            }
        }
    }
}

#[test]
fn unit_weight_matches_quadratic() {
    let (p0, p1, p2) = (point(0.0f32, 0.0), point(40.0, 80.0), point(100.0, 10.0));
    let curve = ConicSegment::from_quadratic(p0, p1, p2);
    let quadratic = |t: f32| {
        let one_t = 1.0 - t;
        (p0.to_vector() * (one_t * one_t)
            + p1.to_vector() * (2.0 * one_t * t)
            + p2.to_vector() * (t * t))
            .to_point()
    };

    for &tolerance in &[1.0, 0.1, 0.01] {
        let segments = collect_flattened(&curve, tolerance);
        assert!(segments.len() > 1);
        for (segment, t) in segments {
            assert!((segment.from - quadratic(t.start)).length() < 1e-3);
            assert!((segment.to - quadratic(t.end)).length() < 1e-3);

            let mid = quadratic((t.start + t.end) * 0.5);
            let chord_mid = segment.from.lerp(segment.to, 0.5);
            assert!((chord_mid.x - mid.x).abs() <= tolerance + 1e-3);
            assert!((chord_mid.y - mid.y).abs() <= tolerance + 1e-3);
        }
    }
}

#[test]
fn flattening_straight_line() {
    let curve = ConicSegment::from_quadratic(point(0.0f32, 0.0), point(10.0, 0.0), point(20.0, 0.0));
    let segments = collect_flattened(&curve, 0.1);

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].0, curve.baseline());
    assert_eq!(segments[0].1, 0.0..1.0);
}

#[test]
fn flattening_a_point() {
    let p = point(7.0f32, -3.0);
    let curve = ConicSegment::new(p, p, 0.5, p);

    assert!(collect_flattened(&curve, 0.01).is_empty());
}

#[test]
fn flattening_zero_tolerance_terminates() {
    let curve = quarter_circle(100.0);

    let segments = collect_flattened(&curve, 0.0);
    // Ranges stop being split once they cover less than the minimum progress.
    assert!(segments.len() <= 2048);
    assert!(segments.len() >= 1024);
    assert_eq!(segments.last().unwrap().1.end, 1.0);
}

#[test]
fn segment_trait() {
    let curve = quarter_circle(50.0);
    let mut count = 0;
    Segment::for_each_flattened_with_t(&curve, 0.1, &mut |_, _| count += 1);

    assert_eq!(count, collect_flattened(&curve, 0.1).len());
    assert_eq!(Segment::flip(&curve).from, curve.to);
}
