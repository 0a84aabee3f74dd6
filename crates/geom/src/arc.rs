//! Circular arc related maths and tools.
//!
//! Arcs are approximated with cubic bézier curves. Each curve matches the arc's endpoints
//! in position and slope, its control points are placed along the tangents at a distance
//! of `4/3 * tan(sweep / 4) * radius` from the endpoints.
//!
//! The maximum distance between such a curve and the circle is known in closed form,
//! (see [`arc_error_normalized`]) which is used to pick the number of curves up front.

use crate::error::{DecompositionError, DecompositionResult, UnsupportedParameter};
use crate::scalar::Scalar;
use crate::sink::CurveSink;
use crate::{point, Angle, CubicBezierSegment, LineSegment, Point};

use core::ops::Range;

/// A circular arc.
///
/// Angles are in radians, signed and not normalized: the arc goes from `start_angle`
/// to `end_angle`, clockwise in a y-down coordinate system when the sweep is positive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CircularArc<S> {
    pub center: Point<S>,
    pub radius: S,
    pub start_angle: Angle<S>,
    pub end_angle: Angle<S>,
}

impl<S: Scalar> CircularArc<S> {
    /// The signed angle between the start and the end of the arc.
    #[inline]
    pub fn sweep_angle(&self) -> Angle<S> {
        self.end_angle - self.start_angle
    }

    /// Sample the arc at t (expecting t between 0 and 1).
    ///
    /// The parameter is proportional to the angle.
    pub fn sample(&self, t: S) -> Point<S> {
        let angle = self.start_angle.radians + self.sweep_angle().radians * t;
        point_on_circle(self.center, self.radius, angle)
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        point_on_circle(self.center, self.radius, self.start_angle.radians)
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        point_on_circle(self.center, self.radius, self.end_angle.radians)
    }

    /// Approximate the arc with cubic bézier curves, delivered to a sink.
    ///
    /// See [`decompose_arc`].
    pub fn decompose<Sink>(&self, tolerance: S, sink: &mut Sink) -> DecompositionResult
    where
        Sink: CurveSink<S> + ?Sized,
    {
        decompose_arc(
            self.center,
            self.radius,
            tolerance,
            self.start_angle,
            self.end_angle,
            sink,
        )
    }

    /// Approximate the arc with cubic bézier curves, invoking a callback for each of them.
    ///
    /// Returning `false` from the callback stops the decomposition.
    pub fn for_each_cubic_bezier<F>(&self, tolerance: S, callback: &mut F) -> DecompositionResult
    where
        F: FnMut(&CubicBezierSegment<S>) -> bool,
    {
        self.decompose(tolerance, callback)
    }

    /// Approximate the arc with line segments.
    ///
    /// The arc is approximated with cubic bézier curves which are then flattened, so the
    /// distance between the arc and the line segments can add up to twice the tolerance.
    /// The parameter ranges passed to the callback are expressed over the whole arc and
    /// tile `0..1`.
    pub fn for_each_flattened_with_t<F>(&self, tolerance: S, callback: &mut F) -> DecompositionResult
    where
        F: FnMut(&LineSegment<S>, Range<S>),
    {
        let start = self.start_angle.radians;
        let end = self.end_angle.radians;
        check_parameters(self.center, self.radius, tolerance, start, end)?;

        let sweep = end - start;
        for_each_arc_curve(
            self.center,
            self.radius,
            tolerance,
            start,
            end,
            &mut |curve, a0, a1| {
                let p0 = (a0 - start) / sweep;
                let p1 = (a1 - start) / sweep;
                curve.for_each_flattened_with_t(tolerance, &mut |segment, t| {
                    let t0 = p0 * (S::ONE - t.start) + p1 * t.start;
                    let t1 = p0 * (S::ONE - t.end) + p1 * t.end;
                    callback(segment, t0..t1);
                });

                true
            },
        );

        Ok(())
    }

    /// Approximate the arc with line segments, ignoring the parameter ranges.
    pub fn for_each_flattened<F>(&self, tolerance: S, callback: &mut F) -> DecompositionResult
    where
        F: FnMut(&LineSegment<S>),
    {
        self.for_each_flattened_with_t(tolerance, &mut |segment, _| callback(segment))
    }
}

/// Approximate a circular arc with cubic bézier curves.
///
/// Arcs sweeping more than half a turn are first split in two at their middle angle.
/// Each remaining part is cut into as many curves of equal sweep as needed for the
/// distance between the curves and the circle to stay below `tolerance`.
///
/// A part sweeping less than `tolerance` radians produces no curve at all. Note that this
/// compares an angle with a distance.
///
/// The curves are sent to the sink in order. The decomposition stops at the first curve
/// the sink refuses, in which case `DecompositionError::SinkAborted` is returned.
///
/// The parameters are checked before anything is emitted: the tolerance must be positive,
/// the radius positive or zero, and none of the values may be NaN or infinite.
pub fn decompose_arc<S, Sink>(
    center: Point<S>,
    radius: S,
    tolerance: S,
    start_angle: Angle<S>,
    end_angle: Angle<S>,
    sink: &mut Sink,
) -> DecompositionResult
where
    S: Scalar,
    Sink: CurveSink<S> + ?Sized,
{
    let start = start_angle.radians;
    let end = end_angle.radians;
    check_parameters(center, radius, tolerance, start, end)?;

    let complete = for_each_arc_curve(center, radius, tolerance, start, end, &mut |curve, _, _| {
        sink.cubic_bezier(curve)
    });

    if !complete {
        log::debug!(
            "Arc decomposition from {} to {} aborted by the sink",
            start,
            end
        );
        return Err(DecompositionError::SinkAborted);
    }

    Ok(())
}

/// The maximum distance between a unit circle and the cubic bézier curve approximating an
/// arc of `angle` radians of it.
///
/// Twice this value is the error bound established by Tor Dokken and Morten Daehlen in
/// "Good approximation of circles by curvature-continuous Bézier curves" (1990). The actual
/// error is about half of the bound.
pub fn arc_error_normalized<S: Scalar>(angle: S) -> S {
    let quarter = angle / S::FOUR;

    S::TWO / S::value(27.0) * quarter.sin().powi(6) / quarter.cos().powi(2)
}

// Error of the arcs of PI / (i + 1) radians.
const ARC_ERROR_TABLE: [f32; 11] = [
    0.0185185185185185036127,
    0.000272567143730179811158,
    2.38647043651461047433e-05,
    4.2455377443222443279e-06,
    1.11281001494389081528e-06,
    3.72662000942734705475e-07,
    1.47783685574284411325e-07,
    6.63240432022601149057e-08,
    3.2715520137536980553e-08,
    1.73863223499021216974e-08,
    9.81410988043554039085e-09,
];

/// The largest angle of the form `PI / n` such that the unit circle's arc of that angle is
/// approximated by a cubic bézier curve within `tolerance`.
///
/// Tolerances below the precision of `S` (including zero and NaN) are clamped to
/// `S::epsilon()`: the curves' coordinates can't be more precise than that anyway.
pub fn max_angle_for_tolerance_normalized<S: Scalar>(tolerance: S) -> S {
    for (i, error) in ARC_ERROR_TABLE.iter().enumerate() {
        if S::value(*error) < tolerance {
            return S::PI() / S::value((i + 1) as f32);
        }
    }

    let tolerance = tolerance.max(S::epsilon());

    // The error shrinks with the angle, so this ends after a few hundred steps at most
    // with the clamped tolerance.
    let mut divisor = S::value((ARC_ERROR_TABLE.len() + 1) as f32);
    loop {
        let angle = S::PI() / divisor;
        if arc_error_normalized(angle) <= tolerance {
            return angle;
        }
        divisor += S::ONE;
    }
}

/// The number of cubic bézier curves of equal sweep needed to approximate an arc of
/// `angle` radians within `tolerance`.
///
/// The error scales with the radius. Always at least one.
pub fn segments_needed<S: Scalar>(angle: S, radius: S, tolerance: S) -> usize {
    let max_angle = max_angle_for_tolerance_normalized(tolerance / radius);

    (angle.abs() / max_angle).ceil().to_usize().unwrap_or(1).max(1)
}

fn check_parameters<S: Scalar>(
    center: Point<S>,
    radius: S,
    tolerance: S,
    start: S,
    end: S,
) -> Result<(), UnsupportedParameter> {
    let error = if tolerance.is_nan() {
        UnsupportedParameter::ToleranceIsNaN
    } else if tolerance <= S::ZERO {
        UnsupportedParameter::ToleranceIsNotPositive
    } else if radius.is_nan() {
        UnsupportedParameter::RadiusIsNaN
    } else if radius < S::ZERO {
        UnsupportedParameter::NegativeRadius
    } else if radius.is_infinite() {
        UnsupportedParameter::RadiusIsInfinite
    } else if start.is_nan() || end.is_nan() {
        UnsupportedParameter::AngleIsNaN
    } else if start.is_infinite() || end.is_infinite() {
        UnsupportedParameter::AngleIsInfinite
    } else if center.x.is_nan() || center.y.is_nan() {
        UnsupportedParameter::PositionIsNaN
    } else {
        return Ok(());
    };

    log::warn!(
        "Rejected arc (center {:?}, radius {}, angles {}..{}, tolerance {}): {:?}",
        center,
        radius,
        start,
        end,
        tolerance,
        error
    );

    Err(error)
}

// Calls the callback with each curve and the angles it spans. Returns false if the
// callback did.
fn for_each_arc_curve<S, F>(
    center: Point<S>,
    radius: S,
    tolerance: S,
    start: S,
    end: S,
    callback: &mut F,
) -> bool
where
    S: Scalar,
    F: FnMut(&CubicBezierSegment<S>, S, S) -> bool,
{
    let sweep = end - start;

    if sweep.abs() > S::PI() {
        let mid = (start + end) * S::HALF;
        return for_each_arc_curve(center, radius, tolerance, start, mid, callback)
            && for_each_arc_curve(center, radius, tolerance, mid, end, callback);
    }

    if sweep.abs() < tolerance {
        return true;
    }

    let n = segments_needed(sweep, radius, tolerance);
    log::trace!(
        "Arc from {} to {} with radius {}: {} cubic bézier curves",
        start,
        end,
        radius,
        n
    );

    let step = sweep / S::value(n as f32);
    let mut a = start;
    for _ in 1..n {
        let b = a + step;
        if !callback(&arc_curve(center, radius, a, b), a, b) {
            return false;
        }
        a = b;
    }

    callback(&arc_curve(center, radius, a, end), a, end)
}

fn point_on_circle<S: Scalar>(center: Point<S>, radius: S, angle: S) -> Point<S> {
    let (sin, cos) = angle.sin_cos();

    point(center.x + radius * cos, center.y + radius * sin)
}

// The cubic bézier curve approximating the arc from angle `a` to angle `b`.
fn arc_curve<S: Scalar>(center: Point<S>, radius: S, a: S, b: S) -> CubicBezierSegment<S> {
    let (sin_a, cos_a) = a.sin_cos();
    let (sin_b, cos_b) = b.sin_cos();
    let (r_sin_a, r_cos_a) = (radius * sin_a, radius * cos_a);
    let (r_sin_b, r_cos_b) = (radius * sin_b, radius * cos_b);

    let h = S::FOUR / S::THREE * ((b - a) / S::FOUR).tan();

    CubicBezierSegment {
        from: point(center.x + r_cos_a, center.y + r_sin_a),
        ctrl1: point(center.x + r_cos_a - h * r_sin_a, center.y + r_sin_a + h * r_cos_a),
        ctrl2: point(center.x + r_cos_b + h * r_sin_b, center.y + r_sin_b - h * r_cos_b),
        to: point(center.x + r_cos_b, center.y + r_sin_b),
    }
}

#[cfg(test)]
use std::vec::Vec;

#[cfg(test)]
fn collect_curves(
    center: Point<f32>,
    radius: f32,
    tolerance: f32,
    start: f32,
    end: f32,
) -> (Vec<CubicBezierSegment<f32>>, DecompositionResult) {
    crate::init_test_logger();

    let mut curves = Vec::new();
    let result = decompose_arc(
        center,
        radius,
        tolerance,
        Angle::radians(start),
        Angle::radians(end),
        &mut |curve: &CubicBezierSegment<f32>| {
            curves.push(*curve);
            true
        },
    );

    (curves, result)
}

#[cfg(test)]
fn assert_on_circle(p: Point<f32>, center: Point<f32>, radius: f32) {
    let d = (p - center).length();
    assert!((d - radius).abs() < 1e-4, "{:?} is {} away from {:?}", p, d, center);
}

#[test]
fn full_circle() {
    use core::f32::consts::PI;

    let center = point(5.0, 5.0);
    let (curves, result) = collect_curves(center, 10.0, 0.01, 0.0, 2.0 * PI);

    assert_eq!(result, Ok(()));
    assert!(curves.len() >= 4);
    assert!((curves[0].from - point(15.0, 5.0)).length() < 1e-4);
    assert!((curves.last().unwrap().to - point(15.0, 5.0)).length() < 1e-4);

    for pair in curves.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }

    let sweep = 2.0 * PI / curves.len() as f32;
    for (i, curve) in curves.iter().enumerate() {
        assert_on_circle(curve.from, center, 10.0);
        assert_on_circle(curve.to, center, 10.0);

        let expected = point_on_circle(center, 10.0, sweep * i as f32);
        assert!((curve.from - expected).length() < 1e-4);

        // Half of the error bound is the actual error.
        let mid = curve.sample(0.5);
        assert!(((mid - center).length() - 10.0).abs() <= 0.01);
    }
}

#[test]
fn half_turns_get_the_same_number_of_curves() {
    use core::f32::consts::PI;

    let (full, _) = collect_curves(point(0.0, 0.0), 100.0, 0.1, 0.0, 2.0 * PI);
    let (half, _) = collect_curves(point(0.0, 0.0), 100.0, 0.1, 0.0, PI);

    assert_eq!(full.len(), 2 * half.len());
    assert_eq!(half.len(), segments_needed(PI, 100.0, 0.1));
}

#[test]
fn negative_sweep() {
    use core::f32::consts::FRAC_PI_2;

    let center = point(0.0, 0.0);
    let (curves, result) = collect_curves(center, 1.0, 0.001, FRAC_PI_2, -FRAC_PI_2);

    assert_eq!(result, Ok(()));
    assert!(!curves.is_empty());
    assert!((curves[0].from - point(0.0, 1.0)).length() < 1e-5);
    assert!((curves.last().unwrap().to - point(0.0, -1.0)).length() < 1e-5);
    for curve in &curves {
        assert_on_circle(curve.to, center, 1.0);
        // Going clockwise through positive x.
        assert!(curve.sample(0.5).x > 0.0);
    }
}

#[test]
fn sweep_below_tolerance() {
    let (curves, result) = collect_curves(point(0.0, 0.0), 100.0, 0.01, 1.0, 1.005);

    assert_eq!(result, Ok(()));
    assert!(curves.is_empty());
}

#[test]
fn sink_abort() {
    use core::f32::consts::PI;

    crate::init_test_logger();

    let mut count = 0;
    let result = decompose_arc(
        point(0.0, 0.0),
        10.0,
        0.001,
        Angle::radians(0.0),
        Angle::radians(2.0 * PI),
        &mut |_: &CubicBezierSegment<f32>| {
            count += 1;
            count < 2
        },
    );

    assert_eq!(result, Err(DecompositionError::SinkAborted));
    assert_eq!(count, 2);

    // Aborting in the first half skips the second half.
    let mut count = 0;
    let result = decompose_arc(
        point(0.0, 0.0),
        10.0,
        1.0,
        Angle::radians(0.0),
        Angle::radians(2.0 * PI),
        &mut |_: &CubicBezierSegment<f32>| {
            count += 1;
            false
        },
    );

    assert_eq!(result, Err(DecompositionError::SinkAborted));
    assert_eq!(count, 1);
}

#[test]
fn unsupported_parameters() {
    let nan = f32::NAN;
    let inf = f32::INFINITY;
    let p = point(0.0, 0.0);

    let cases = [
        (p, 1.0, nan, 0.0, 1.0, UnsupportedParameter::ToleranceIsNaN),
        (p, 1.0, 0.0, 0.0, 1.0, UnsupportedParameter::ToleranceIsNotPositive),
        (p, 1.0, -0.1, 0.0, 1.0, UnsupportedParameter::ToleranceIsNotPositive),
        (p, nan, 0.1, 0.0, 1.0, UnsupportedParameter::RadiusIsNaN),
        (p, -1.0, 0.1, 0.0, 1.0, UnsupportedParameter::NegativeRadius),
        (p, inf, 0.1, 0.0, 1.0, UnsupportedParameter::RadiusIsInfinite),
        (p, 1.0, 0.1, nan, 1.0, UnsupportedParameter::AngleIsNaN),
        (p, 1.0, 0.1, 0.0, nan, UnsupportedParameter::AngleIsNaN),
        (p, 1.0, 0.1, 0.0, inf, UnsupportedParameter::AngleIsInfinite),
        (point(nan, 0.0), 1.0, 0.1, 0.0, 1.0, UnsupportedParameter::PositionIsNaN),
    ];

    for &(center, radius, tolerance, start, end, expected) in &cases {
        let (curves, result) = collect_curves(center, radius, tolerance, start, end);
        assert!(curves.is_empty());
        assert_eq!(result, Err(DecompositionError::UnsupportedParameter(expected)));
    }
}

#[test]
fn error_table() {
    for (i, &error) in ARC_ERROR_TABLE.iter().enumerate() {
        let angle = core::f64::consts::PI / (i + 1) as f64;
        let expected = arc_error_normalized(angle);
        assert!(((error as f64) - expected).abs() <= expected * 1e-5);
    }
}

#[test]
fn max_angle_for_tolerance() {
    use core::f32::consts::PI;

    assert_eq!(max_angle_for_tolerance_normalized(1.0f32), PI);
    assert_eq!(max_angle_for_tolerance_normalized(1e-4f32), PI / 3.0);

    // Past the end of the table.
    let tolerance = 1e-10f64;
    let angle = max_angle_for_tolerance_normalized(tolerance);
    assert!(angle < core::f64::consts::PI / 11.0);
    assert!(arc_error_normalized(angle) <= tolerance);
    let previous = core::f64::consts::PI / (core::f64::consts::PI / angle - 1.0);
    assert!(arc_error_normalized(previous) > tolerance);
}

#[test]
fn max_angle_for_degenerate_tolerances() {
    for &tolerance in &[0.0f64, -1.0, f64::NAN, 1e-300] {
        let angle = max_angle_for_tolerance_normalized(tolerance);
        assert!(angle > 0.0);
        assert!(arc_error_normalized(angle) <= f64::EPSILON);
    }

    let angle = max_angle_for_tolerance_normalized(0.0f32);
    assert!(angle > 0.0);
    assert!(arc_error_normalized(angle) <= f32::EPSILON);
}

#[test]
fn tolerance_far_below_radius() {
    let mut count = 0;
    let result = decompose_arc(
        point(0.0f64, 0.0),
        1e300,
        1e-300,
        Angle::radians(0.0),
        Angle::radians(1.0),
        &mut |_: &CubicBezierSegment<f64>| {
            count += 1;
            true
        },
    );
    assert_eq!(result, Ok(()));
    assert!(count > 0 && count < 1000, "{} curves", count);

    let (curves, result) = collect_curves(point(0.0, 0.0), 1e30, 1e-20, 0.0, 1.0);
    assert_eq!(result, Ok(()));
    assert!(!curves.is_empty() && curves.len() < 16, "{} curves", curves.len());
}

#[test]
fn zero_radius() {
    let center = point(3.0, 4.0);
    let (curves, result) = collect_curves(center, 0.0, 0.1, 0.0, 1.0);

    assert_eq!(result, Ok(()));
    assert!(!curves.is_empty());
    for curve in &curves {
        for p in &curve.to_points() {
            assert_eq!(*p, center);
        }
    }

    let arc = CircularArc {
        center,
        radius: 0.0,
        start_angle: Angle::radians(0.0),
        end_angle: Angle::radians(1.0),
    };
    let mut count = 0;
    assert_eq!(arc.for_each_flattened(0.1, &mut |_| count += 1), Ok(()));
    assert_eq!(count, 0);
}

#[test]
fn segments_needed_grows_with_precision() {
    use core::f32::consts::PI;

    let mut previous = 0;
    for &tolerance in &[1.0, 0.1, 0.01, 0.001, 0.0001] {
        let n = segments_needed(PI, 50.0, tolerance);
        assert!(n >= previous);
        previous = n;
    }
    assert!(previous > 1);

    assert_eq!(segments_needed(0.0, 50.0, 0.1), 1);
    assert_eq!(segments_needed(-PI, 1.0, 1e-3), 2);
}

#[test]
fn arc_endpoints() {
    use core::f32::consts::{FRAC_PI_2, PI};

    let arc = CircularArc {
        center: point(1.0, 2.0),
        radius: 3.0,
        start_angle: Angle::radians(0.0),
        end_angle: Angle::radians(PI),
    };

    assert_eq!(arc.sweep_angle(), Angle::radians(PI));
    assert_eq!(arc.from(), point(4.0, 2.0));
    assert!((arc.to() - point(-2.0, 2.0)).length() < 1e-5);
    assert!((arc.sample(0.5) - point(1.0, 5.0)).length() < 1e-5);
    assert!((arc.sample(0.5) - point_on_circle(arc.center, 3.0, FRAC_PI_2)).length() < 1e-6);
}

#[test]
fn flattened_arc() {
    use core::f32::consts::PI;

    let arc = CircularArc {
        center: point(0.0, 0.0),
        radius: 100.0,
        start_angle: Angle::radians(0.5),
        end_angle: Angle::radians(0.5 + 1.5 * PI),
    };

    for &tolerance in &[1.0, 0.1, 0.01] {
        let mut segments: Vec<(LineSegment<f32>, Range<f32>)> = Vec::new();
        let result = arc.for_each_flattened_with_t(tolerance, &mut |s, t| segments.push((*s, t)));

        assert_eq!(result, Ok(()));
        assert!(segments.len() > 3);
        assert_eq!(segments[0].1.start, 0.0);
        assert_eq!(segments[0].0.from, arc.from());
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1.end, pair[1].1.start);
            assert_eq!(pair[0].0.to, pair[1].0.from);
        }
        let last = segments.last().unwrap();
        assert_eq!(last.1.end, 1.0);
        assert!((last.0.to - arc.to()).length() < 1e-3);

        for (segment, _) in &segments {
            let d = (segment.to - arc.center).length();
            assert!((d - 100.0).abs() <= tolerance);
        }
    }
}

#[test]
fn flattened_arc_rejects_parameters() {
    let arc = CircularArc {
        center: point(0.0, 0.0),
        radius: -1.0,
        start_angle: Angle::radians(0.0),
        end_angle: Angle::radians(1.0),
    };

    let mut count = 0;
    let result = arc.for_each_flattened(0.1, &mut |_| count += 1);

    assert_eq!(
        result,
        Err(DecompositionError::UnsupportedParameter(
            UnsupportedParameter::NegativeRadius
        ))
    );
    assert_eq!(count, 0);
}
