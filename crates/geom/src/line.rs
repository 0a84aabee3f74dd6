use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::{Point, Vector};

use core::ops::Range;

/// A linear segment.
///
/// This is what the flattening algorithms produce.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Split this curve into two sub-segments.
    #[inline]
    pub fn split(&self, t: S) -> (Self, Self) {
        let split_point = self.sample(t);

        (
            LineSegment {
                from: self.from,
                to: split_point,
            },
            LineSegment {
                from: split_point,
                to: self.to,
            },
        )
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Computes the distance between this segment and a point.
    #[inline]
    pub fn distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).length()
    }

    /// Computes the closest point on this segment to `p`.
    #[inline]
    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v1 = self.to - self.from;
        let square_length = v1.dot(v1);
        if square_length == S::ZERO {
            return self.from;
        }

        let v2 = p - self.from;
        let t = S::min(S::max(v2.dot(v1) / square_length, S::ZERO), S::ONE);

        self.from + v1 * t
    }
}

impl<S: Scalar> Segment for LineSegment<S> {
    type Scalar = S;
    fn from(&self) -> Point<S> {
        self.from
    }
    fn to(&self) -> Point<S> {
        self.to
    }
    fn sample(&self, t: S) -> Point<S> {
        self.sample(t)
    }
    fn derivative(&self, _t: S) -> Vector<S> {
        self.to_vector()
    }
    fn split(&self, t: S) -> (Self, Self) {
        self.split(t)
    }
    fn flip(&self) -> Self {
        self.flip()
    }

    fn for_each_flattened_with_t(
        &self,
        _tolerance: Self::Scalar,
        callback: &mut dyn FnMut(&LineSegment<S>, Range<S>),
    ) {
        callback(self, S::ZERO..S::ONE);
    }
}

#[test]
fn distance_to_point() {
    use crate::point;

    let segment = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(segment.distance_to_point(point(5.0, 3.0)), 3.0);
    assert_eq!(segment.distance_to_point(point(-4.0, 3.0)), 5.0);
    assert_eq!(segment.distance_to_point(point(13.0, -4.0)), 5.0);

    let degenerate = LineSegment {
        from: point(1.0f32, 1.0),
        to: point(1.0, 1.0),
    };
    assert_eq!(degenerate.distance_to_point(point(4.0, 5.0)), 5.0);
}

#[test]
fn evaluate_line() {
    use crate::{point, vector};

    let segment = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(0.0, 8.0),
    };

    let (position, tangent) = segment.evaluate(0.25);
    assert_eq!(position, point(0.0, 2.0));
    assert_eq!(tangent, vector(0.0, 1.0));
}
