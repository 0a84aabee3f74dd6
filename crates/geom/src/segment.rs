use crate::scalar::Scalar;
use crate::{normalize_or_zero, LineSegment, Point, Vector};

use core::ops::Range;

/// Common APIs to segment types.
pub trait Segment: Copy + Sized {
    type Scalar: Scalar;

    /// Start of the curve.
    fn from(&self) -> Point<Self::Scalar>;

    /// End of the curve.
    fn to(&self) -> Point<Self::Scalar>;

    /// Sample the curve at t (expecting t between 0 and 1).
    fn sample(&self, t: Self::Scalar) -> Point<Self::Scalar>;

    /// Sample the derivative at t (expecting t between 0 and 1).
    fn derivative(&self, t: Self::Scalar) -> Vector<Self::Scalar>;

    /// Sample the position and the unit tangent at t.
    ///
    /// The tangent is the zero vector where the derivative vanishes.
    fn evaluate(&self, t: Self::Scalar) -> (Point<Self::Scalar>, Vector<Self::Scalar>) {
        (self.sample(t), normalize_or_zero(self.derivative(t)))
    }

    /// Split this curve into two sub-curves.
    fn split(&self, t: Self::Scalar) -> (Self, Self);

    /// Swap the direction of the segment.
    fn flip(&self) -> Self;

    /// Approximates the curve with sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    ///
    /// The ranges of `t` passed to the callback tile `0..1`, unless the curve is reduced
    /// to a single point in which case the callback is not invoked.
    #[allow(clippy::type_complexity)]
    fn for_each_flattened_with_t(
        &self,
        tolerance: Self::Scalar,
        callback: &mut dyn FnMut(&LineSegment<Self::Scalar>, Range<Self::Scalar>),
    );
}

macro_rules! impl_segment {
    ($S:ty) => {
        type Scalar = $S;
        fn from(&self) -> Point<$S> {
            self.from()
        }
        fn to(&self) -> Point<$S> {
            self.to()
        }
        fn sample(&self, t: $S) -> Point<$S> {
            self.sample(t)
        }
        fn derivative(&self, t: $S) -> Vector<$S> {
            self.derivative(t)
        }
        fn evaluate(&self, t: $S) -> (Point<$S>, Vector<$S>) {
            self.evaluate(t)
        }
        fn split(&self, t: $S) -> (Self, Self) {
            self.split(t)
        }
        fn flip(&self) -> Self {
            self.flip()
        }
        fn for_each_flattened_with_t(
            &self,
            tolerance: $S,
            callback: &mut dyn FnMut(&LineSegment<$S>, Range<$S>),
        ) {
            self.decompose(tolerance, callback);
        }
    };
}
