#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Flattening of cubic bézier curves, conics and circular arcs, on top of euclid.
//!
//! This crate is reexported in `spline` as `spline::geom`.
//!
//! # Overview.
//!
//! This crate implements the maths to approximate:
//!
//! - cubic bézier curves with line segments,
//! - conics (rational quadratic bézier curves) with line segments,
//! - circular arcs with cubic bézier curves (and, through them, with line segments).
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of line segments.
//!
//! The tolerance threshold taken as input by the flattening algorithms corresponds
//! to the maximum distance between the curve and its linear approximation.
//! The smaller the tolerance is, the more precise the approximation and the more segments
//! are generated. This value is typically chosen in function of the zoom level.
//!
//! Cubic bézier curves and conics are flattened by recursive subdivision. Each emitted
//! line segment comes with the range of the curve's parameter it covers, and the ranges
//! of all segments emitted for a curve tile `0..1`.
//!
//! ```
//! use spline_geom::{point, CubicBezierSegment};
//!
//! let curve = CubicBezierSegment {
//!     from: point(0.0, 0.0),
//!     ctrl1: point(10.0, 0.0),
//!     ctrl2: point(10.0, 10.0),
//!     to: point(0.0, 10.0),
//! };
//!
//! let mut end = 0.0;
//! let mut segments = 0;
//! curve.for_each_flattened_with_t(0.1, &mut |_segment, t| {
//!     assert_eq!(t.start, end);
//!     end = t.end;
//!     segments += 1;
//! });
//! assert_eq!(end, 1.0);
//! assert!(segments > 1);
//! ```
//!
//! Circular arcs are first approximated with cubic bézier curves, which are delivered to a
//! [`CurveSink`]. The sink may refuse a curve, in which case the decomposition stops early.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

#[macro_use]
mod segment;
pub mod arc;
pub mod conic;
pub mod cubic_bezier;
pub mod error;
mod line;
pub mod progress;
pub mod sink;

#[doc(inline)]
pub use crate::arc::{decompose_arc, CircularArc};
#[doc(inline)]
pub use crate::conic::ConicSegment;
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::error::{DecompositionError, DecompositionResult, UnsupportedParameter};
#[doc(inline)]
pub use crate::line::LineSegment;
#[doc(inline)]
pub use crate::progress::{ProgressTracker, MIN_PROGRESS};
#[doc(inline)]
pub use crate::segment::Segment;
#[doc(inline)]
pub use crate::sink::{CurveSink, LineSink};

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const SIX: Self;

        fn value(v: f32) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// An angle in radians.
pub use euclid::Angle;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

/// Normalize a vector, returning the zero vector instead of NaNs when its length is zero.
#[inline]
pub(crate) fn normalize_or_zero<S: Scalar>(v: Vector<S>) -> Vector<S> {
    let length = v.length();
    if length == S::ZERO {
        return vector(S::ZERO, S::ZERO);
    }

    v / length
}

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
