#![deny(bare_trait_objects)]
#![no_std]

//! Adaptive flattening of curved path segments.
//!
//! # Crates
//!
//! This meta-crate (`spline`) reexports the following sub-crates for convenience:
//!
//! * **spline_geom** - Cubic bézier curves, conics and circular arcs, and the algorithms
//!   approximating them with line segments or cubic bézier curves.
//!
//! Each `spline_<name>` crate is reexported as a `<name>` module in `spline`. For example:
//!
//! ```ignore
//! extern crate spline_geom;
//! use spline_geom::CubicBezierSegment;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate spline;
//! use spline::geom::CubicBezierSegment;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled with the `serialization` feature flag
//! (disabled by default).
//!
//! The `std` feature (enabled by default) implements `std::error::Error` for the error
//! types. Without it, the crates are `no_std`.
//!
//! # Examples
//!
//! ## Flattening a conic
//!
//! ```
//! use spline::geom::ConicSegment;
//! use spline::math::point;
//!
//! // A quarter of a circle of radius 100.
//! let conic = ConicSegment {
//!     from: point(100.0, 0.0),
//!     ctrl: point(100.0, 100.0),
//!     weight: std::f32::consts::FRAC_1_SQRT_2,
//!     to: point(0.0, 100.0),
//! };
//!
//! let mut polyline = vec![conic.from];
//! conic.for_each_flattened(0.1, &mut |segment| {
//!     polyline.push(segment.to);
//! });
//!
//! for p in &polyline {
//!     assert!((p.to_vector().length() - 100.0).abs() < 0.01);
//! }
//! ```
//!
//! ## Approximating a circle with cubic bézier curves
//!
//! ```
//! use spline::geom::decompose_arc;
//! use spline::math::{point, Angle, CubicBezierSegment};
//!
//! let mut curves = Vec::new();
//! let result = decompose_arc(
//!     point(0.0, 0.0),
//!     50.0,
//!     0.1,
//!     Angle::radians(0.0),
//!     Angle::two_pi(),
//!     &mut |curve: &CubicBezierSegment| {
//!         curves.push(*curve);
//!         true
//!     },
//! );
//!
//! assert!(result.is_ok());
//! assert!(curves.len() >= 4);
//! ```

pub extern crate spline_geom;

pub use spline_geom as geom;

pub mod math {
    //! f32 versions of the spline_geom types used everywhere. Most other spline crates
    //! reexport them.

    pub use spline_geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Alias for a cubic bézier curve of f32 coordinates.
    pub type CubicBezierSegment = spline_geom::CubicBezierSegment<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}
