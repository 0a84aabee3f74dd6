//! Bookkeeping shared by the recursive flattening algorithms.

use crate::scalar::Scalar;
use crate::sink::LineSink;
use crate::{LineSegment, Point};

/// Parameter ranges below this size are never subdivided further.
///
/// This bounds the recursion depth of the flattening algorithms regardless of the
/// tolerance and of floating point noise.
pub const MIN_PROGRESS: f32 = 1.0 / 1024.0;

/// Turns a sequence of points into line segments, keeping track of how much of the
/// curve's parameter range has been covered.
///
/// Points equal to the previous one are not emitted. The progress they would have
/// covered is added to the next emitted segment, so that the emitted ranges stay
/// contiguous.
pub struct ProgressTracker<'l, S, Sink: ?Sized> {
    last_point: Point<S>,
    last_progress: S,
    skipped_progress: S,
    sink: &'l mut Sink,
}

impl<'l, S: Scalar, Sink: LineSink<S> + ?Sized> ProgressTracker<'l, S, Sink> {
    pub fn new(start: Point<S>, sink: &'l mut Sink) -> Self {
        ProgressTracker {
            last_point: start,
            last_progress: S::ZERO,
            skipped_progress: S::ZERO,
            sink,
        }
    }

    /// Emit a segment from the last point to `to`, covering `progress` more of the curve.
    ///
    /// A point equal to the last one emits nothing. Unlike a plain no-op, its progress is
    /// not lost: it is added to the range of the next emitted segment, so that the ranges
    /// keep tiling the curve's parameter range.
    pub fn add_point(&mut self, to: Point<S>, progress: S) {
        if to == self.last_point {
            self.skipped_progress += progress;
            return;
        }

        let t0 = self.last_progress;
        let t1 = t0 + self.skipped_progress + progress;

        self.sink.line_segment(
            &LineSegment {
                from: self.last_point,
                to,
            },
            t0..t1,
        );

        self.last_point = to;
        self.last_progress = t1;
        self.skipped_progress = S::ZERO;
    }

    /// The end point of the last emitted segment, or the start point if nothing was emitted.
    #[inline]
    pub fn last_point(&self) -> Point<S> {
        self.last_point
    }

    /// The end of the parameter range of the last emitted segment.
    #[inline]
    pub fn last_progress(&self) -> S {
        self.last_progress
    }

    /// Check that the whole curve was covered.
    ///
    /// # Panics
    ///
    /// If the last emitted point is not `end`, or if the emitted progress is neither zero
    /// (nothing was emitted) nor the complete parameter range. Either of these means that
    /// the flattening algorithm lost track of the curve.
    pub fn finish(self, end: Point<S>) {
        assert!(
            self.last_point == end,
            "Flattening ended at {:?} instead of {:?}",
            self.last_point,
            end
        );
        assert!(
            self.last_progress == S::ZERO
                || self.last_progress + self.skipped_progress == S::ONE,
            "Flattening covered {:?} of the curve",
            self.last_progress + self.skipped_progress
        );
    }
}

#[cfg(test)]
use crate::point;
#[cfg(test)]
use core::ops::Range;
#[cfg(test)]
use std::vec::Vec;

#[test]
fn duplicate_points_are_skipped() {
    let mut segments: Vec<(LineSegment<f32>, Range<f32>)> = Vec::new();
    let mut sink = |s: &LineSegment<f32>, t: Range<f32>| segments.push((*s, t));

    let mut tracker = ProgressTracker::new(point(0.0, 0.0), &mut sink);
    tracker.add_point(point(1.0, 0.0), 0.5);
    tracker.add_point(point(1.0, 0.0), 0.25);
    tracker.add_point(point(2.0, 0.0), 0.25);
    assert_eq!(tracker.last_point(), point(2.0, 0.0));
    assert_eq!(tracker.last_progress(), 1.0);
    tracker.finish(point(2.0, 0.0));

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].0.from, point(0.0, 0.0));
    assert_eq!(segments[0].0.to, point(1.0, 0.0));
    assert_eq!(segments[0].1, 0.0..0.5);
    // The skipped quarter is folded into the next segment.
    assert_eq!(segments[1].0.from, point(1.0, 0.0));
    assert_eq!(segments[1].1, 0.5..1.0);
}

#[test]
fn leading_duplicates() {
    let mut segments: Vec<Range<f32>> = Vec::new();
    let mut sink = |_: &LineSegment<f32>, t: Range<f32>| segments.push(t);

    let mut tracker = ProgressTracker::new(point(0.0, 0.0), &mut sink);
    tracker.add_point(point(0.0, 0.0), 0.5);
    tracker.add_point(point(3.0, 4.0), 0.5);
    tracker.finish(point(3.0, 4.0));

    assert_eq!(segments, [0.0..1.0]);
}

#[test]
fn nothing_emitted() {
    let mut count = 0;
    let mut sink = |_: &LineSegment<f32>, _: Range<f32>| count += 1;

    let mut tracker = ProgressTracker::new(point(5.0, 5.0), &mut sink);
    tracker.add_point(point(5.0, 5.0), 0.5);
    tracker.add_point(point(5.0, 5.0), 0.5);
    assert_eq!(tracker.last_progress(), 0.0);
    tracker.finish(point(5.0, 5.0));

    assert_eq!(count, 0);
}

#[test]
#[should_panic]
fn finish_at_wrong_point() {
    let mut sink = |_: &LineSegment<f32>, _: Range<f32>| {};
    let mut tracker = ProgressTracker::new(point(0.0, 0.0), &mut sink);
    tracker.add_point(point(1.0, 0.0), 1.0);
    tracker.finish(point(2.0, 0.0));
}

#[test]
#[should_panic]
fn finish_with_incomplete_progress() {
    let mut sink = |_: &LineSegment<f32>, _: Range<f32>| {};
    let mut tracker = ProgressTracker::new(point(0.0, 0.0), &mut sink);
    tracker.add_point(point(1.0, 0.0), 0.75);
    tracker.finish(point(1.0, 0.0));
}
