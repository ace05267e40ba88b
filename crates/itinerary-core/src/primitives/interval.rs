// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::primitives::affine::{Delta, MarkerName, Point};
use num_traits::CheckedSub;
use std::ops::Range;

/// A half-open interval `[start, end)` over tagged points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval<T, U> {
    start: Point<T, U>,
    end: Point<T, U>,
}

impl<T: Copy + Ord, U: Copy + Ord> Interval<T, U> {
    #[inline]
    pub const fn new(start: Point<T, U>, end: Point<T, U>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> Point<T, U> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point<T, U> {
        self.end
    }

    #[inline]
    pub fn into_inner(self) -> (Point<T, U>, Point<T, U>) {
        (self.start, self.end)
    }

    #[inline]
    pub fn into_range(self) -> Range<Point<T, U>> {
        self.start..self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn duration(&self) -> Delta<T, U>
    where
        T: CheckedSub,
    {
        self.end - self.start
    }

    #[inline]
    pub fn contains_point(&self, p: Point<T, U>) -> bool {
        self.start <= p && p < self.end
    }

    /// True when `other` lies fully inside this interval. Empty intervals
    /// are contained everywhere.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        other.is_empty() || (self.start <= other.start && other.end <= self.end)
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Interval<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::{SlotInterval, SlotPoint};

    #[inline]
    fn sp(v: i64) -> SlotPoint {
        SlotPoint::new(v)
    }

    #[inline]
    fn iv(a: i64, b: i64) -> SlotInterval {
        SlotInterval::new(sp(a), sp(b))
    }

    #[test]
    fn test_half_open_membership() {
        let i = iv(4, 8);
        assert!(i.contains_point(sp(4)));
        assert!(i.contains_point(sp(7)));
        assert!(!i.contains_point(sp(8)));
        assert!(!i.contains_point(sp(3)));
    }

    #[test]
    fn test_intersects_excludes_touching() {
        assert!(iv(0, 4).intersects(&iv(3, 6)));
        assert!(!iv(0, 4).intersects(&iv(4, 6)));
        assert!(!iv(4, 6).intersects(&iv(0, 4)));
        assert!(!iv(2, 2).intersects(&iv(0, 10)));
    }

    #[test]
    fn test_contains_interval() {
        assert!(iv(0, 10).contains(&iv(2, 8)));
        assert!(iv(0, 10).contains(&iv(0, 10)));
        assert!(!iv(0, 10).contains(&iv(2, 11)));
        assert!(iv(0, 10).contains(&iv(5, 5)));
    }

    #[test]
    fn test_duration_and_emptiness() {
        assert_eq!(iv(3, 9).duration().value(), 6);
        assert!(iv(5, 5).is_empty());
        assert!(!iv(5, 6).is_empty());
    }
}
