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

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};
use std::ops::{Add, Neg, Sub};

pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// An absolute position on an axis tagged by a unit marker.
///
/// Points cannot be added to points; only a [`Delta`] of the same marker
/// moves a point.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, core::marker::PhantomData<U>);

/// A signed distance between two [`Point`]s of the same marker.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Point::new(T::zero())
    }

    #[inline]
    pub fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }
}

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Delta::new(T::zero())
    }

    #[inline]
    pub fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool
    where
        T: Zero,
    {
        self.0.is_zero()
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&other.0).map(Delta::new)
    }

    #[inline]
    pub fn checked_mul(self, factor: T) -> Option<Self>
    where
        T: CheckedMul,
    {
        self.0.checked_mul(&factor).map(Delta::new)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T: CheckedAdd, U> Add<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("error in Point + Delta"))
    }
}

impl<T: CheckedSub, U> Sub<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("error in Point - Delta"))
    }
}

impl<T: CheckedSub, U> Sub<Point<T, U>> for Point<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Point - Point"))
    }
}

impl<T: CheckedAdd, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("error in Delta + Delta"))
    }
}

impl<T: CheckedSub, U> Sub for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Delta - Delta"))
    }
}

impl<T: CheckedSub + Zero, U> Neg for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn neg(self) -> Self::Output {
        Delta::new(T::zero().checked_sub(&self.0).expect("error in -Delta"))
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::{MinuteDelta, MinutePoint, SlotDelta, SlotPoint};

    #[test]
    fn test_point_delta_arithmetic() {
        let p = MinutePoint::new(510);
        let d = MinuteDelta::new(45);
        assert_eq!((p + d).value(), 555);
        assert_eq!((p - d).value(), 465);
        assert_eq!((p + d) - p, d);
    }

    #[test]
    fn test_delta_arithmetic() {
        let a = SlotDelta::new(3);
        let b = SlotDelta::new(5);
        assert_eq!((a + b).value(), 8);
        assert_eq!((b - a).value(), 2);
        assert_eq!((-a).value(), -3);
        assert_eq!(a.checked_mul(15), Some(SlotDelta::new(45)));
    }

    #[test]
    fn test_checked_ops_catch_overflow() {
        let p = SlotPoint::new(i64::MAX);
        assert!(p.checked_add(SlotDelta::new(1)).is_none());
        assert_eq!(
            p.checked_sub(SlotDelta::new(1)),
            Some(SlotPoint::new(i64::MAX - 1))
        );
    }

    #[test]
    fn test_display_uses_marker_names() {
        assert_eq!(format!("{}", MinutePoint::new(30)), "Minute(30)");
        assert_eq!(format!("{}", SlotDelta::new(4)), "Slots(4)");
    }
}
