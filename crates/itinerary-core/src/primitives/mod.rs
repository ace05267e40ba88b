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

pub mod affine;
pub mod interval;

pub use affine::*;
pub use interval::Interval;

/// Marker for wall-clock values measured in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteMarker;

impl MarkerName for MinuteMarker {
    const NAME_POINT: &'static str = "Minute";
    const NAME_DELTA: &'static str = "Minutes";
}

/// Marker for values measured on the discrete slot grid of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotMarker;

impl MarkerName for SlotMarker {
    const NAME_POINT: &'static str = "Slot";
    const NAME_DELTA: &'static str = "Slots";
}

pub type MinutePoint = Point<i64, MinuteMarker>;
pub type MinuteDelta = Delta<i64, MinuteMarker>;
pub type SlotPoint = Point<i64, SlotMarker>;
pub type SlotDelta = Delta<i64, SlotMarker>;
pub type MinuteInterval = Interval<i64, MinuteMarker>;
pub type SlotInterval = Interval<i64, SlotMarker>;
