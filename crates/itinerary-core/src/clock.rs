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

//! Wall-clock parsing and slot-grid conversion.
//!
//! Everything downstream of the configuration boundary works in slot
//! indices; this module is the only place minutes and clock strings exist.

use crate::primitives::{MinuteDelta, MinuteInterval, MinutePoint, SlotDelta};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadTimeFormatError {
    input: String,
}

impl BadTimeFormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for BadTimeFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid time '{}': expected 24-hour 'HH:MM'",
            self.input
        )
    }
}

impl std::error::Error for BadTimeFormatError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadDurationError {
    input: String,
}

impl BadDurationError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for BadDurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid duration '{}': expected minutes or '1h', '45min', '1h30min'",
            self.input
        )
    }
}

impl std::error::Error for BadDurationError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadWindowError {
    input: String,
}

impl BadWindowError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for BadWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid window '{}': expected 'HH:MM-HH:MM' with start before end",
            self.input
        )
    }
}

impl std::error::Error for BadWindowError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnalignedBoundaryError {
    minutes: i64,
    slot_minutes: i64,
}

impl UnalignedBoundaryError {
    pub fn new(minutes: i64, slot_minutes: i64) -> Self {
        Self {
            minutes,
            slot_minutes,
        }
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn slot_minutes(&self) -> i64 {
        self.slot_minutes
    }
}

impl std::fmt::Display for UnalignedBoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} minutes does not align to the {}-minute slot grid",
            self.minutes, self.slot_minutes
        )
    }
}

impl std::error::Error for UnalignedBoundaryError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClockError {
    BadTimeFormat(BadTimeFormatError),
    BadDuration(BadDurationError),
    BadWindow(BadWindowError),
    UnalignedBoundary(UnalignedBoundaryError),
}

impl std::fmt::Display for ClockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockError::BadTimeFormat(e) => write!(f, "{}", e),
            ClockError::BadDuration(e) => write!(f, "{}", e),
            ClockError::BadWindow(e) => write!(f, "{}", e),
            ClockError::UnalignedBoundary(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ClockError {}

impl From<BadTimeFormatError> for ClockError {
    fn from(e: BadTimeFormatError) -> Self {
        ClockError::BadTimeFormat(e)
    }
}

impl From<BadDurationError> for ClockError {
    fn from(e: BadDurationError) -> Self {
        ClockError::BadDuration(e)
    }
}

impl From<BadWindowError> for ClockError {
    fn from(e: BadWindowError) -> Self {
        ClockError::BadWindow(e)
    }
}

impl From<UnalignedBoundaryError> for ClockError {
    fn from(e: UnalignedBoundaryError) -> Self {
        ClockError::UnalignedBoundary(e)
    }
}

/// Parses a strict 24-hour `HH:MM` string into minutes from midnight.
pub fn parse_time(input: &str) -> Result<MinutePoint, ClockError> {
    let bytes = input.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(BadTimeFormatError::new(input).into());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(BadTimeFormatError::new(input).into());
    }
    let hour = i64::from(digits[0] - b'0') * 10 + i64::from(digits[1] - b'0');
    let minute = i64::from(digits[2] - b'0') * 10 + i64::from(digits[3] - b'0');
    if hour > 23 || minute > 59 {
        return Err(BadTimeFormatError::new(input).into());
    }
    Ok(MinutePoint::new(hour * 60 + minute))
}

/// Renders minutes from midnight back to `HH:MM`. Inverse of [`parse_time`]
/// on `[0, 24 * 60)`; values beyond midnight wrap for display.
pub fn format_time(t: MinutePoint) -> String {
    let total = t.value().rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Parses a duration: a bare integer is taken as minutes, otherwise the
/// value must match `(\d+h)?(\d+min)?` with at least one group present.
pub fn parse_duration(input: &str) -> Result<MinuteDelta, ClockError> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(BadDurationError::new(input).into());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        let minutes: i64 = s.parse().map_err(|_| BadDurationError::new(input))?;
        return Ok(MinuteDelta::new(minutes));
    }

    let mut rest = s.as_str();
    let mut total: i64 = 0;
    let mut matched = false;

    if let Some(idx) = rest.find('h') {
        let hours = &rest[..idx];
        if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BadDurationError::new(input).into());
        }
        let h: i64 = hours.parse().map_err(|_| BadDurationError::new(input))?;
        total += h * 60;
        matched = true;
        rest = &rest[idx + 1..];
    }

    if !rest.is_empty() {
        let minutes = rest
            .strip_suffix("min")
            .ok_or_else(|| BadDurationError::new(input))?;
        if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BadDurationError::new(input).into());
        }
        let m: i64 = minutes.parse().map_err(|_| BadDurationError::new(input))?;
        total += m;
        matched = true;
    }

    if !matched {
        return Err(BadDurationError::new(input).into());
    }
    Ok(MinuteDelta::new(total))
}

/// Wraps an already-numeric minute count, rejecting negatives.
pub fn duration_from_minutes(minutes: i64) -> Result<MinuteDelta, ClockError> {
    if minutes < 0 {
        return Err(BadDurationError::new(minutes.to_string()).into());
    }
    Ok(MinuteDelta::new(minutes))
}

/// Parses `"HH:MM-HH:MM"` into a half-open minute interval; the end must
/// lie strictly after the start.
pub fn parse_window(input: &str) -> Result<MinuteInterval, ClockError> {
    let (start_str, end_str) = input
        .split_once('-')
        .ok_or_else(|| BadWindowError::new(input))?;
    let start =
        parse_time(start_str.trim()).map_err(|_| ClockError::from(BadWindowError::new(input)))?;
    let end =
        parse_time(end_str.trim()).map_err(|_| ClockError::from(BadWindowError::new(input)))?;
    if end <= start {
        return Err(BadWindowError::new(input).into());
    }
    Ok(MinuteInterval::new(start, end))
}

/// Converts a minute span to whole slots; the span must sit exactly on the
/// slot grid.
pub fn to_slots(d: MinuteDelta, slot_minutes: MinuteDelta) -> Result<SlotDelta, ClockError> {
    let step = slot_minutes.value();
    debug_assert!(step >= 1);
    let minutes = d.value();
    if minutes % step != 0 {
        return Err(UnalignedBoundaryError::new(minutes, step).into());
    }
    Ok(SlotDelta::new(minutes / step))
}

/// Inverse of [`to_slots`] for slot-aligned values.
pub fn from_slots(d: SlotDelta, slot_minutes: MinuteDelta) -> MinuteDelta {
    MinuteDelta::new(d.value() * slot_minutes.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn md(v: i64) -> MinuteDelta {
        MinuteDelta::new(v)
    }

    #[test]
    fn test_parse_time_accepts_strict_hhmm() {
        assert_eq!(parse_time("08:30").unwrap().value(), 510);
        assert_eq!(parse_time("00:00").unwrap().value(), 0);
        assert_eq!(parse_time("23:59").unwrap().value(), 23 * 60 + 59);
    }

    #[test]
    fn test_parse_time_rejects_malformed_inputs() {
        for bad in ["8:30", "08.30", "24:00", "12:60", "", "ab:cd", "08:301"] {
            assert!(
                matches!(parse_time(bad), Err(ClockError::BadTimeFormat(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_format_time_round_trips() {
        for minutes in (0..MINUTES_PER_DAY).step_by(7) {
            let rendered = format_time(MinutePoint::new(minutes));
            assert_eq!(parse_time(&rendered).unwrap().value(), minutes);
        }
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("45").unwrap(), md(45));
        assert_eq!(parse_duration("45min").unwrap(), md(45));
        assert_eq!(parse_duration("1h").unwrap(), md(60));
        assert_eq!(parse_duration("1h30min").unwrap(), md(90));
        assert_eq!(parse_duration("2h15min").unwrap(), md(135));
        assert_eq!(parse_duration(" 1H30MIN ").unwrap(), md(90));
    }

    #[test]
    fn test_parse_duration_rejects_malformed_inputs() {
        for bad in ["", "h30min", "1h30", "min", "30m", "1.5h", "-10"] {
            assert!(
                matches!(parse_duration(bad), Err(ClockError::BadDuration(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_duration_from_minutes_rejects_negative() {
        assert_eq!(duration_from_minutes(30).unwrap(), md(30));
        assert!(duration_from_minutes(-1).is_err());
    }

    #[test]
    fn test_parse_window() {
        let w = parse_window("09:00-17:00").unwrap();
        assert_eq!(w.start().value(), 540);
        assert_eq!(w.end().value(), 1020);
    }

    #[test]
    fn test_parse_window_rejects_reversed_or_malformed() {
        for bad in ["17:00-09:00", "09:00", "09:00-09:00", "09:00/17:00"] {
            assert!(
                matches!(parse_window(bad), Err(ClockError::BadWindow(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_to_slots_requires_alignment() {
        assert_eq!(to_slots(md(45), md(15)).unwrap().value(), 3);
        assert!(matches!(
            to_slots(md(40), md(15)),
            Err(ClockError::UnalignedBoundary(_))
        ));
    }

    #[test]
    fn test_slot_round_trip() {
        let slot = md(15);
        for minutes in (0..=480).step_by(15) {
            let slots = to_slots(md(minutes), slot).unwrap();
            assert_eq!(from_slots(slots, slot), md(minutes));
        }
    }
}
