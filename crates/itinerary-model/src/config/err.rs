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

use crate::instance::InstanceError;
use itinerary_core::clock::ClockError;

/// Rejection reasons for a configuration document. Every variant names the
/// offending field or panel so the message is actionable without the input
/// at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoCandidates,
    NoPanels,
    BadSlotDuration {
        minutes: i64,
    },
    NegativeMaxGap {
        minutes: i64,
    },
    Clock {
        field: String,
        source: ClockError,
    },
    DayEndsBeforeStart {
        start: String,
        end: String,
    },
    UnknownPanel {
        field: &'static str,
        name: String,
    },
    DuplicateOrderEntry {
        name: String,
    },
    MissingAvailability {
        name: String,
    },
    ZeroDuration {
        name: String,
    },
    WindowOutsideDay {
        name: String,
        window: String,
    },
    NoFittingWindow {
        name: String,
    },
    BadPositionValue {
        name: String,
        value: String,
    },
    PositionOutOfRange {
        name: String,
        index: i64,
        panel_count: usize,
    },
    ConflictGroupTooSmall {
        index: usize,
    },
    ConflictGroupDuplicate {
        index: usize,
        name: String,
    },
    Instance(InstanceError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            NoCandidates => write!(f, "'num_candidates' must be at least 1"),
            NoPanels => write!(f, "'panels' must declare at least one panel"),
            BadSlotDuration { minutes } => {
                write!(f, "'slot_duration_minutes' must be >= 1, got {minutes}")
            }
            NegativeMaxGap { minutes } => {
                write!(f, "'max_gap_minutes' must be >= 0, got {minutes}")
            }
            Clock { field, source } => write!(f, "'{field}': {source}"),
            DayEndsBeforeStart { start, end } => write!(
                f,
                "'end_time' ({end}) must lie after 'start_time' ({start})"
            ),
            UnknownPanel { field, name } => {
                write!(f, "'{field}' references unknown panel '{name}'")
            }
            DuplicateOrderEntry { name } => {
                write!(f, "'order' lists panel '{name}' more than once")
            }
            MissingAvailability { name } => {
                write!(f, "panel '{name}' has no entry in 'availabilities'")
            }
            ZeroDuration { name } => {
                write!(f, "panel '{name}' must last at least one slot")
            }
            WindowOutsideDay { name, window } => write!(
                f,
                "availability window '{window}' of panel '{name}' lies outside the day"
            ),
            NoFittingWindow { name } => write!(
                f,
                "no availability window of panel '{name}' is long enough for its duration"
            ),
            BadPositionValue { name, value } => write!(
                f,
                "position for panel '{name}' must be 'first', 'last', or a non-negative \
                 integer, got '{value}'"
            ),
            PositionOutOfRange {
                name,
                index,
                panel_count,
            } => write!(
                f,
                "position {index} for panel '{name}' is outside [0, {panel_count})"
            ),
            ConflictGroupTooSmall { index } => write!(
                f,
                "'panel_conflicts' group {index} must list at least 2 panels"
            ),
            ConflictGroupDuplicate { index, name } => write!(
                f,
                "'panel_conflicts' group {index} lists panel '{name}' more than once"
            ),
            Instance(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<InstanceError> for ConfigError {
    fn from(e: InstanceError) -> Self {
        ConfigError::Instance(e)
    }
}
