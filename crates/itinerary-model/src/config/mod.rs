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

//! The declarative configuration document and its validator.
//!
//! The validator performs every structural, referential, and semantic check
//! before any solving happens. Deeper infeasibility (a day that simply does
//! not fit) is the solver's to report, not the validator's.

pub mod err;

pub use err::ConfigError;

use crate::instance::SessionPosition;
use itinerary_core::clock::{
    duration_from_minutes, parse_duration, parse_time, parse_window, to_slots, ClockError,
};
use itinerary_core::prelude::{MinuteDelta, MinutePoint, SlotDelta, SlotInterval, SlotPoint};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

fn default_start_time() -> String {
    "08:30".to_string()
}

fn default_end_time() -> String {
    "17:00".to_string()
}

fn default_slot_duration_minutes() -> i64 {
    15
}

fn default_max_gap_minutes() -> i64 {
    15
}

/// A panel duration: either raw minutes or a duration string like `"1h30min"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    Minutes(i64),
    Text(String),
}

/// One window string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WindowsSpec {
    One(String),
    Many(Vec<String>),
}

impl WindowsSpec {
    fn as_slice(&self) -> &[String] {
        match self {
            WindowsSpec::One(w) => std::slice::from_ref(w),
            WindowsSpec::Many(ws) => ws,
        }
    }
}

/// `"first"`, `"last"`, or a 0-based chronological rank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PositionSpec {
    Rank(i64),
    Keyword(String),
}

/// The recognized configuration keys. Unrecognized keys are rejected at
/// deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    pub num_candidates: usize,
    pub panels: BTreeMap<String, DurationSpec>,
    pub order: Vec<String>,
    pub availabilities: BTreeMap<String, WindowsSpec>,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_slot_duration_minutes")]
    pub slot_duration_minutes: i64,
    #[serde(default = "default_max_gap_minutes")]
    pub max_gap_minutes: i64,
    #[serde(default)]
    pub position_constraints: BTreeMap<String, PositionSpec>,
    #[serde(default)]
    pub panel_conflicts: Vec<Vec<String>>,
}

/// The slot-normalized content of a valid configuration, consumed by the
/// instance builder. Panel indices follow catalog order.
#[derive(Debug, Clone)]
pub(crate) struct Normalized {
    pub slot_minutes: MinuteDelta,
    pub day_start: MinutePoint,
    pub horizon: SlotDelta,
    pub max_gap_slots: SlotDelta,
    pub candidates: usize,
    pub panels: Vec<(String, SlotDelta)>,
    pub windows: Vec<Vec<SlotInterval>>,
    pub order: Vec<usize>,
    pub positions: BTreeMap<usize, SessionPosition>,
    pub conflicts: Vec<BTreeSet<usize>>,
}

impl ScheduleConfig {
    /// Checks the document without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.normalize().map(|_| ())
    }

    fn clock(field: impl Into<String>) -> impl FnOnce(ClockError) -> ConfigError {
        let field = field.into();
        move |source| ConfigError::Clock { field, source }
    }

    pub(crate) fn normalize(&self) -> Result<Normalized, ConfigError> {
        if self.num_candidates < 1 {
            return Err(ConfigError::NoCandidates);
        }
        if self.panels.is_empty() {
            return Err(ConfigError::NoPanels);
        }
        if self.slot_duration_minutes < 1 {
            return Err(ConfigError::BadSlotDuration {
                minutes: self.slot_duration_minutes,
            });
        }
        if self.max_gap_minutes < 0 {
            return Err(ConfigError::NegativeMaxGap {
                minutes: self.max_gap_minutes,
            });
        }
        let slot_minutes = MinuteDelta::new(self.slot_duration_minutes);

        let day_start = parse_time(&self.start_time).map_err(Self::clock("start_time"))?;
        let day_end = parse_time(&self.end_time).map_err(Self::clock("end_time"))?;
        if day_end <= day_start {
            return Err(ConfigError::DayEndsBeforeStart {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        let horizon = to_slots(day_end - day_start, slot_minutes).map_err(Self::clock("end_time"))?;

        // Ceiling, so a gap limit below one slot still allows back-to-back.
        let max_gap_slots =
            SlotDelta::new((self.max_gap_minutes + self.slot_duration_minutes - 1)
                / self.slot_duration_minutes);

        // Panel catalog in map order; names intern to their position.
        let mut panels: Vec<(String, SlotDelta)> = Vec::with_capacity(self.panels.len());
        let mut index_of: BTreeMap<&str, usize> = BTreeMap::new();
        for (name, spec) in &self.panels {
            let field = format!("panels.{name}");
            let minutes = match spec {
                DurationSpec::Minutes(m) => {
                    duration_from_minutes(*m).map_err(Self::clock(field.clone()))?
                }
                DurationSpec::Text(s) => parse_duration(s).map_err(Self::clock(field.clone()))?,
            };
            let dur = to_slots(minutes, slot_minutes).map_err(Self::clock(field))?;
            if dur.value() < 1 {
                return Err(ConfigError::ZeroDuration { name: name.clone() });
            }
            index_of.insert(name.as_str(), panels.len());
            panels.push((name.clone(), dur));
        }

        // Soft order: known panels only, no duplicates, partial lists allowed.
        let mut order = Vec::with_capacity(self.order.len());
        let mut seen = BTreeSet::new();
        for name in &self.order {
            let idx = *index_of
                .get(name.as_str())
                .ok_or_else(|| ConfigError::UnknownPanel {
                    field: "order",
                    name: name.clone(),
                })?;
            if !seen.insert(idx) {
                return Err(ConfigError::DuplicateOrderEntry { name: name.clone() });
            }
            order.push(idx);
        }

        for name in self.availabilities.keys() {
            if !index_of.contains_key(name.as_str()) {
                return Err(ConfigError::UnknownPanel {
                    field: "availabilities",
                    name: name.clone(),
                });
            }
        }

        let mut windows: Vec<Vec<SlotInterval>> = Vec::with_capacity(panels.len());
        for (name, dur) in &panels {
            let spec = self
                .availabilities
                .get(name)
                .ok_or_else(|| ConfigError::MissingAvailability { name: name.clone() })?;
            let field = format!("availabilities.{name}");
            let mut slots = Vec::new();
            for raw in spec.as_slice() {
                let w = parse_window(raw).map_err(Self::clock(field.clone()))?;
                if w.start() < day_start || w.end() > day_end {
                    return Err(ConfigError::WindowOutsideDay {
                        name: name.clone(),
                        window: raw.clone(),
                    });
                }
                let lo = to_slots(w.start() - day_start, slot_minutes)
                    .map_err(Self::clock(field.clone()))?;
                let hi = to_slots(w.end() - day_start, slot_minutes)
                    .map_err(Self::clock(field.clone()))?;
                slots.push(SlotInterval::new(
                    SlotPoint::new(lo.value()),
                    SlotPoint::new(hi.value()),
                ));
            }
            if !slots.iter().any(|w| w.duration() >= *dur) {
                return Err(ConfigError::NoFittingWindow { name: name.clone() });
            }
            windows.push(slots);
        }

        let mut positions = BTreeMap::new();
        for (name, spec) in &self.position_constraints {
            let idx = *index_of
                .get(name.as_str())
                .ok_or_else(|| ConfigError::UnknownPanel {
                    field: "position_constraints",
                    name: name.clone(),
                })?;
            let pos = match spec {
                PositionSpec::Keyword(kw) => match kw.as_str() {
                    "first" => SessionPosition::First,
                    "last" => SessionPosition::Last,
                    other => {
                        return Err(ConfigError::BadPositionValue {
                            name: name.clone(),
                            value: other.to_string(),
                        })
                    }
                },
                PositionSpec::Rank(k) => {
                    if *k < 0 || *k >= panels.len() as i64 {
                        return Err(ConfigError::PositionOutOfRange {
                            name: name.clone(),
                            index: *k,
                            panel_count: panels.len(),
                        });
                    }
                    SessionPosition::Abs(*k as usize)
                }
            };
            positions.insert(idx, pos);
        }

        let mut conflicts = Vec::with_capacity(self.panel_conflicts.len());
        for (gi, group) in self.panel_conflicts.iter().enumerate() {
            if group.len() < 2 {
                return Err(ConfigError::ConflictGroupTooSmall { index: gi });
            }
            let mut members = BTreeSet::new();
            for name in group {
                let idx = *index_of
                    .get(name.as_str())
                    .ok_or_else(|| ConfigError::UnknownPanel {
                        field: "panel_conflicts",
                        name: name.clone(),
                    })?;
                if !members.insert(idx) {
                    return Err(ConfigError::ConflictGroupDuplicate {
                        index: gi,
                        name: name.clone(),
                    });
                }
            }
            conflicts.push(members);
        }

        Ok(Normalized {
            slot_minutes,
            day_start,
            horizon,
            max_gap_slots,
            candidates: self.num_candidates,
            panels,
            windows,
            order,
            positions,
            conflicts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_json() -> serde_json::Value {
        serde_json::json!({
            "num_candidates": 2,
            "panels": { "Technical": "45min", "HR": 30 },
            "order": ["Technical", "HR"],
            "availabilities": {
                "Technical": "09:00-17:00",
                "HR": ["09:00-12:00", "13:00-17:00"]
            }
        })
    }

    fn config_from(value: serde_json::Value) -> ScheduleConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = config_from(base_json());
        assert_eq!(cfg.start_time, "08:30");
        assert_eq!(cfg.end_time, "17:00");
        assert_eq!(cfg.slot_duration_minutes, 15);
        assert_eq!(cfg.max_gap_minutes, 15);
        assert!(cfg.position_constraints.is_empty());
        assert!(cfg.panel_conflicts.is_empty());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_unrecognized_keys_rejected() {
        let mut v = base_json();
        v["slots_per_day"] = serde_json::json!(34);
        assert!(serde_json::from_value::<ScheduleConfig>(v).is_err());
    }

    #[test]
    fn test_normalize_interns_in_catalog_order() {
        let cfg = config_from(base_json());
        let n = cfg.normalize().unwrap();
        // BTreeMap catalog order: HR before Technical.
        assert_eq!(n.panels[0].0, "HR");
        assert_eq!(n.panels[0].1.value(), 2);
        assert_eq!(n.panels[1].0, "Technical");
        assert_eq!(n.panels[1].1.value(), 3);
        assert_eq!(n.order, vec![1, 0]);
        assert_eq!(n.horizon.value(), 34);
        assert_eq!(n.max_gap_slots.value(), 1);
        // HR windows offset from 08:30: 09:00 is slot 2.
        assert_eq!(n.windows[0][0].start().value(), 2);
        assert_eq!(n.windows[0][0].end().value(), 14);
    }

    #[test]
    fn test_gap_slots_round_up() {
        let mut v = base_json();
        v["max_gap_minutes"] = serde_json::json!(20);
        let n = config_from(v).normalize().unwrap();
        assert_eq!(n.max_gap_slots.value(), 2);
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let mut v = base_json();
        v["num_candidates"] = serde_json::json!(0);
        assert_eq!(
            config_from(v).validate().unwrap_err(),
            ConfigError::NoCandidates
        );
    }

    #[test]
    fn test_unknown_panel_in_order() {
        let mut v = base_json();
        v["order"] = serde_json::json!(["Technical", "Board"]);
        match config_from(v).validate().unwrap_err() {
            ConfigError::UnknownPanel { field: "order", name } => assert_eq!(name, "Board"),
            other => panic!("expected UnknownPanel, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_order_entry_rejected() {
        let mut v = base_json();
        v["order"] = serde_json::json!(["Technical", "HR", "Technical"]);
        match config_from(v).validate().unwrap_err() {
            ConfigError::DuplicateOrderEntry { name } => assert_eq!(name, "Technical"),
            other => panic!("expected DuplicateOrderEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_panel_missing_from_order_is_allowed() {
        let mut v = base_json();
        v["order"] = serde_json::json!(["HR"]);
        config_from(v).validate().unwrap();
    }

    #[test]
    fn test_missing_availability_rejected() {
        let mut v = base_json();
        v["availabilities"] = serde_json::json!({ "Technical": "09:00-17:00" });
        match config_from(v).validate().unwrap_err() {
            ConfigError::MissingAvailability { name } => assert_eq!(name, "HR"),
            other => panic!("expected MissingAvailability, got {other:?}"),
        }
    }

    #[test]
    fn test_window_outside_day_rejected() {
        let mut v = base_json();
        v["availabilities"]["HR"] = serde_json::json!("07:00-12:00");
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::WindowOutsideDay { .. }
        ));
    }

    #[test]
    fn test_unaligned_duration_rejected() {
        let mut v = base_json();
        v["panels"]["HR"] = serde_json::json!("40min");
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::Clock { .. }
        ));
    }

    #[test]
    fn test_no_fitting_window_rejected() {
        let mut v = base_json();
        v["availabilities"]["Technical"] = serde_json::json!("09:00-09:30");
        match config_from(v).validate().unwrap_err() {
            ConfigError::NoFittingWindow { name } => assert_eq!(name, "Technical"),
            other => panic!("expected NoFittingWindow, got {other:?}"),
        }
    }

    #[test]
    fn test_position_values() {
        let mut v = base_json();
        v["position_constraints"] = serde_json::json!({ "HR": "last", "Technical": 0 });
        let n = config_from(v).normalize().unwrap();
        assert_eq!(n.positions.get(&0), Some(&SessionPosition::Last));
        assert_eq!(n.positions.get(&1), Some(&SessionPosition::Abs(0)));

        let mut v = base_json();
        v["position_constraints"] = serde_json::json!({ "HR": "second" });
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::BadPositionValue { .. }
        ));

        let mut v = base_json();
        v["position_constraints"] = serde_json::json!({ "HR": 2 });
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::PositionOutOfRange { .. }
        ));
    }

    #[test]
    fn test_conflict_groups() {
        let mut v = base_json();
        v["panel_conflicts"] = serde_json::json!([["Technical", "HR"]]);
        let n = config_from(v).normalize().unwrap();
        assert_eq!(n.conflicts.len(), 1);
        assert!(n.conflicts[0].contains(&0) && n.conflicts[0].contains(&1));

        let mut v = base_json();
        v["panel_conflicts"] = serde_json::json!([["Technical"]]);
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::ConflictGroupTooSmall { index: 0 }
        ));

        let mut v = base_json();
        v["panel_conflicts"] = serde_json::json!([["HR", "HR"]]);
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::ConflictGroupDuplicate { index: 0, .. }
        ));
    }

    #[test]
    fn test_day_reversed_rejected() {
        let mut v = base_json();
        v["start_time"] = serde_json::json!("17:00");
        v["end_time"] = serde_json::json!("08:30");
        // Windows now fall outside the (empty) day, but the day itself is
        // rejected first.
        assert!(matches!(
            config_from(v).validate().unwrap_err(),
            ConfigError::DayEndsBeforeStart { .. }
        ));
    }
}
