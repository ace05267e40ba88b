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

//! The immutable canonical problem instance.
//!
//! Panel names are interned to indices at this boundary; everything past it
//! works with [`PanelIdentifier`] and slot indices only.

pub mod err;

pub use err::InstanceError;

use crate::common::{CandidateIdentifier, PanelIdentifier};
use crate::config::{ConfigError, ScheduleConfig};
use itinerary_core::clock::{format_time, from_slots};
use itinerary_core::prelude::{MinuteDelta, MinutePoint, SlotDelta, SlotInterval, SlotPoint};
use rangemap::RangeSet;
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// How many candidates a panel can host at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    Single,
    Unlimited,
}

/// A hard chronological position within a candidate's session sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPosition {
    First,
    Last,
    Abs(usize),
}

impl std::fmt::Display for SessionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPosition::First => write!(f, "first"),
            SessionPosition::Last => write!(f, "last"),
            SessionPosition::Abs(k) => write!(f, "{k}"),
        }
    }
}

/// The panel named exactly like this hosts all candidates at once.
pub const UNLIMITED_CAPACITY_PANEL: &str = "Lunch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    id: PanelIdentifier,
    name: String,
    duration: SlotDelta,
    capacity: Capacity,
    availability: RangeSet<SlotPoint>,
}

impl Panel {
    pub fn from_windows<I>(
        id: PanelIdentifier,
        name: impl Into<String>,
        duration: SlotDelta,
        capacity: Capacity,
        windows: I,
    ) -> Self
    where
        I: IntoIterator<Item = SlotInterval>,
    {
        Self {
            id,
            name: name.into(),
            duration,
            capacity,
            availability: RangeSet::from_iter(
                windows
                    .into_iter()
                    .filter(|w| !w.is_empty())
                    .map(|w| w.into_range()),
            ),
        }
    }

    #[inline]
    pub fn id(&self) -> PanelIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn duration(&self) -> SlotDelta {
        self.duration
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    pub fn iter_windows(&self) -> impl Iterator<Item = SlotInterval> + '_ {
        self.availability
            .iter()
            .map(|r| SlotInterval::new(r.start, r.end))
    }

    /// Coalesced windows in ascending order.
    #[inline]
    pub fn windows(&self) -> SmallVec<[SlotInterval; 4]> {
        self.iter_windows().collect()
    }

    /// True when the interval lies fully inside the availability mask.
    #[inline]
    pub fn covers(&self, iv: SlotInterval) -> bool {
        if iv.is_empty() {
            return true;
        }
        let (s, e) = iv.into_inner();
        self.availability.gaps(&(s..e)).next().is_none()
    }

    /// True when at least one window can host a full session.
    #[inline]
    pub fn fits_somewhere(&self) -> bool {
        self.iter_windows().any(|w| w.duration() >= self.duration)
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    slot_minutes: MinuteDelta,
    day_start: MinutePoint,
    horizon: SlotDelta,
    candidates: usize,
    panels: Vec<Panel>,
    preferred_order: Vec<PanelIdentifier>,
    position_constraints: BTreeMap<PanelIdentifier, SessionPosition>,
    conflict_groups: Vec<BTreeSet<PanelIdentifier>>,
    max_gap: SlotDelta,
}

impl Instance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slot_minutes: MinuteDelta,
        day_start: MinutePoint,
        horizon: SlotDelta,
        candidates: usize,
        panels: Vec<Panel>,
        preferred_order: Vec<PanelIdentifier>,
        position_constraints: BTreeMap<PanelIdentifier, SessionPosition>,
        conflict_groups: Vec<BTreeSet<PanelIdentifier>>,
        max_gap: SlotDelta,
    ) -> Result<Self, InstanceError> {
        if panels.is_empty() {
            return Err(InstanceError::NoPanels);
        }
        if horizon.value() < 1 {
            return Err(InstanceError::EmptyHorizon);
        }
        if candidates < 1 {
            return Err(InstanceError::NoCandidates);
        }
        if max_gap.value() < 0 {
            return Err(InstanceError::NegativeGap);
        }

        let day = SlotInterval::new(SlotPoint::zero(), SlotPoint::zero() + horizon);
        for (i, panel) in panels.iter().enumerate() {
            if panel.id().value() != i {
                return Err(InstanceError::PanelIndexMismatch {
                    expected: i,
                    found: panel.id(),
                });
            }
            if panel.duration().value() < 1 {
                return Err(InstanceError::DurationTooShort { panel: panel.id() });
            }
            if panel.iter_windows().any(|w| !day.contains(&w)) {
                return Err(InstanceError::WindowOutsideHorizon { panel: panel.id() });
            }
        }

        let count = panels.len();
        let mut seen = BTreeSet::new();
        for &p in &preferred_order {
            if p.value() >= count {
                return Err(InstanceError::BadPanelIndex {
                    context: "preferred order",
                    panel: p,
                });
            }
            if !seen.insert(p) {
                return Err(InstanceError::DuplicateOrderIndex { panel: p });
            }
        }
        for (&p, pos) in &position_constraints {
            if p.value() >= count {
                return Err(InstanceError::BadPanelIndex {
                    context: "position constraints",
                    panel: p,
                });
            }
            if let SessionPosition::Abs(k) = pos {
                if *k >= count {
                    return Err(InstanceError::BadPositionRank {
                        panel: p,
                        rank: *k,
                        panel_count: count,
                    });
                }
            }
        }
        for (gi, group) in conflict_groups.iter().enumerate() {
            if group.len() < 2 {
                return Err(InstanceError::ConflictGroupTooSmall { index: gi });
            }
            for &p in group {
                if p.value() >= count {
                    return Err(InstanceError::BadPanelIndex {
                        context: "conflict groups",
                        panel: p,
                    });
                }
            }
        }

        Ok(Self {
            slot_minutes,
            day_start,
            horizon,
            candidates,
            panels,
            preferred_order,
            position_constraints,
            conflict_groups,
            max_gap,
        })
    }

    /// Validates a configuration document and builds the canonical instance.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        let n = config.normalize()?;
        let panels: Vec<Panel> = n
            .panels
            .iter()
            .zip(n.windows.iter())
            .enumerate()
            .map(|(i, ((name, dur), windows))| {
                let capacity = if name == UNLIMITED_CAPACITY_PANEL {
                    Capacity::Unlimited
                } else {
                    Capacity::Single
                };
                Panel::from_windows(
                    PanelIdentifier::new(i),
                    name.clone(),
                    *dur,
                    capacity,
                    windows.iter().copied(),
                )
            })
            .collect();

        let instance = Instance::new(
            n.slot_minutes,
            n.day_start,
            n.horizon,
            n.candidates,
            panels,
            n.order.into_iter().map(PanelIdentifier::new).collect(),
            n.positions
                .into_iter()
                .map(|(p, pos)| (PanelIdentifier::new(p), pos))
                .collect(),
            n.conflicts
                .into_iter()
                .map(|g| g.into_iter().map(PanelIdentifier::new).collect())
                .collect(),
            n.max_gap_slots,
        )?;
        Ok(instance)
    }

    #[inline]
    pub fn slot_minutes(&self) -> MinuteDelta {
        self.slot_minutes
    }

    #[inline]
    pub fn day_start(&self) -> MinutePoint {
        self.day_start
    }

    #[inline]
    pub fn horizon(&self) -> SlotDelta {
        self.horizon
    }

    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    #[inline]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    pub fn session_count(&self) -> usize {
        self.candidates * self.panels.len()
    }

    #[inline]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    #[inline]
    pub fn panel(&self, id: PanelIdentifier) -> &Panel {
        &self.panels[id.value()]
    }

    #[inline]
    pub fn panel_by_name(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name() == name)
    }

    #[inline]
    pub fn iter_candidates(&self) -> impl Iterator<Item = CandidateIdentifier> {
        (0..self.candidates).map(CandidateIdentifier::new)
    }

    #[inline]
    pub fn preferred_order(&self) -> &[PanelIdentifier] {
        &self.preferred_order
    }

    #[inline]
    pub fn position_constraints(&self) -> &BTreeMap<PanelIdentifier, SessionPosition> {
        &self.position_constraints
    }

    #[inline]
    pub fn conflict_groups(&self) -> &[BTreeSet<PanelIdentifier>] {
        &self.conflict_groups
    }

    #[inline]
    pub fn max_gap(&self) -> SlotDelta {
        self.max_gap
    }

    #[inline]
    pub fn max_gap_minutes(&self) -> i64 {
        from_slots(self.max_gap, self.slot_minutes).value()
    }

    /// Wall-clock minute of a slot boundary.
    #[inline]
    pub fn minute_of(&self, slot: SlotPoint) -> MinutePoint {
        self.day_start + MinuteDelta::new(slot.value() * self.slot_minutes.value())
    }

    /// `HH:MM` label of a slot boundary.
    #[inline]
    pub fn slot_label(&self, slot: SlotPoint) -> String {
        format_time(self.minute_of(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_config() -> ScheduleConfig {
        serde_json::from_value(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Technical": "45min", "HR": "30min", "Lunch": "1h" },
            "order": ["Technical", "Lunch", "HR"],
            "availabilities": {
                "Technical": "09:00-17:00",
                "HR": "09:00-17:00",
                "Lunch": "11:45-13:30"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_config_interns_and_normalizes() {
        let instance = Instance::from_config(&canonical_config()).unwrap();
        assert_eq!(instance.panel_count(), 3);
        assert_eq!(instance.candidate_count(), 2);
        assert_eq!(instance.horizon().value(), 34);

        // Catalog order is the config map order: HR, Lunch, Technical.
        assert_eq!(instance.panels()[0].name(), "HR");
        assert_eq!(instance.panels()[1].name(), "Lunch");
        assert_eq!(instance.panels()[2].name(), "Technical");

        let tech = instance.panel_by_name("Technical").unwrap();
        assert_eq!(tech.duration().value(), 3);
        assert_eq!(tech.capacity(), Capacity::Single);
        let lunch = instance.panel_by_name("Lunch").unwrap();
        assert_eq!(lunch.capacity(), Capacity::Unlimited);
        // 11:45 is slot 13, 13:30 is slot 20 from an 08:30 day start.
        assert_eq!(lunch.windows()[0].start().value(), 13);
        assert_eq!(lunch.windows()[0].end().value(), 20);

        let order: Vec<&str> = instance
            .preferred_order()
            .iter()
            .map(|&p| instance.panel(p).name())
            .collect();
        assert_eq!(order, vec!["Technical", "Lunch", "HR"]);
    }

    #[test]
    fn test_slot_labels() {
        let instance = Instance::from_config(&canonical_config()).unwrap();
        assert_eq!(instance.slot_label(SlotPoint::new(0)), "08:30");
        assert_eq!(instance.slot_label(SlotPoint::new(2)), "09:00");
        assert_eq!(instance.slot_label(SlotPoint::new(34)), "17:00");
    }

    #[test]
    fn test_panel_windows_coalesce() {
        let p = Panel::from_windows(
            PanelIdentifier::new(0),
            "Team",
            SlotDelta::new(2),
            Capacity::Single,
            [
                SlotInterval::new(SlotPoint::new(0), SlotPoint::new(4)),
                SlotInterval::new(SlotPoint::new(4), SlotPoint::new(8)),
                SlotInterval::new(SlotPoint::new(10), SlotPoint::new(12)),
            ],
        );
        let windows = p.windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start().value(), 0);
        assert_eq!(windows[0].end().value(), 8);
        assert!(p.covers(SlotInterval::new(SlotPoint::new(2), SlotPoint::new(6))));
        assert!(!p.covers(SlotInterval::new(SlotPoint::new(7), SlotPoint::new(11))));
        assert!(p.fits_somewhere());
    }

    #[test]
    fn test_canonical_demo_config_builds() {
        use std::path::{Path, PathBuf};

        fn find_demos_dir() -> Option<PathBuf> {
            let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
            while let Some(p) = cur {
                let cand = p.join("demos");
                if cand.is_dir() {
                    return Some(cand);
                }
                cur = p.parent();
            }
            None
        }

        let demos = find_demos_dir().expect("no demos/ directory above the crate");
        let raw = std::fs::read_to_string(demos.join("canonical.json")).unwrap();
        let config: ScheduleConfig = serde_json::from_str(&raw).unwrap();
        let instance = Instance::from_config(&config).unwrap();

        assert_eq!(instance.candidate_count(), 3);
        assert_eq!(instance.panel_count(), 7);
        assert_eq!(instance.horizon().value(), 34);
        assert_eq!(instance.max_gap().value(), 1);
        assert_eq!(
            instance.panel_by_name("Lunch").unwrap().capacity(),
            Capacity::Unlimited
        );
        assert_eq!(instance.conflict_groups().len(), 1);
        let goodbye = instance.panel_by_name("Goodbye").unwrap().id();
        assert_eq!(
            instance.position_constraints().get(&goodbye),
            Some(&SessionPosition::Last)
        );
        assert_eq!(
            instance.panel_by_name("Competencies").unwrap().windows().len(),
            3
        );
    }

    #[test]
    fn test_new_rejects_misindexed_panels() {
        let panels = vec![Panel::from_windows(
            PanelIdentifier::new(1),
            "HR",
            SlotDelta::new(2),
            Capacity::Single,
            [SlotInterval::new(SlotPoint::new(0), SlotPoint::new(4))],
        )];
        let err = Instance::new(
            MinuteDelta::new(15),
            MinutePoint::new(510),
            SlotDelta::new(34),
            1,
            panels,
            vec![],
            BTreeMap::new(),
            vec![],
            SlotDelta::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::PanelIndexMismatch { .. }));
    }

    #[test]
    fn test_new_rejects_window_outside_horizon() {
        let panels = vec![Panel::from_windows(
            PanelIdentifier::new(0),
            "HR",
            SlotDelta::new(2),
            Capacity::Single,
            [SlotInterval::new(SlotPoint::new(30), SlotPoint::new(40))],
        )];
        let err = Instance::new(
            MinuteDelta::new(15),
            MinutePoint::new(510),
            SlotDelta::new(34),
            1,
            panels,
            vec![],
            BTreeMap::new(),
            vec![],
            SlotDelta::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::WindowOutsideHorizon { .. }));
    }
}
