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

//! Immutable schedule snapshots and their serialized forms.

use crate::common::{CandidateIdentifier, PanelIdentifier};
use crate::instance::Instance;
use itinerary_core::prelude::{SlotInterval, SlotPoint};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Solver-reported quality of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Optimal,
    Feasible,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStatus::Optimal => write!(f, "OPTIMAL"),
            ScheduleStatus::Feasible => write!(f, "FEASIBLE"),
        }
    }
}

/// One concrete occurrence of a panel for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
    interval: SlotInterval,
}

impl Session {
    #[inline]
    pub fn new(
        candidate: CandidateIdentifier,
        panel: PanelIdentifier,
        interval: SlotInterval,
    ) -> Self {
        Self {
            candidate,
            panel,
            interval,
        }
    }

    #[inline]
    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    #[inline]
    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }

    #[inline]
    pub fn interval(&self) -> SlotInterval {
        self.interval
    }

    #[inline]
    pub fn start(&self) -> SlotPoint {
        self.interval.start()
    }

    #[inline]
    pub fn end(&self) -> SlotPoint {
        self.interval.end()
    }
}

/// A complete day plan: every candidate's sessions in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    per_candidate: Vec<Vec<Session>>,
}

impl Schedule {
    /// Groups sessions by candidate and sorts each line by start time.
    pub fn from_sessions(candidates: usize, sessions: impl IntoIterator<Item = Session>) -> Self {
        let mut per_candidate: Vec<Vec<Session>> = vec![Vec::new(); candidates];
        for s in sessions {
            per_candidate[s.candidate().value()].push(s);
        }
        for line in &mut per_candidate {
            line.sort_by_key(|s| (s.start(), s.panel()));
        }
        Self { per_candidate }
    }

    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.per_candidate.len()
    }

    #[inline]
    pub fn sessions(&self, candidate: CandidateIdentifier) -> &[Session] {
        &self.per_candidate[candidate.value()]
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.per_candidate.iter().flatten()
    }

    #[inline]
    pub fn session_of(
        &self,
        candidate: CandidateIdentifier,
        panel: PanelIdentifier,
    ) -> Option<&Session> {
        self.sessions(candidate).iter().find(|s| s.panel() == panel)
    }

    /// Latest end over all sessions.
    pub fn makespan(&self) -> SlotPoint {
        self.iter()
            .map(|s| s.end())
            .max()
            .unwrap_or_else(SlotPoint::zero)
    }

    /// Counts adjacent preferred-order pairs whose actual order is reversed:
    /// the earlier-preferred panel does not finish before the next starts.
    pub fn count_order_breaks(&self, instance: &Instance) -> usize {
        let order = instance.preferred_order();
        let mut breaks = 0;
        for candidate in instance.iter_candidates() {
            for pair in order.windows(2) {
                let a = self.session_of(candidate, pair[0]);
                let b = self.session_of(candidate, pair[1]);
                if let (Some(a), Some(b)) = (a, b) {
                    if a.end() > b.start() {
                        breaks += 1;
                    }
                }
            }
        }
        breaks
    }

    /// Renders the slot-by-candidate grid the coordinators print out:
    /// one row per slot, one column per candidate, panel names in occupied
    /// cells.
    pub fn to_csv_grid(&self, instance: &Instance, date_label: &str) -> String {
        let horizon = instance.horizon().value();
        let candidates = self.candidate_count();
        let mut grid = vec![vec![String::new(); candidates]; horizon as usize];
        for s in self.iter() {
            let name = instance.panel(s.panel()).name();
            for slot in s.start().value()..s.end().value() {
                if slot < horizon {
                    grid[slot as usize][s.candidate().value()] = name.to_string();
                }
            }
        }

        let mut out = String::new();
        out.push_str(date_label);
        for c in 0..candidates {
            out.push_str(&format!(",CANDIDATE {}", c + 1));
        }
        out.push('\n');
        for slot in 0..horizon {
            let from = instance.slot_label(SlotPoint::new(slot));
            let to = instance.slot_label(SlotPoint::new(slot + 1));
            out.push_str(&format!("{from}-{to}"));
            for cell in &grid[slot as usize] {
                out.push(',');
                out.push_str(cell);
            }
            out.push('\n');
        }
        out
    }

    /// Builds the serializable document shape for this schedule.
    pub fn render(&self, instance: &Instance, summary: Summary) -> SolutionDocument {
        let mut schedules = Vec::with_capacity(self.candidate_count());
        for candidate in instance.iter_candidates() {
            let mut sessions = Vec::new();
            let mut previous_end: Option<SlotPoint> = None;
            for s in self.sessions(candidate) {
                let gap_before_minutes = previous_end
                    .map(|e| (s.start().value() - e.value()) * instance.slot_minutes().value());
                sessions.push(SessionDocument {
                    panel: instance.panel(s.panel()).name().to_string(),
                    start_time: instance.slot_label(s.start()),
                    end_time: instance.slot_label(s.end()),
                    duration_minutes: s.interval().duration().value()
                        * instance.slot_minutes().value(),
                    gap_before_minutes,
                });
                previous_end = Some(s.end());
            }
            schedules.push((format!("candidate_{}", candidate.value() + 1), sessions));
        }
        SolutionDocument { schedules, summary }
    }
}

/// Headline metrics of a returned schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub status: ScheduleStatus,
    pub order_breaks: usize,
    pub day_end_time: String,
    pub max_gap_enforced: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDocument {
    pub panel: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_before_minutes: Option<i64>,
}

/// The §-shaped response payload: a `schedules` map keyed `candidate_1…` in
/// candidate order plus the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDocument {
    pub schedules: Vec<(String, Vec<SessionDocument>)>,
    pub summary: Summary,
}

impl Serialize for SolutionDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Shape<'a> {
            schedules: CandidateMap<'a>,
            summary: &'a Summary,
        }

        struct CandidateMap<'a>(&'a [(String, Vec<SessionDocument>)]);

        impl Serialize for CandidateMap<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, sessions) in self.0 {
                    map.serialize_entry(name, sessions)?;
                }
                map.end()
            }
        }

        Shape {
            schedules: CandidateMap(&self.schedules),
            summary: &self.summary,
        }
        .serialize(serializer)
    }
}
