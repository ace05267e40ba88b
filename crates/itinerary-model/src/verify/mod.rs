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

//! Post-solve re-validation of every hard invariant.
//!
//! The solver's answer is never trusted: before a schedule leaves the
//! library, every constraint is checked again against the instance. A
//! failure here is a modeling bug and is treated as fatal by the driver.

pub mod err;

pub use err::VerificationError;

use crate::common::{CandidateIdentifier, PanelIdentifier};
use crate::instance::{Capacity, Instance, SessionPosition};
use crate::solution::{Schedule, Session};
use itinerary_core::prelude::SlotPoint;
use rangemap::RangeSet;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ScheduleVerifier;

impl ScheduleVerifier {
    /// Re-checks every hard constraint and the claimed order-break count.
    pub fn verify(
        instance: &Instance,
        schedule: &Schedule,
        claimed_order_breaks: usize,
    ) -> Result<(), VerificationError> {
        Self::verify_completeness(instance, schedule)?;
        Self::verify_sessions(instance, schedule)?;
        Self::verify_candidate_lines(instance, schedule)?;
        Self::verify_capacity(instance, schedule)?;
        Self::verify_conflict_groups(instance, schedule)?;
        Self::verify_positions(instance, schedule)?;

        let actual = schedule.count_order_breaks(instance);
        if actual != claimed_order_breaks {
            return Err(err::BreakCountError::new(claimed_order_breaks, actual).into());
        }
        Ok(())
    }

    fn verify_completeness(
        instance: &Instance,
        schedule: &Schedule,
    ) -> Result<(), VerificationError> {
        for candidate in instance.iter_candidates() {
            let mut seen: BTreeSet<PanelIdentifier> = BTreeSet::new();
            for s in schedule.sessions(candidate) {
                if !seen.insert(s.panel()) {
                    return Err(err::DuplicateSessionError::new(candidate, s.panel()).into());
                }
            }
            for panel in instance.panels() {
                if !seen.contains(&panel.id()) {
                    return Err(err::MissingSessionError::new(candidate, panel.id()).into());
                }
            }
        }
        Ok(())
    }

    fn verify_sessions(instance: &Instance, schedule: &Schedule) -> Result<(), VerificationError> {
        let horizon = SlotPoint::zero() + instance.horizon();
        for s in schedule.iter() {
            let panel = instance.panel(s.panel());
            if s.interval().duration() != panel.duration() {
                return Err(err::SessionLengthError::new(
                    s.candidate(),
                    s.panel(),
                    panel.duration().value(),
                    s.interval().duration().value(),
                )
                .into());
            }
            if s.start() < SlotPoint::zero() || s.end() > horizon {
                return Err(err::DayBoundsError::new(s.candidate(), s.panel()).into());
            }
            if !panel.covers(s.interval()) {
                return Err(err::OutsideAvailabilityError::new(s.candidate(), s.panel()).into());
            }
        }
        Ok(())
    }

    fn verify_candidate_lines(
        instance: &Instance,
        schedule: &Schedule,
    ) -> Result<(), VerificationError> {
        let limit = instance.max_gap().value();
        for candidate in instance.iter_candidates() {
            let sessions = schedule.sessions(candidate);
            for pair in sessions.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if b.start() < a.end() {
                    return Err(
                        err::DoubleBookingError::new(candidate, a.panel(), b.panel()).into(),
                    );
                }
                let gap = b.start().value() - a.end().value();
                if gap > limit {
                    return Err(err::GapExceededError::new(
                        candidate,
                        a.panel(),
                        b.panel(),
                        gap,
                        limit,
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    fn verify_capacity(instance: &Instance, schedule: &Schedule) -> Result<(), VerificationError> {
        for panel in instance.panels() {
            if panel.capacity() == Capacity::Unlimited {
                continue;
            }
            let mut occupied: RangeSet<SlotPoint> = RangeSet::new();
            let mut holders: Vec<(CandidateIdentifier, SlotPoint, SlotPoint)> = Vec::new();
            for candidate in instance.iter_candidates() {
                let Some(s) = schedule.session_of(candidate, panel.id()) else {
                    continue;
                };
                let range = s.start()..s.end();
                if occupied.overlaps(&range) {
                    let other = holders
                        .iter()
                        .find(|(_, hs, he)| s.start() < *he && *hs < s.end())
                        .map(|(c, _, _)| *c)
                        .unwrap_or(candidate);
                    return Err(err::CapacityOverlapError::new(panel.id(), other, candidate).into());
                }
                occupied.insert(range);
                holders.push((candidate, s.start(), s.end()));
            }
        }
        Ok(())
    }

    fn verify_conflict_groups(
        instance: &Instance,
        schedule: &Schedule,
    ) -> Result<(), VerificationError> {
        for (gi, group) in instance.conflict_groups().iter().enumerate() {
            let mut sessions: Vec<&Session> = schedule
                .iter()
                .filter(|s| group.contains(&s.panel()))
                .collect();
            sessions.sort_by_key(|s| s.start());
            for pair in sessions.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if b.start() < a.end() {
                    return Err(err::ConflictOverlapError::new(
                        gi,
                        a.candidate(),
                        a.panel(),
                        b.candidate(),
                        b.panel(),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    fn verify_positions(instance: &Instance, schedule: &Schedule) -> Result<(), VerificationError> {
        if instance.position_constraints().is_empty() {
            return Ok(());
        }
        let last_rank = instance.panel_count() - 1;
        for candidate in instance.iter_candidates() {
            for (rank, s) in schedule.sessions(candidate).iter().enumerate() {
                let Some(expected) = instance.position_constraints().get(&s.panel()) else {
                    continue;
                };
                let ok = match expected {
                    SessionPosition::First => rank == 0,
                    SessionPosition::Last => rank == last_rank,
                    SessionPosition::Abs(k) => rank == *k,
                };
                if !ok {
                    return Err(err::PositionViolationError::new(
                        candidate,
                        s.panel(),
                        *expected,
                        rank,
                    )
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;
    use itinerary_core::prelude::SlotInterval;

    fn instance() -> Instance {
        let config: ScheduleConfig = serde_json::from_value(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Technical": "45min", "HR": "30min" },
            "order": ["Technical", "HR"],
            "availabilities": {
                "Technical": "09:00-17:00",
                "HR": "09:00-17:00"
            }
        }))
        .unwrap();
        Instance::from_config(&config).unwrap()
    }

    fn session(c: usize, p: usize, start: i64, end: i64) -> Session {
        Session::new(
            CandidateIdentifier::new(c),
            PanelIdentifier::new(p),
            SlotInterval::new(SlotPoint::new(start), SlotPoint::new(end)),
        )
    }

    // Catalog order: HR = 0 (2 slots), Technical = 1 (3 slots).
    fn good_schedule() -> Schedule {
        Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 5, 7),
                session(1, 1, 5, 8),
                session(1, 0, 8, 10),
            ],
        )
    }

    #[test]
    fn test_good_schedule_passes() {
        ScheduleVerifier::verify(&instance(), &good_schedule(), 0).unwrap();
    }

    #[test]
    fn test_missing_session_detected() {
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 5, 7),
                session(1, 1, 5, 8),
            ],
        );
        assert!(matches!(
            ScheduleVerifier::verify(&instance(), &schedule, 0).unwrap_err(),
            VerificationError::MissingSession(_)
        ));
    }

    #[test]
    fn test_double_booking_detected() {
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 4, 6),
                session(1, 1, 6, 9),
                session(1, 0, 9, 11),
            ],
        );
        assert!(matches!(
            ScheduleVerifier::verify(&instance(), &schedule, 0).unwrap_err(),
            VerificationError::DoubleBooking(_)
        ));
    }

    #[test]
    fn test_capacity_overlap_detected() {
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 5, 7),
                session(1, 1, 4, 7),
                session(1, 0, 7, 9),
            ],
        );
        let err = ScheduleVerifier::verify(&instance(), &schedule, 0).unwrap_err();
        match err {
            VerificationError::CapacityOverlap(e) => {
                assert_eq!(e.panel(), PanelIdentifier::new(1));
            }
            other => panic!("expected CapacityOverlap, got {other:?}"),
        }
    }

    #[test]
    fn test_gap_exceeded_detected() {
        // HR starts 2 slots after Technical ends; the limit is 1.
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 7, 9),
                session(1, 1, 5, 8),
                session(1, 0, 9, 11),
            ],
        );
        let err = ScheduleVerifier::verify(&instance(), &schedule, 0).unwrap_err();
        match err {
            VerificationError::GapExceeded(e) => assert_eq!(e.gap_slots(), 2),
            other => panic!("expected GapExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_outside_availability_detected() {
        // Technical availability starts at slot 2 (09:00).
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 0, 3),
                session(0, 0, 3, 5),
                session(1, 1, 3, 6),
                session(1, 0, 6, 8),
            ],
        );
        assert!(matches!(
            ScheduleVerifier::verify(&instance(), &schedule, 0).unwrap_err(),
            VerificationError::OutsideAvailability(_)
        ));
    }

    #[test]
    fn test_break_count_mismatch_detected() {
        assert!(matches!(
            ScheduleVerifier::verify(&instance(), &good_schedule(), 3).unwrap_err(),
            VerificationError::BreakCount(_)
        ));
    }

    #[test]
    fn test_position_violation_detected() {
        let config: ScheduleConfig = serde_json::from_value(serde_json::json!({
            "num_candidates": 1,
            "panels": { "Technical": "45min", "HR": "30min" },
            "order": ["Technical", "HR"],
            "availabilities": {
                "Technical": "09:00-17:00",
                "HR": "09:00-17:00"
            },
            "position_constraints": { "Technical": "last" }
        }))
        .unwrap();
        let instance = Instance::from_config(&config).unwrap();
        // Technical first although constrained last.
        let schedule = Schedule::from_sessions(1, [session(0, 1, 2, 5), session(0, 0, 5, 7)]);
        assert!(matches!(
            ScheduleVerifier::verify(&instance, &schedule, 0).unwrap_err(),
            VerificationError::PositionViolation(_)
        ));
    }

    #[test]
    fn test_conflict_overlap_detected() {
        let config: ScheduleConfig = serde_json::from_value(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Team": "45min", "Goodbye": "30min" },
            "order": ["Team", "Goodbye"],
            "availabilities": {
                "Team": "09:00-17:00",
                "Goodbye": "09:00-17:00"
            },
            "panel_conflicts": [["Team", "Goodbye"]]
        }))
        .unwrap();
        let instance = Instance::from_config(&config).unwrap();
        // Catalog order: Goodbye = 0, Team = 1. Candidate 0's Goodbye
        // overlaps candidate 1's Team.
        let schedule = Schedule::from_sessions(
            2,
            [
                session(0, 1, 2, 5),
                session(0, 0, 5, 7),
                session(1, 1, 6, 9),
                session(1, 0, 9, 11),
            ],
        );
        assert!(matches!(
            ScheduleVerifier::verify(&instance, &schedule, 0).unwrap_err(),
            VerificationError::ConflictOverlap(_)
        ));
    }
}
