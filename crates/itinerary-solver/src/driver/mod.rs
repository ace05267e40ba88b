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

//! The solver driver: builds the model, runs the portfolio search under a
//! deadline, extracts, verifies, and reports.

pub mod err;

pub use err::SolveError;

use crate::cp::{self, SearchLimits, SearchStatus};
use crate::diversity::DiversityController;
use crate::extract::{extract_schedule, summarize};
use crate::model::SessionModel;
use itinerary_model::prelude::{Instance, Schedule, ScheduleStatus, ScheduleVerifier, Summary};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Wall-clock budget for one `solve` call, or a whole `solve_multi` run.
    pub max_time: Duration,
    /// Portfolio width. One worker is fully deterministic.
    pub workers: usize,
    /// Seed for the branching perturbation of workers beyond the first.
    pub seed: Option<u64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(60),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SolveStats {
    pub elapsed: Duration,
    pub decisions: u64,
    pub conflicts: u64,
    pub objective: i64,
}

/// A verified schedule with its summary and search statistics.
#[derive(Debug, Clone)]
pub struct Solved {
    pub schedule: Schedule,
    pub summary: Summary,
    pub stats: SolveStats,
}

#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Optimal(Solved),
    Feasible(Solved),
    Infeasible,
    NoSolutionWithinLimit,
}

impl SolveOutcome {
    #[inline]
    pub fn solved(&self) -> Option<&Solved> {
        match self {
            SolveOutcome::Optimal(s) | SolveOutcome::Feasible(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Solver;

impl Solver {
    /// Solves for one optimal schedule.
    #[tracing::instrument(level = "info", skip(instance, options))]
    pub fn solve(
        instance: &Instance,
        options: &SolveOptions,
    ) -> Result<SolveOutcome, SolveError> {
        let deadline = Instant::now() + options.max_time;
        Self::solve_until(instance, options, deadline, None)
    }

    /// Produces up to `k` pairwise distinct schedules within one time
    /// budget, best first. Stops early when the cut model turns infeasible
    /// or the budget runs out; schedules found so far are kept.
    #[tracing::instrument(level = "info", skip(instance, options))]
    pub fn solve_multi(
        instance: &Instance,
        options: &SolveOptions,
        k: usize,
    ) -> Result<Vec<SolveOutcome>, SolveError> {
        let deadline = Instant::now() + options.max_time;
        let mut controller = DiversityController::new();
        let mut results = Vec::new();
        for round in 0..k {
            if Instant::now() >= deadline {
                break;
            }
            let outcome = Self::solve_until(instance, options, deadline, Some(&controller))?;
            match &outcome {
                SolveOutcome::Optimal(solved) | SolveOutcome::Feasible(solved) => {
                    controller.record(instance, &solved.schedule);
                    tracing::debug!(round, objective = solved.stats.objective, "kept schedule");
                    results.push(outcome);
                }
                _ => break,
            }
        }
        Ok(results)
    }

    fn solve_until(
        instance: &Instance,
        options: &SolveOptions,
        deadline: Instant,
        cuts: Option<&DiversityController>,
    ) -> Result<SolveOutcome, SolveError> {
        let started = Instant::now();
        let mut model = SessionModel::build(instance)?;
        if let Some(cuts) = cuts {
            cuts.apply(&mut model);
        }

        let limits = SearchLimits {
            deadline: Some(deadline),
        };
        let outcome = cp::solve_portfolio(
            model.cp(),
            &limits,
            options.workers.max(1),
            options.seed.unwrap_or(0),
        );

        let status = match outcome.status {
            SearchStatus::Infeasible => {
                tracing::info!("no schedule satisfies the hard constraints");
                return Ok(SolveOutcome::Infeasible);
            }
            SearchStatus::Unknown => {
                tracing::info!(elapsed = ?started.elapsed(), "time limit reached without a schedule");
                return Ok(SolveOutcome::NoSolutionWithinLimit);
            }
            SearchStatus::Optimal => ScheduleStatus::Optimal,
            SearchStatus::Feasible => ScheduleStatus::Feasible,
        };
        let Some(assignment) = outcome.best else {
            return Ok(SolveOutcome::NoSolutionWithinLimit);
        };

        let schedule = extract_schedule(instance, &model, &assignment);
        let summary = summarize(instance, &schedule, status);
        ScheduleVerifier::verify(instance, &schedule, summary.order_breaks)?;

        let expected = model.weight() * summary.order_breaks as i64
            + schedule.makespan().value();
        if expected != assignment.objective() {
            return Err(SolveError::ObjectiveMismatch {
                expected,
                reported: assignment.objective(),
            });
        }

        let solved = Solved {
            schedule,
            summary,
            stats: SolveStats {
                elapsed: started.elapsed(),
                decisions: outcome.stats.decisions,
                conflicts: outcome.stats.conflicts,
                objective: assignment.objective(),
            },
        };
        tracing::info!(
            status = %solved.summary.status,
            order_breaks = solved.summary.order_breaks,
            day_end = %solved.summary.day_end_time,
            "schedule found"
        );
        Ok(match status {
            ScheduleStatus::Optimal => SolveOutcome::Optimal(solved),
            ScheduleStatus::Feasible => SolveOutcome::Feasible(solved),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_model::prelude::{CandidateIdentifier, ScheduleConfig};

    fn instance(value: serde_json::Value) -> Instance {
        let config: ScheduleConfig = serde_json::from_value(value).unwrap();
        Instance::from_config(&config).unwrap()
    }

    fn options() -> SolveOptions {
        SolveOptions {
            max_time: Duration::from_secs(30),
            workers: 1,
            seed: Some(7),
        }
    }

    fn two_candidate_instance() -> Instance {
        instance(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Technical": "45min", "HR": "30min" },
            "order": ["Technical", "HR"],
            "availabilities": {
                "Technical": "09:00-17:00",
                "HR": "09:00-17:00"
            }
        }))
    }

    #[test]
    fn test_two_candidates_back_to_back() {
        let instance = two_candidate_instance();
        let outcome = Solver::solve(&instance, &options()).unwrap();
        let SolveOutcome::Optimal(solved) = outcome else {
            panic!("expected an optimal schedule, got {outcome:?}");
        };

        assert_eq!(solved.summary.order_breaks, 0);
        // Zero breaks force Technical before HR for both candidates; the
        // single Technical room serializes them, so the day ends at 11:00.
        assert_eq!(solved.summary.day_end_time, "11:00");

        let tech = instance.panel_by_name("Technical").unwrap().id();
        for candidate in instance.iter_candidates() {
            let sessions = solved.schedule.sessions(candidate);
            assert_eq!(sessions[0].panel(), tech);
            // Back-to-back: no idle between the two sessions.
            assert_eq!(sessions[0].end(), sessions[1].start());
        }
        // Capacity keeps the two Technical sessions apart.
        let (a, b) = (
            solved
                .schedule
                .session_of(CandidateIdentifier::new(0), tech)
                .unwrap(),
            solved
                .schedule
                .session_of(CandidateIdentifier::new(1), tech)
                .unwrap(),
        );
        assert!(!a.interval().intersects(&b.interval()));
    }

    #[test]
    fn test_zero_gap_forces_contiguous_day() {
        let instance = instance(serde_json::json!({
            "num_candidates": 1,
            "panels": { "A": "1h", "B": "1h" },
            "order": ["A", "B"],
            "availabilities": {
                "A": "08:30-12:00",
                "B": "08:30-12:00"
            },
            "max_gap_minutes": 0
        }));
        let outcome = Solver::solve(&instance, &options()).unwrap();
        let SolveOutcome::Optimal(solved) = outcome else {
            panic!("expected an optimal schedule, got {outcome:?}");
        };

        let sessions = solved.schedule.sessions(CandidateIdentifier::new(0));
        assert_eq!(sessions[0].start().value(), 0);
        assert_eq!(sessions[0].end(), sessions[1].start());
        assert_eq!(solved.summary.day_end_time, "10:30");
        assert_eq!(solved.summary.order_breaks, 0);
    }

    #[test]
    fn test_overfull_panel_is_infeasible() {
        // Three 60-minute Director sessions cannot fit a 90-minute window.
        let instance = instance(serde_json::json!({
            "num_candidates": 3,
            "panels": { "Director": "1h" },
            "order": ["Director"],
            "availabilities": { "Director": "08:30-10:00" }
        }));
        let outcome = Solver::solve(&instance, &options()).unwrap();
        assert!(outcome.is_infeasible());
    }

    #[test]
    fn test_position_and_conflict_constraints() {
        let instance = instance(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Team": "45min", "HR": "30min", "Goodbye": "30min" },
            "order": ["Team", "HR", "Goodbye"],
            "availabilities": {
                "Team": "09:00-12:00",
                "HR": "09:00-12:00",
                "Goodbye": "09:00-12:00"
            },
            "start_time": "09:00",
            "end_time": "12:00",
            "position_constraints": { "Goodbye": "last" },
            "panel_conflicts": [["Team", "Goodbye"]]
        }));
        let outcome = Solver::solve(&instance, &options()).unwrap();
        let SolveOutcome::Optimal(solved) = outcome else {
            panic!("expected an optimal schedule, got {outcome:?}");
        };

        let goodbye = instance.panel_by_name("Goodbye").unwrap().id();
        let team = instance.panel_by_name("Team").unwrap().id();
        for candidate in instance.iter_candidates() {
            let sessions = solved.schedule.sessions(candidate);
            assert_eq!(sessions.last().unwrap().panel(), goodbye);
        }
        // No Team session overlaps any Goodbye session, across candidates.
        for a in instance.iter_candidates() {
            for b in instance.iter_candidates() {
                let team_session = solved.schedule.session_of(a, team).unwrap();
                let goodbye_session = solved.schedule.session_of(b, goodbye).unwrap();
                assert!(!team_session.interval().intersects(&goodbye_session.interval()));
            }
        }
    }

    #[test]
    fn test_multi_solution_diversity() {
        let instance = two_candidate_instance();
        let outcomes = Solver::solve_multi(&instance, &options(), 3).unwrap();
        assert_eq!(outcomes.len(), 3);

        let solved: Vec<&Solved> = outcomes.iter().map(|o| o.solved().unwrap()).collect();
        // Best first, quality never improves afterwards.
        for pair in solved.windows(2) {
            assert!(pair[0].stats.objective <= pair[1].stats.objective);
        }
        // Pairwise distinct: some session start differs in every pair.
        for i in 0..solved.len() {
            for j in (i + 1)..solved.len() {
                assert_ne!(
                    solved[i].schedule, solved[j].schedule,
                    "schedules {i} and {j} are identical"
                );
            }
        }
    }

    #[test]
    fn test_multi_solution_exhausts_small_space() {
        // One candidate, one panel, a window with exactly three start slots:
        // asking for five schedules yields three and stops on infeasibility.
        let instance = instance(serde_json::json!({
            "num_candidates": 1,
            "panels": { "Director": "1h" },
            "order": ["Director"],
            "availabilities": { "Director": "08:30-10:00" }
        }));
        let outcomes = Solver::solve_multi(&instance, &options(), 5).unwrap();
        assert_eq!(outcomes.len(), 3);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let instance = two_candidate_instance();
        let a = Solver::solve(&instance, &options()).unwrap();
        let b = Solver::solve(&instance, &options()).unwrap();
        assert_eq!(
            a.solved().unwrap().schedule,
            b.solved().unwrap().schedule
        );
    }
}
