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

//! No-good cuts for the multi-solution mode.
//!
//! Each recorded solution becomes one cut: per session a difference boolean
//! meaning "this start moved", and at least one of them must hold. The
//! controller owns the emitted cuts so a fresh search can drop them all.

use crate::cp::model::term;
use crate::model::SessionModel;
use itinerary_model::prelude::{Instance, Schedule};

#[derive(Debug, Clone, Default)]
pub struct DiversityController {
    cuts: Vec<Vec<(usize, usize, i64)>>,
}

impl DiversityController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cut_count(&self) -> usize {
        self.cuts.len()
    }

    pub fn clear(&mut self) {
        self.cuts.clear();
    }

    /// Remembers a produced schedule so later solves must differ from it.
    pub fn record(&mut self, instance: &Instance, schedule: &Schedule) {
        let mut cut = Vec::with_capacity(instance.session_count());
        for candidate in instance.iter_candidates() {
            for session in schedule.sessions(candidate) {
                cut.push((
                    candidate.value(),
                    session.panel().value(),
                    session.start().value(),
                ));
            }
        }
        self.cuts.push(cut);
    }

    /// Adds every recorded cut to a freshly built model.
    pub fn apply(&self, model: &mut SessionModel) {
        for cut in &self.cuts {
            let starts: Vec<_> = cut
                .iter()
                .map(|&(c, p, v)| (model.start_var(c, p), v))
                .collect();
            let cp = model.cp_mut();
            let mut moved = Vec::with_capacity(starts.len());
            for (var, value) in starts {
                let differs = cp.new_bool_var();
                let below = cp.new_bool_var();
                let above = cp.new_bool_var();
                cp.add_le_enforced(vec![term(1, var)], value - 1, &[below.lit()]);
                cp.add_ge_enforced(vec![term(1, var)], value + 1, &[above.lit()]);
                cp.add_clause_enforced(&[below.lit(), above.lit()], &[differs.lit()]);
                moved.push(differs.lit());
            }
            let len = moved.len();
            cp.add_count(&moved, 1, len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{solve, SearchLimits, SearchStatus};
    use itinerary_model::prelude::ScheduleConfig;

    fn instance() -> Instance {
        let config: ScheduleConfig = serde_json::from_value(serde_json::json!({
            "num_candidates": 1,
            "panels": { "A": "1h", "B": "1h" },
            "order": ["A", "B"],
            "availabilities": {
                "A": "08:30-12:00",
                "B": "08:30-12:00"
            },
            "max_gap_minutes": 0
        }))
        .unwrap();
        Instance::from_config(&config).unwrap()
    }

    #[test]
    fn test_cut_excludes_recorded_solution() {
        let instance = instance();
        let model = SessionModel::build(&instance).unwrap();
        let first = solve(model.cp(), &SearchLimits::default());
        assert_eq!(first.status, SearchStatus::Optimal);
        let first_assignment = first.best.unwrap();

        let schedule = crate::extract::extract_schedule(&instance, &model, &first_assignment);
        let mut controller = DiversityController::new();
        controller.record(&instance, &schedule);
        assert_eq!(controller.cut_count(), 1);

        let mut cut_model = SessionModel::build(&instance).unwrap();
        controller.apply(&mut cut_model);
        let second = solve(cut_model.cp(), &SearchLimits::default());
        assert_eq!(second.status, SearchStatus::Optimal);
        let second_assignment = second.best.unwrap();

        let moved = (0..instance.candidate_count())
            .flat_map(|c| (0..instance.panel_count()).map(move |p| (c, p)))
            .any(|(c, p)| {
                first_assignment.value(model.start_var(c, p))
                    != second_assignment.value(cut_model.start_var(c, p))
            });
        assert!(moved, "cut solution repeats every start");
    }

    #[test]
    fn test_clear_drops_cuts() {
        let instance = instance();
        let mut controller = DiversityController::new();
        let model = SessionModel::build(&instance).unwrap();
        let outcome = solve(model.cp(), &SearchLimits::default());
        let schedule =
            crate::extract::extract_schedule(&instance, &model, &outcome.best.unwrap());
        controller.record(&instance, &schedule);
        controller.record(&instance, &schedule);
        assert_eq!(controller.cut_count(), 2);
        controller.clear();
        assert_eq!(controller.cut_count(), 0);
    }
}
