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

//! Lowering of an [`Instance`] onto the constraint model.
//!
//! One start variable per session; no-overlap families become pairwise
//! ordering booleans; the per-candidate gap cap rides on an
//! immediate-successor relation forming a Hamiltonian path over the panels.

pub mod err;

pub use err::ModelError;

use crate::cp::model::term;
use crate::cp::{BoolVar, CpModel, IntVar, Lit};
use itinerary_model::prelude::{Capacity, Instance, SessionPosition};
use std::collections::BTreeSet;

/// The lowered model plus the handles needed for extraction and cuts.
#[derive(Debug, Clone)]
pub struct SessionModel {
    cp: CpModel,
    starts: Vec<Vec<IntVar>>,
    makespan: IntVar,
    break_lits: Vec<Lit>,
    weight: i64,
}

impl SessionModel {
    /// Lexicographic weight of one order break relative to the makespan.
    #[inline]
    pub fn weight(&self) -> i64 {
        self.weight
    }

    #[inline]
    pub fn cp(&self) -> &CpModel {
        &self.cp
    }

    #[inline]
    pub fn cp_mut(&mut self) -> &mut CpModel {
        &mut self.cp
    }

    #[inline]
    pub fn start_var(&self, candidate: usize, panel: usize) -> IntVar {
        self.starts[candidate][panel]
    }

    #[inline]
    pub fn makespan_var(&self) -> IntVar {
        self.makespan
    }

    #[inline]
    pub fn break_lits(&self) -> &[Lit] {
        &self.break_lits
    }

    pub fn build(instance: &Instance) -> Result<Self, ModelError> {
        Builder::new(instance).build()
    }
}

type SessionKey = (usize, usize);

struct Builder<'i> {
    instance: &'i Instance,
    cp: CpModel,
    starts: Vec<Vec<IntVar>>,
    disjoint_pairs: BTreeSet<(SessionKey, SessionKey)>,
}

impl<'i> Builder<'i> {
    fn new(instance: &'i Instance) -> Self {
        Self {
            instance,
            cp: CpModel::new(),
            starts: Vec::new(),
            disjoint_pairs: BTreeSet::new(),
        }
    }

    #[inline]
    fn duration(&self, panel: usize) -> i64 {
        self.instance.panels()[panel].duration().value()
    }

    fn build(mut self) -> Result<SessionModel, ModelError> {
        let horizon = self.instance.horizon().value();
        let candidates = self.instance.candidate_count();
        let panel_count = self.instance.panel_count();

        for _ in 0..candidates {
            let mut row = Vec::with_capacity(panel_count);
            for panel in self.instance.panels() {
                let latest = horizon - panel.duration().value();
                if latest < 0 {
                    return Err(ModelError::DurationExceedsHorizon { panel: panel.id() });
                }
                row.push(self.cp.new_int_var(0, latest));
            }
            self.starts.push(row);
        }

        self.add_availability();
        self.add_candidate_no_overlap();
        self.add_panel_capacity();
        self.add_conflict_groups();
        self.add_gap_chains();
        self.add_position_constraints();
        let break_lits = self.add_order_breaks();

        // Makespan dominates every session end.
        let makespan = self.cp.new_int_var(0, horizon);
        for c in 0..candidates {
            for p in 0..panel_count {
                let dur = self.duration(p);
                self.cp.add_ge_enforced(
                    vec![term(1, makespan), term(-1, self.starts[c][p])],
                    dur,
                    &[],
                );
            }
        }

        // Weighted lexicographic objective: any break outweighs the whole day.
        let weight = horizon + 1;
        self.cp.minimize(
            vec![term(1, makespan)],
            break_lits.iter().map(|&l| (weight, l)).collect(),
        );

        // Branch candidate by candidate, preferred panels first, then the
        // makespan.
        let mut order: Vec<IntVar> = Vec::with_capacity(candidates * panel_count + 1);
        let preferred: Vec<usize> = self
            .instance
            .preferred_order()
            .iter()
            .map(|p| p.value())
            .collect();
        let mut panel_order = preferred.clone();
        for p in 0..panel_count {
            if !preferred.contains(&p) {
                panel_order.push(p);
            }
        }
        for c in 0..candidates {
            for &p in &panel_order {
                order.push(self.starts[c][p]);
            }
        }
        order.push(makespan);
        self.cp.set_decision_order(order);

        Ok(SessionModel {
            cp: self.cp,
            starts: self.starts,
            makespan,
            break_lits,
            weight,
        })
    }

    /// One boolean per availability window, exactly one chosen, each
    /// implying both bound inequalities.
    fn add_availability(&mut self) {
        for c in 0..self.instance.candidate_count() {
            for (p, panel) in self.instance.panels().iter().enumerate() {
                let start = self.starts[c][p];
                let dur = panel.duration().value();
                let mut options: Vec<Lit> = Vec::new();
                for window in panel.iter_windows() {
                    let lit = self.cp.new_bool_var().lit();
                    self.cp
                        .add_ge_enforced(vec![term(1, start)], window.start().value(), &[lit]);
                    self.cp
                        .add_le_enforced(vec![term(1, start)], window.end().value() - dur, &[lit]);
                    options.push(lit);
                }
                self.cp.add_exactly_one(&options);
            }
        }
    }

    /// One ordering boolean per unordered session pair, shared across every
    /// no-overlap family that names the pair.
    fn add_disjoint(&mut self, a: SessionKey, b: SessionKey) {
        let key = if a <= b { (a, b) } else { (b, a) };
        if !self.disjoint_pairs.insert(key) {
            return;
        }
        let (first, second) = key;
        let s_first = self.starts[first.0][first.1];
        let s_second = self.starts[second.0][second.1];
        let d_first = self.duration(first.1);
        let d_second = self.duration(second.1);

        let before = self.cp.new_bool_var();
        self.cp.add_ge_enforced(
            vec![term(1, s_second), term(-1, s_first)],
            d_first,
            &[before.lit()],
        );
        self.cp.add_ge_enforced(
            vec![term(1, s_first), term(-1, s_second)],
            d_second,
            &[!before],
        );
    }

    fn add_candidate_no_overlap(&mut self) {
        let panel_count = self.instance.panel_count();
        for c in 0..self.instance.candidate_count() {
            for p in 0..panel_count {
                for q in (p + 1)..panel_count {
                    self.add_disjoint((c, p), (c, q));
                }
            }
        }
    }

    fn add_panel_capacity(&mut self) {
        let candidates = self.instance.candidate_count();
        for (p, panel) in self.instance.panels().iter().enumerate() {
            if panel.capacity() == Capacity::Unlimited {
                continue;
            }
            for a in 0..candidates {
                for b in (a + 1)..candidates {
                    self.add_disjoint((a, p), (b, p));
                }
            }
        }
    }

    /// All sessions of all panels in a group are pairwise disjoint, across
    /// candidates and regardless of capacity.
    fn add_conflict_groups(&mut self) {
        let candidates = self.instance.candidate_count();
        let groups: Vec<Vec<usize>> = self
            .instance
            .conflict_groups()
            .iter()
            .map(|g| g.iter().map(|p| p.value()).collect())
            .collect();
        for group in groups {
            let mut sessions: Vec<SessionKey> = Vec::new();
            for &p in &group {
                for c in 0..candidates {
                    sessions.push((c, p));
                }
            }
            for i in 0..sessions.len() {
                for j in (i + 1)..sessions.len() {
                    self.add_disjoint(sessions[i], sessions[j]);
                }
            }
        }
    }

    /// The immediate-successor relation per candidate: a Hamiltonian path
    /// over the panels whose chosen adjacencies carry the hard gap bound.
    fn add_gap_chains(&mut self) {
        let panel_count = self.instance.panel_count();
        if panel_count < 2 {
            return;
        }
        let gap = self.instance.max_gap().value();

        for c in 0..self.instance.candidate_count() {
            let mut follows = vec![vec![None::<BoolVar>; panel_count]; panel_count];
            for p1 in 0..panel_count {
                for p2 in 0..panel_count {
                    if p1 == p2 {
                        continue;
                    }
                    let f = self.cp.new_bool_var();
                    follows[p1][p2] = Some(f);
                    let s1 = self.starts[c][p1];
                    let s2 = self.starts[c][p2];
                    let d1 = self.duration(p1);

                    // Successor starts after the predecessor ends, within
                    // the gap allowance.
                    self.cp
                        .add_ge_enforced(vec![term(1, s2), term(-1, s1)], d1, &[f.lit()]);
                    self.cp
                        .add_le_enforced(vec![term(1, s2), term(-1, s1)], d1 + gap, &[f.lit()]);

                    // No third session may start inside the adjacency.
                    for p3 in 0..panel_count {
                        if p3 == p1 || p3 == p2 {
                            continue;
                        }
                        let s3 = self.starts[c][p3];
                        let before = self.cp.new_bool_var();
                        let after = self.cp.new_bool_var();
                        self.cp.add_le_enforced(
                            vec![term(1, s3), term(-1, s1)],
                            d1 - 1,
                            &[f.lit(), before.lit()],
                        );
                        self.cp.add_ge_enforced(
                            vec![term(1, s3), term(-1, s2)],
                            0,
                            &[f.lit(), after.lit()],
                        );
                        self.cp
                            .add_clause_enforced(&[before.lit(), after.lit()], &[f.lit()]);
                    }
                }
            }

            // Path topology: in- and out-degree at most one, exactly
            // panel_count - 1 edges overall.
            for p in 0..panel_count {
                let incoming: Vec<Lit> = (0..panel_count)
                    .filter_map(|q| follows[q][p].map(|b| b.lit()))
                    .collect();
                let outgoing: Vec<Lit> = (0..panel_count)
                    .filter_map(|q| follows[p][q].map(|b| b.lit()))
                    .collect();
                self.cp.add_at_most_one(&incoming);
                self.cp.add_at_most_one(&outgoing);
            }
            let all_edges: Vec<Lit> = follows
                .iter()
                .flatten()
                .flatten()
                .map(|b| b.lit())
                .collect();
            let edges = panel_count - 1;
            self.cp.add_count(&all_edges, edges, edges);
        }
    }

    fn add_position_constraints(&mut self) {
        let panel_count = self.instance.panel_count();
        let constraints: Vec<(usize, SessionPosition)> = self
            .instance
            .position_constraints()
            .iter()
            .map(|(p, pos)| (p.value(), *pos))
            .collect();

        for c in 0..self.instance.candidate_count() {
            for &(p, pos) in &constraints {
                let s_p = self.starts[c][p];
                match pos {
                    SessionPosition::First => {
                        for other in 0..panel_count {
                            if other != p {
                                let s_o = self.starts[c][other];
                                self.cp
                                    .add_le_enforced(vec![term(1, s_p), term(-1, s_o)], 0, &[]);
                            }
                        }
                    }
                    SessionPosition::Last => {
                        for other in 0..panel_count {
                            if other != p {
                                let s_o = self.starts[c][other];
                                let d_o = self.duration(other);
                                self.cp
                                    .add_ge_enforced(vec![term(1, s_p), term(-1, s_o)], d_o, &[]);
                            }
                        }
                    }
                    SessionPosition::Abs(k) => {
                        let mut ends_before: Vec<Lit> = Vec::new();
                        for other in 0..panel_count {
                            if other == p {
                                continue;
                            }
                            let s_o = self.starts[c][other];
                            let d_o = self.duration(other);
                            let b = self.cp.new_bool_var();
                            self.cp.add_ge_enforced(
                                vec![term(1, s_p), term(-1, s_o)],
                                d_o,
                                &[b.lit()],
                            );
                            self.cp.add_le_enforced(
                                vec![term(1, s_p), term(-1, s_o)],
                                d_o - 1,
                                &[!b],
                            );
                            ends_before.push(b.lit());
                        }
                        self.cp.add_count(&ends_before, k, k);
                    }
                }
            }
        }
    }

    /// One break boolean per adjacent preferred-order pair and candidate:
    /// either the earlier panel finishes before the later starts, or the
    /// pair is fully reversed and the break is paid.
    fn add_order_breaks(&mut self) -> Vec<Lit> {
        let order: Vec<usize> = self
            .instance
            .preferred_order()
            .iter()
            .map(|p| p.value())
            .collect();
        let mut break_lits = Vec::new();
        for c in 0..self.instance.candidate_count() {
            for pair in order.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let s_a = self.starts[c][a];
                let s_b = self.starts[c][b];
                let d_a = self.duration(a);
                let d_b = self.duration(b);
                let br = self.cp.new_bool_var();
                self.cp
                    .add_ge_enforced(vec![term(1, s_b), term(-1, s_a)], d_a, &[!br]);
                self.cp
                    .add_ge_enforced(vec![term(1, s_a), term(-1, s_b)], d_b, &[br.lit()]);
                break_lits.push(br.lit());
            }
        }
        break_lits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_model::prelude::ScheduleConfig;

    fn instance(value: serde_json::Value) -> Instance {
        let config: ScheduleConfig = serde_json::from_value(value).unwrap();
        Instance::from_config(&config).unwrap()
    }

    fn two_panel_instance() -> Instance {
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
    fn test_variable_layout() {
        let model = SessionModel::build(&two_panel_instance()).unwrap();
        // 4 starts + makespan.
        assert_eq!(model.cp().int_var_count(), 5);
        // Start domains leave room for the duration: HR (2 slots) up to 32,
        // Technical (3 slots) up to 31.
        assert_eq!(model.cp().int_bounds(model.start_var(0, 0)), (0, 32));
        assert_eq!(model.cp().int_bounds(model.start_var(0, 1)), (0, 31));
        assert_eq!(model.cp().int_bounds(model.makespan_var()), (0, 34));
        // One break pair per candidate.
        assert_eq!(model.break_lits().len(), 2);
        assert_eq!(model.weight(), 35);
    }

    #[test]
    fn test_lunch_capacity_not_pairwise_constrained() {
        let with_lunch = instance(serde_json::json!({
            "num_candidates": 3,
            "panels": { "Lunch": "1h", "HR": "30min" },
            "order": ["HR", "Lunch"],
            "availabilities": {
                "Lunch": "11:45-13:30",
                "HR": "09:00-17:00"
            }
        }));
        let without_lunch = instance(serde_json::json!({
            "num_candidates": 3,
            "panels": { "Board": "1h", "HR": "30min" },
            "order": ["HR", "Board"],
            "availabilities": {
                "Board": "11:45-13:30",
                "HR": "09:00-17:00"
            }
        }));
        let a = SessionModel::build(&with_lunch).unwrap();
        let b = SessionModel::build(&without_lunch).unwrap();
        // The capacity-1 variant needs three extra ordering booleans for the
        // Board pairs that Lunch does not constrain.
        assert_eq!(a.cp().bool_var_count() + 3, b.cp().bool_var_count());
    }

    #[test]
    fn test_conflict_groups_share_pairs_with_capacity() {
        let base = instance(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Team": "45min", "Goodbye": "30min" },
            "order": ["Team", "Goodbye"],
            "availabilities": {
                "Team": "09:00-17:00",
                "Goodbye": "09:00-17:00"
            }
        }));
        let with_conflicts = instance(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Team": "45min", "Goodbye": "30min" },
            "order": ["Team", "Goodbye"],
            "availabilities": {
                "Team": "09:00-17:00",
                "Goodbye": "09:00-17:00"
            },
            "panel_conflicts": [["Team", "Goodbye"]]
        }));
        let a = SessionModel::build(&base).unwrap();
        let b = SessionModel::build(&with_conflicts).unwrap();
        // Candidate-line and capacity pairs are already present; the group
        // only adds the two cross pairs.
        assert_eq!(a.cp().bool_var_count() + 2, b.cp().bool_var_count());
    }

    #[test]
    fn test_single_panel_has_no_chain() {
        let single = instance(serde_json::json!({
            "num_candidates": 2,
            "panels": { "Director": "1h" },
            "order": ["Director"],
            "availabilities": { "Director": "08:30-10:00" }
        }));
        let model = SessionModel::build(&single).unwrap();
        // Two availability booleans and one capacity ordering boolean; no
        // follows tensor, no breaks.
        assert_eq!(model.cp().bool_var_count(), 3);
        assert!(model.break_lits().is_empty());
    }
}
