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

use crate::cp::model::{Constraint, CpModel, IntVar, LinearTerm, Lit, NEG_INF};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Instant;

/// How often the hot loop samples the deadline and stop flag.
const STOP_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub deadline: Option<Instant>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub decisions: u64,
    pub conflicts: u64,
    pub solutions: u64,
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.decisions += other.decisions;
        self.conflicts += other.conflicts;
        self.solutions += other.solutions;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

/// A full assignment to the model's integer variables plus its objective
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    ints: Vec<i64>,
    objective: i64,
}

impl Assignment {
    #[inline]
    pub fn value(&self, var: IntVar) -> i64 {
        self.ints[var.index()]
    }

    #[inline]
    pub fn objective(&self) -> i64 {
        self.objective
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub best: Option<Assignment>,
    pub stats: SearchStats,
}

/// Best-known solution shared across portfolio workers. The objective is
/// mirrored in an atomic so the hot pruning path never takes the lock.
#[derive(Debug)]
pub struct SharedIncumbent {
    best_objective: AtomicI64,
    best: Mutex<Option<Assignment>>,
    stop: AtomicBool,
    exhausted: AtomicBool,
}

impl SharedIncumbent {
    pub fn new() -> Self {
        Self {
            best_objective: AtomicI64::new(i64::MAX),
            best: Mutex::new(None),
            stop: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn best_objective(&self) -> i64 {
        self.best_objective.load(Ordering::Acquire)
    }

    /// Installs a strictly better assignment. Non-blocking pre-check via the
    /// atomic, definitive check under the lock.
    pub fn try_update(&self, candidate: Assignment) -> bool {
        if candidate.objective >= self.best_objective() {
            return false;
        }
        let mut guard = self.best.lock();
        let current = guard.as_ref().map(|a| a.objective).unwrap_or(i64::MAX);
        if candidate.objective < current {
            tracing::debug!(objective = candidate.objective, "new incumbent");
            self.best_objective
                .store(candidate.objective, Ordering::Release);
            *guard = Some(candidate);
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> Option<Assignment> {
        self.best.lock().clone()
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    #[inline]
    fn mark_exhausted(&self) {
        self.exhausted.store(true, Ordering::Release);
        self.request_stop();
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }
}

#[inline]
fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

#[inline]
fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolState {
    Unset,
    True,
    False,
}

#[derive(Debug, Clone, Copy)]
enum Undo {
    IntLb { var: usize, old: i64 },
    IntUb { var: usize, old: i64 },
    Bool { var: usize },
}

#[derive(Debug, Clone, Copy)]
enum Decision {
    IntEq { var: usize, value: i64 },
    BoolIs { var: usize, value: bool },
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    trail_mark: usize,
    decision: Decision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prop {
    Unchanged,
    Changed,
    Conflict,
}

struct Worker<'m> {
    model: &'m CpModel,
    incumbent: &'m SharedIncumbent,
    order: Vec<IntVar>,
    deadline: Option<Instant>,
    int_lb: Vec<i64>,
    int_ub: Vec<i64>,
    bools: Vec<BoolState>,
    trail: Vec<Undo>,
    frames: Vec<Frame>,
    stats: SearchStats,
    tick: u64,
}

impl<'m> Worker<'m> {
    fn new(
        model: &'m CpModel,
        incumbent: &'m SharedIncumbent,
        order: Vec<IntVar>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            model,
            incumbent,
            order,
            deadline,
            int_lb: model.int_lb.clone(),
            int_ub: model.int_ub.clone(),
            bools: vec![BoolState::Unset; model.bool_var_count()],
            trail: Vec::new(),
            frames: Vec::new(),
            stats: SearchStats::default(),
            tick: 0,
        }
    }

    #[inline]
    fn lit_value(&self, lit: Lit) -> Option<bool> {
        match self.bools[lit.var.index()] {
            BoolState::Unset => None,
            BoolState::True => Some(!lit.negated),
            BoolState::False => Some(lit.negated),
        }
    }

    /// Makes the literal true. `None` on contradiction.
    #[inline]
    fn assign_true(&mut self, lit: Lit) -> Option<bool> {
        let target = if lit.negated {
            BoolState::False
        } else {
            BoolState::True
        };
        let var = lit.var.index();
        match self.bools[var] {
            BoolState::Unset => {
                self.trail.push(Undo::Bool { var });
                self.bools[var] = target;
                Some(true)
            }
            current if current == target => Some(false),
            _ => None,
        }
    }

    #[inline]
    fn set_lb(&mut self, var: usize, value: i64) -> Option<bool> {
        if value <= self.int_lb[var] {
            return Some(false);
        }
        if value > self.int_ub[var] {
            return None;
        }
        self.trail.push(Undo::IntLb {
            var,
            old: self.int_lb[var],
        });
        self.int_lb[var] = value;
        Some(true)
    }

    #[inline]
    fn set_ub(&mut self, var: usize, value: i64) -> Option<bool> {
        if value >= self.int_ub[var] {
            return Some(false);
        }
        if value < self.int_lb[var] {
            return None;
        }
        self.trail.push(Undo::IntUb {
            var,
            old: self.int_ub[var],
        });
        self.int_ub[var] = value;
        Some(true)
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop().expect("trail underflow") {
                Undo::IntLb { var, old } => self.int_lb[var] = old,
                Undo::IntUb { var, old } => self.int_ub[var] = old,
                Undo::Bool { var } => self.bools[var] = BoolState::Unset,
            }
        }
    }

    /// Runs every propagator to fixpoint. False on conflict.
    fn propagate(&mut self) -> bool {
        let model = self.model;
        let bound = self.incumbent.best_objective();
        loop {
            let mut changed = false;

            if bound < i64::MAX {
                if let Some(obj) = &model.objective {
                    match self.propagate_linear(
                        &obj.int_terms,
                        &obj.bool_terms,
                        NEG_INF,
                        bound - 1,
                        &[],
                    ) {
                        Prop::Conflict => return false,
                        Prop::Changed => changed = true,
                        Prop::Unchanged => {}
                    }
                }
            }

            for constraint in &model.constraints {
                let result = match constraint {
                    Constraint::Linear(c) => {
                        self.propagate_linear(&c.int_terms, &c.bool_terms, c.lo, c.hi, &c.enforce)
                    }
                    Constraint::Clause(c) => self.propagate_clause(&c.lits, &c.enforce),
                    Constraint::Count(c) => self.propagate_count(&c.lits, c.lo, c.hi),
                };
                match result {
                    Prop::Conflict => return false,
                    Prop::Changed => changed = true,
                    Prop::Unchanged => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }

    fn propagate_linear(
        &mut self,
        int_terms: &[LinearTerm],
        bool_terms: &[(i64, Lit)],
        lo: i64,
        hi: i64,
        enforce: &[Lit],
    ) -> Prop {
        let mut unknown_enforce: Option<Lit> = None;
        let mut unknown_enforce_count = 0usize;
        for &lit in enforce {
            match self.lit_value(lit) {
                Some(false) => return Prop::Unchanged,
                Some(true) => {}
                None => {
                    unknown_enforce_count += 1;
                    unknown_enforce = Some(lit);
                }
            }
        }

        let mut min_sum = 0i64;
        let mut max_sum = 0i64;
        for t in int_terms {
            let (vlb, vub) = (self.int_lb[t.var.index()], self.int_ub[t.var.index()]);
            if t.coeff >= 0 {
                min_sum += t.coeff * vlb;
                max_sum += t.coeff * vub;
            } else {
                min_sum += t.coeff * vub;
                max_sum += t.coeff * vlb;
            }
        }
        for &(coeff, lit) in bool_terms {
            let (blb, bub) = match self.lit_value(lit) {
                Some(true) => (1, 1),
                Some(false) => (0, 0),
                None => (0, 1),
            };
            if coeff >= 0 {
                min_sum += coeff * blb;
                max_sum += coeff * bub;
            } else {
                min_sum += coeff * bub;
                max_sum += coeff * blb;
            }
        }

        if min_sum > hi || max_sum < lo {
            // The constraint cannot hold; at least one enforcement literal
            // must fall.
            return match unknown_enforce_count {
                0 => Prop::Conflict,
                1 => match self.assign_true(!unknown_enforce.expect("unknown enforce literal")) {
                    Some(true) => Prop::Changed,
                    Some(false) => Prop::Unchanged,
                    None => Prop::Conflict,
                },
                _ => Prop::Unchanged,
            };
        }
        if unknown_enforce_count > 0 {
            return Prop::Unchanged;
        }

        let mut changed = false;

        for t in int_terms {
            let var = t.var.index();
            let (vlb, vub) = (self.int_lb[var], self.int_ub[var]);
            if t.coeff > 0 {
                let min_others = min_sum - t.coeff * vlb;
                let max_others = max_sum - t.coeff * vub;
                match self.set_ub(var, div_floor(hi - min_others, t.coeff)) {
                    Some(true) => changed = true,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
                match self.set_lb(var, div_ceil(lo - max_others, t.coeff)) {
                    Some(true) => changed = true,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
            } else if t.coeff < 0 {
                let min_others = min_sum - t.coeff * vub;
                let max_others = max_sum - t.coeff * vlb;
                match self.set_lb(var, div_ceil(hi - min_others, t.coeff)) {
                    Some(true) => changed = true,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
                match self.set_ub(var, div_floor(lo - max_others, t.coeff)) {
                    Some(true) => changed = true,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
            }
            if changed {
                // Sums are stale after a tightening; the fixpoint loop
                // revisits this constraint.
                return Prop::Changed;
            }
        }

        for &(coeff, lit) in bool_terms {
            if self.lit_value(lit).is_some() || coeff == 0 {
                continue;
            }
            let (forced_true, forced_false) = if coeff > 0 {
                (max_sum - coeff < lo, min_sum + coeff > hi)
            } else {
                (min_sum - coeff > hi, max_sum + coeff < lo)
            };
            if forced_true && forced_false {
                return Prop::Conflict;
            }
            if forced_true {
                match self.assign_true(lit) {
                    Some(true) => return Prop::Changed,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
            } else if forced_false {
                match self.assign_true(!lit) {
                    Some(true) => return Prop::Changed,
                    Some(false) => {}
                    None => return Prop::Conflict,
                }
            }
        }

        if changed {
            Prop::Changed
        } else {
            Prop::Unchanged
        }
    }

    fn propagate_clause(&mut self, lits: &[Lit], enforce: &[Lit]) -> Prop {
        let mut unknown_enforce: Option<Lit> = None;
        let mut unknown_enforce_count = 0usize;
        for &lit in enforce {
            match self.lit_value(lit) {
                Some(false) => return Prop::Unchanged,
                Some(true) => {}
                None => {
                    unknown_enforce_count += 1;
                    unknown_enforce = Some(lit);
                }
            }
        }

        let mut unknown_lit: Option<Lit> = None;
        let mut unknown_lits = 0usize;
        for &lit in lits {
            match self.lit_value(lit) {
                Some(true) => return Prop::Unchanged,
                Some(false) => {}
                None => {
                    unknown_lits += 1;
                    unknown_lit = Some(lit);
                }
            }
        }

        if unknown_lits == 0 {
            // Every literal is false: the clause fails, so an undecided
            // enforcement literal must fall.
            return match unknown_enforce_count {
                0 => Prop::Conflict,
                1 => match self.assign_true(!unknown_enforce.expect("unknown enforce literal")) {
                    Some(true) => Prop::Changed,
                    Some(false) => Prop::Unchanged,
                    None => Prop::Conflict,
                },
                _ => Prop::Unchanged,
            };
        }

        if unknown_lits == 1 && unknown_enforce_count == 0 {
            return match self.assign_true(unknown_lit.expect("unit literal")) {
                Some(true) => Prop::Changed,
                Some(false) => Prop::Unchanged,
                None => Prop::Conflict,
            };
        }

        Prop::Unchanged
    }

    fn propagate_count(&mut self, lits: &[Lit], lo: usize, hi: usize) -> Prop {
        let mut true_count = 0usize;
        let mut unknown = 0usize;
        for &lit in lits {
            match self.lit_value(lit) {
                Some(true) => true_count += 1,
                Some(false) => {}
                None => unknown += 1,
            }
        }

        if true_count > hi || true_count + unknown < lo {
            return Prop::Conflict;
        }

        let mut changed = false;
        if unknown > 0 && true_count == hi {
            for &lit in lits {
                if self.lit_value(lit).is_none() {
                    match self.assign_true(!lit) {
                        Some(true) => changed = true,
                        Some(false) => {}
                        None => return Prop::Conflict,
                    }
                }
            }
        } else if unknown > 0 && true_count + unknown == lo {
            for &lit in lits {
                if self.lit_value(lit).is_none() {
                    match self.assign_true(lit) {
                        Some(true) => changed = true,
                        Some(false) => {}
                        None => return Prop::Conflict,
                    }
                }
            }
        }

        if changed {
            Prop::Changed
        } else {
            Prop::Unchanged
        }
    }

    fn pick_decision(&self) -> Option<Decision> {
        for &var in &self.order {
            let i = var.index();
            if self.int_lb[i] < self.int_ub[i] {
                return Some(Decision::IntEq {
                    var: i,
                    value: self.int_lb[i],
                });
            }
        }
        // First-fail over the remaining integers.
        let mut best: Option<(i64, usize)> = None;
        for i in 0..self.int_lb.len() {
            let width = self.int_ub[i] - self.int_lb[i];
            if width > 0 && best.map(|(w, _)| width < w).unwrap_or(true) {
                best = Some((width, i));
            }
        }
        if let Some((_, var)) = best {
            return Some(Decision::IntEq {
                var,
                value: self.int_lb[var],
            });
        }
        for (i, state) in self.bools.iter().enumerate() {
            if *state == BoolState::Unset {
                return Some(Decision::BoolIs {
                    var: i,
                    value: false,
                });
            }
        }
        None
    }

    /// Applies a decision on a new frame. False on immediate contradiction.
    fn push_decision(&mut self, decision: Decision) -> bool {
        self.frames.push(Frame {
            trail_mark: self.trail.len(),
            decision,
        });
        match decision {
            Decision::IntEq { var, value } => {
                self.set_lb(var, value).is_some() && self.set_ub(var, value).is_some()
            }
            Decision::BoolIs { var, value } => {
                let lit = if value {
                    crate::cp::model::BoolVar(var).lit()
                } else {
                    !crate::cp::model::BoolVar(var)
                };
                self.assign_true(lit).is_some()
            }
        }
    }

    /// Unwinds decisions, refuting each popped one at its parent level,
    /// until propagation succeeds. False when the tree is exhausted.
    fn resolve_conflict(&mut self) -> bool {
        loop {
            let Some(frame) = self.frames.pop() else {
                return false;
            };
            self.undo_to(frame.trail_mark);
            let refuted = match frame.decision {
                Decision::IntEq { var, value } => self.set_lb(var, value + 1).is_some(),
                Decision::BoolIs { var, value } => {
                    let lit = if value {
                        !crate::cp::model::BoolVar(var)
                    } else {
                        crate::cp::model::BoolVar(var).lit()
                    };
                    self.assign_true(lit).is_some()
                }
            };
            if refuted && self.propagate() {
                return true;
            }
        }
    }

    fn objective_value(&self) -> i64 {
        let Some(obj) = &self.model.objective else {
            return 0;
        };
        let mut total = 0i64;
        for t in &obj.int_terms {
            total += t.coeff * self.int_lb[t.var.index()];
        }
        for &(coeff, lit) in &obj.bool_terms {
            if self.lit_value(lit) == Some(true) {
                total += coeff;
            }
        }
        total
    }

    fn record_solution(&mut self) {
        self.stats.solutions += 1;
        let assignment = Assignment {
            ints: self.int_lb.clone(),
            objective: self.objective_value(),
        };
        self.incumbent.try_update(assignment);
    }

    #[inline]
    fn should_stop(&mut self) -> bool {
        self.tick = self.tick.wrapping_add(1);
        if self.tick % STOP_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.incumbent.request_stop();
                    return true;
                }
            }
        }
        self.incumbent.should_stop()
    }

    fn run(&mut self) {
        if !self.propagate() {
            self.incumbent.mark_exhausted();
            return;
        }
        loop {
            if self.should_stop() {
                return;
            }
            match self.pick_decision() {
                Some(decision) => {
                    self.stats.decisions += 1;
                    let applied = self.push_decision(decision);
                    if !applied || !self.propagate() {
                        self.stats.conflicts += 1;
                        if !self.resolve_conflict() {
                            self.incumbent.mark_exhausted();
                            return;
                        }
                    }
                }
                None => {
                    self.record_solution();
                    if self.model.objective.is_none() {
                        // Feasibility mode: the first solution suffices.
                        self.incumbent.request_stop();
                        return;
                    }
                    if !self.resolve_conflict() {
                        self.incumbent.mark_exhausted();
                        return;
                    }
                }
            }
        }
    }
}

/// Single-threaded, deterministic search.
pub fn solve(model: &CpModel, limits: &SearchLimits) -> SearchOutcome {
    solve_portfolio(model, limits, 1, 0)
}

/// Runs `workers` independent searches over the same model, each with a
/// seed-perturbed branching order, sharing one incumbent bound. Any worker
/// exhausting its tree proves optimality (or infeasibility) for all.
pub fn solve_portfolio(
    model: &CpModel,
    limits: &SearchLimits,
    workers: usize,
    seed: u64,
) -> SearchOutcome {
    let incumbent = SharedIncumbent::new();
    let worker_count = workers.max(1);
    let mut stats = SearchStats::default();

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        for tid in 0..worker_count {
            let incumbent_ref = &incumbent;
            handles.push(scope.spawn(move || {
                let mut order = model.decision_order.clone();
                if tid > 0 {
                    let mut rng = ChaCha8Rng::seed_from_u64(
                        seed ^ (tid as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
                    );
                    order.shuffle(&mut rng);
                }
                let mut worker = Worker::new(model, incumbent_ref, order, limits.deadline);
                worker.run();
                worker.stats
            }));
        }
        for handle in handles {
            if let Ok(worker_stats) = handle.join() {
                stats.merge(worker_stats);
            }
        }
    });

    let best = incumbent.snapshot();
    let status = match (incumbent.is_exhausted(), best.is_some()) {
        (true, true) => SearchStatus::Optimal,
        (true, false) => SearchStatus::Infeasible,
        (false, true) => SearchStatus::Feasible,
        (false, false) => SearchStatus::Unknown,
    };
    tracing::debug!(
        ?status,
        decisions = stats.decisions,
        conflicts = stats.conflicts,
        "search finished"
    );
    SearchOutcome {
        status,
        best,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::model::term;

    #[test]
    fn test_minimizes_simple_linear() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 10);
        let y = m.new_int_var(0, 10);
        m.add_linear(vec![term(1, x), term(1, y)], 5, i64::MAX / 4);
        m.minimize(vec![term(1, x), term(2, y)], vec![]);
        m.set_decision_order(vec![x, y]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Optimal);
        let best = outcome.best.unwrap();
        assert_eq!(best.objective(), 5);
        assert_eq!(best.value(x), 5);
        assert_eq!(best.value(y), 0);
    }

    #[test]
    fn test_detects_infeasibility() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 3);
        m.add_linear(vec![term(1, x)], 5, 100);
        m.minimize(vec![term(1, x)], vec![]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Infeasible);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_enforced_linears_flip_enforcement() {
        // x is fixed to 3; b -> x >= 5 cannot hold, so b falls; !b -> x <= 2
        // cannot hold either: infeasible.
        let mut m = CpModel::new();
        let x = m.new_int_var(3, 3);
        let b = m.new_bool_var();
        m.add_ge_enforced(vec![term(1, x)], 5, &[b.lit()]);
        m.add_le_enforced(vec![term(1, x)], 2, &[!b]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Infeasible);
    }

    #[test]
    fn test_reified_pair_selects_consistent_side() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 10);
        let b = m.new_bool_var();
        m.add_ge_enforced(vec![term(1, x)], 6, &[b.lit()]);
        m.add_le_enforced(vec![term(1, x)], 5, &[!b]);
        m.minimize(vec![term(1, x)], vec![(3, b.lit())]);
        m.set_decision_order(vec![x]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Optimal);
        let best = outcome.best.unwrap();
        assert_eq!(best.value(x), 0);
        assert_eq!(best.objective(), 0);
    }

    #[test]
    fn test_bool_costs_steer_choice() {
        // Either b (forces x >= 4) or c (forces x >= 3) must hold; b costs 2.
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 5);
        let b = m.new_bool_var();
        let c = m.new_bool_var();
        m.add_clause(&[b.lit(), c.lit()]);
        m.add_ge_enforced(vec![term(1, x)], 4, &[b.lit()]);
        m.add_ge_enforced(vec![term(1, x)], 3, &[c.lit()]);
        m.minimize(vec![term(1, x)], vec![(2, b.lit())]);
        m.set_decision_order(vec![x]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Optimal);
        let best = outcome.best.unwrap();
        assert_eq!(best.value(x), 3);
        assert_eq!(best.objective(), 3);
    }

    #[test]
    fn test_exactly_one_channels_bounds() {
        // Two disjoint windows for x; the first cannot fit x's domain.
        let mut m = CpModel::new();
        let x = m.new_int_var(6, 20);
        let w0 = m.new_bool_var();
        let w1 = m.new_bool_var();
        m.add_ge_enforced(vec![term(1, x)], 0, &[w0.lit()]);
        m.add_le_enforced(vec![term(1, x)], 4, &[w0.lit()]);
        m.add_ge_enforced(vec![term(1, x)], 10, &[w1.lit()]);
        m.add_le_enforced(vec![term(1, x)], 15, &[w1.lit()]);
        m.add_exactly_one(&[w0.lit(), w1.lit()]);
        m.minimize(vec![term(1, x)], vec![]);
        m.set_decision_order(vec![x]);

        let outcome = solve(&m, &SearchLimits::default());
        assert_eq!(outcome.status, SearchStatus::Optimal);
        assert_eq!(outcome.best.unwrap().value(x), 10);
    }

    #[test]
    fn test_portfolio_matches_single_thread() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 30);
        let y = m.new_int_var(0, 30);
        let z = m.new_int_var(0, 30);
        m.add_linear(vec![term(1, x), term(1, y), term(1, z)], 17, i64::MAX / 4);
        m.add_ge_enforced(vec![term(1, y), term(-1, x)], 2, &[]);
        m.minimize(vec![term(3, x), term(2, y), term(1, z)], vec![]);
        m.set_decision_order(vec![x, y, z]);

        let single = solve(&m, &SearchLimits::default());
        let portfolio = solve_portfolio(&m, &SearchLimits::default(), 4, 42);
        assert_eq!(single.status, SearchStatus::Optimal);
        assert_eq!(portfolio.status, SearchStatus::Optimal);
        assert_eq!(
            single.best.unwrap().objective(),
            portfolio.best.unwrap().objective()
        );
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 12);
        let y = m.new_int_var(0, 12);
        m.add_linear(vec![term(2, x), term(3, y)], 12, 30);
        m.minimize(vec![term(1, x), term(1, y)], vec![]);
        m.set_decision_order(vec![x, y]);

        let a = solve(&m, &SearchLimits::default());
        let b = solve(&m, &SearchLimits::default());
        assert_eq!(a.best, b.best);
    }
}
