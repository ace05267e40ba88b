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

use smallvec::SmallVec;

/// Bounds large enough for any day-sized expression yet far from overflow.
pub const NEG_INF: i64 = i64::MIN / 4;
pub const POS_INF: i64 = i64::MAX / 4;

/// A bounded integer decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(pub(crate) usize);

impl IntVar {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(pub(crate) usize);

impl BoolVar {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }

    /// The positive literal of this variable.
    #[inline]
    pub fn lit(self) -> Lit {
        Lit {
            var: self,
            negated: false,
        }
    }
}

impl std::ops::Not for BoolVar {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            var: self,
            negated: true,
        }
    }
}

/// A possibly negated boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    pub(crate) var: BoolVar,
    pub(crate) negated: bool,
}

impl Lit {
    #[inline]
    pub fn var(self) -> BoolVar {
        self.var
    }

    #[inline]
    pub fn negated(self) -> bool {
        self.negated
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            var: self.var,
            negated: !self.negated,
        }
    }
}

/// `coeff * var` inside a linear expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTerm {
    pub coeff: i64,
    pub var: IntVar,
}

#[inline]
pub fn term(coeff: i64, var: IntVar) -> LinearTerm {
    LinearTerm { coeff, var }
}

pub(crate) type EnforceList = SmallVec<[Lit; 2]>;

/// `lo <= Σ int_terms + Σ bool_terms <= hi`, active while every enforcement
/// literal holds. A constraint impossible under current bounds forces its
/// last undecided enforcement literal to false.
#[derive(Debug, Clone)]
pub(crate) struct LinearConstraint {
    pub int_terms: Vec<LinearTerm>,
    pub bool_terms: Vec<(i64, Lit)>,
    pub lo: i64,
    pub hi: i64,
    pub enforce: EnforceList,
}

/// At least one literal holds, while every enforcement literal holds.
#[derive(Debug, Clone)]
pub(crate) struct ClauseConstraint {
    pub lits: Vec<Lit>,
    pub enforce: EnforceList,
}

/// The number of true literals lies in `[lo, hi]`. Always active.
#[derive(Debug, Clone)]
pub(crate) struct CountConstraint {
    pub lits: Vec<Lit>,
    pub lo: usize,
    pub hi: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    Linear(LinearConstraint),
    Clause(ClauseConstraint),
    Count(CountConstraint),
}

/// The minimization objective as a mixed linear expression.
#[derive(Debug, Clone, Default)]
pub(crate) struct Objective {
    pub int_terms: Vec<LinearTerm>,
    pub bool_terms: Vec<(i64, Lit)>,
}

/// A declarative constraint model, built once per solve and handed to the
/// search.
#[derive(Debug, Clone, Default)]
pub struct CpModel {
    pub(crate) int_lb: Vec<i64>,
    pub(crate) int_ub: Vec<i64>,
    pub(crate) bool_count: usize,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Option<Objective>,
    pub(crate) decision_order: Vec<IntVar>,
}

impl CpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_int_var(&mut self, lb: i64, ub: i64) -> IntVar {
        debug_assert!(lb <= ub, "empty initial domain [{lb}, {ub}]");
        let var = IntVar(self.int_lb.len());
        self.int_lb.push(lb);
        self.int_ub.push(ub);
        var
    }

    pub fn new_bool_var(&mut self) -> BoolVar {
        let var = BoolVar(self.bool_count);
        self.bool_count += 1;
        var
    }

    #[inline]
    pub fn int_var_count(&self) -> usize {
        self.int_lb.len()
    }

    #[inline]
    pub fn bool_var_count(&self) -> usize {
        self.bool_count
    }

    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn add_linear(&mut self, int_terms: Vec<LinearTerm>, lo: i64, hi: i64) {
        self.add_linear_enforced(int_terms, lo, hi, &[]);
    }

    pub fn add_linear_enforced(
        &mut self,
        int_terms: Vec<LinearTerm>,
        lo: i64,
        hi: i64,
        enforce: &[Lit],
    ) {
        self.constraints.push(Constraint::Linear(LinearConstraint {
            int_terms,
            bool_terms: Vec::new(),
            lo,
            hi,
            enforce: EnforceList::from_slice(enforce),
        }));
    }

    /// `Σ terms >= bound` while `enforce` holds.
    pub fn add_ge_enforced(&mut self, int_terms: Vec<LinearTerm>, bound: i64, enforce: &[Lit]) {
        self.add_linear_enforced(int_terms, bound, POS_INF, enforce);
    }

    /// `Σ terms <= bound` while `enforce` holds.
    pub fn add_le_enforced(&mut self, int_terms: Vec<LinearTerm>, bound: i64, enforce: &[Lit]) {
        self.add_linear_enforced(int_terms, NEG_INF, bound, enforce);
    }

    pub fn add_clause(&mut self, lits: &[Lit]) {
        self.add_clause_enforced(lits, &[]);
    }

    pub fn add_clause_enforced(&mut self, lits: &[Lit], enforce: &[Lit]) {
        self.constraints.push(Constraint::Clause(ClauseConstraint {
            lits: lits.to_vec(),
            enforce: EnforceList::from_slice(enforce),
        }));
    }

    pub fn add_count(&mut self, lits: &[Lit], lo: usize, hi: usize) {
        debug_assert!(lo <= hi);
        self.constraints.push(Constraint::Count(CountConstraint {
            lits: lits.to_vec(),
            lo,
            hi,
        }));
    }

    pub fn add_exactly_one(&mut self, lits: &[Lit]) {
        self.add_count(lits, 1, 1);
    }

    pub fn add_at_most_one(&mut self, lits: &[Lit]) {
        self.add_count(lits, 0, 1);
    }

    pub fn minimize(&mut self, int_terms: Vec<LinearTerm>, bool_terms: Vec<(i64, Lit)>) {
        self.objective = Some(Objective {
            int_terms,
            bool_terms,
        });
    }

    /// Variables the search branches on first, in this order, minimum value
    /// first. Remaining variables fall back to first-fail.
    pub fn set_decision_order(&mut self, vars: Vec<IntVar>) {
        self.decision_order = vars;
    }

    #[inline]
    pub fn int_bounds(&self, var: IntVar) -> (i64, i64) {
        (self.int_lb[var.index()], self.int_ub[var.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_negation() {
        let mut m = CpModel::new();
        let b = m.new_bool_var();
        assert!(!b.lit().negated());
        assert!((!b).negated());
        assert_eq!(!!b.lit(), b.lit());
    }

    #[test]
    fn test_model_counts() {
        let mut m = CpModel::new();
        let x = m.new_int_var(0, 9);
        let y = m.new_int_var(0, 9);
        let b = m.new_bool_var();
        m.add_linear(vec![term(1, x), term(1, y)], 0, 10);
        m.add_clause(&[b.lit()]);
        m.add_exactly_one(&[b.lit()]);
        assert_eq!(m.int_var_count(), 2);
        assert_eq!(m.bool_var_count(), 1);
        assert_eq!(m.constraint_count(), 3);
        assert_eq!(m.int_bounds(x), (0, 9));
    }
}
