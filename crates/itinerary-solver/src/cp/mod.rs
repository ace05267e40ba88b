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

//! A small finite-domain constraint solver.
//!
//! The model surface is deliberately narrow so the rest of the crate stays
//! portable across CP backends: bounded integer variables, booleans,
//! half-reified linear range constraints, enforced clauses, cardinality
//! counts, and a single linear minimization objective. The search is a
//! chronological depth-first branch-and-bound over fixpoint bounds
//! propagation, pruning against an incumbent shared across portfolio
//! workers.

pub mod model;
pub mod search;

pub use model::{BoolVar, CpModel, IntVar, LinearTerm, Lit};
pub use search::{
    solve, solve_portfolio, Assignment, SearchLimits, SearchOutcome, SearchStats, SearchStatus,
    SharedIncumbent,
};
