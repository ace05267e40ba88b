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

//! The collaborator-facing facade: validate, schedule, schedule-multiple,
//! with serializable response shapes.

use crate::driver::{SolveError, SolveOptions, SolveOutcome, Solved, Solver};
use itinerary_model::prelude::{Instance, ScheduleConfig, SolutionDocument};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<SolutionDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiScheduleResponse {
    pub success: bool,
    pub num_solutions: usize,
    pub solutions: Vec<SolutionDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Checks a configuration without solving.
pub fn validate(config: &ScheduleConfig) -> ValidationResponse {
    match config.validate() {
        Ok(()) => ValidationResponse {
            valid: true,
            error: None,
        },
        Err(e) => ValidationResponse {
            valid: false,
            error: Some(e.to_string()),
        },
    }
}

fn render(instance: &Instance, solved: &Solved) -> SolutionDocument {
    solved
        .schedule
        .render(instance, solved.summary.clone())
}

fn failure_message(outcome: &SolveOutcome) -> &'static str {
    match outcome {
        SolveOutcome::Infeasible => {
            "No feasible solutions found. Try relaxing constraints."
        }
        _ => "Time limit reached before a solution was found.",
    }
}

/// Validates, solves, and renders one schedule.
pub fn schedule(config: &ScheduleConfig, options: &SolveOptions) -> ScheduleResponse {
    let instance = match Instance::from_config(config) {
        Ok(instance) => instance,
        Err(e) => {
            return ScheduleResponse {
                success: false,
                solution: None,
                error: Some(e.to_string()),
            }
        }
    };
    match Solver::solve(&instance, options) {
        Ok(outcome) => match outcome.solved() {
            Some(solved) => ScheduleResponse {
                success: true,
                solution: Some(render(&instance, solved)),
                error: None,
            },
            None => ScheduleResponse {
                success: false,
                solution: None,
                error: Some(failure_message(&outcome).to_string()),
            },
        },
        Err(e) => ScheduleResponse {
            success: false,
            solution: None,
            error: Some(e.to_string()),
        },
    }
}

/// Validates, then produces up to `k` pairwise distinct schedules.
pub fn schedule_multiple(
    config: &ScheduleConfig,
    options: &SolveOptions,
    k: usize,
) -> MultiScheduleResponse {
    let instance = match Instance::from_config(config) {
        Ok(instance) => instance,
        Err(e) => {
            return MultiScheduleResponse {
                success: false,
                num_solutions: 0,
                solutions: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    };
    let outcomes: Result<Vec<SolveOutcome>, SolveError> =
        Solver::solve_multi(&instance, options, k);
    match outcomes {
        Ok(outcomes) => {
            let solutions: Vec<SolutionDocument> = outcomes
                .iter()
                .filter_map(|o| o.solved())
                .map(|s| render(&instance, s))
                .collect();
            if solutions.is_empty() {
                MultiScheduleResponse {
                    success: false,
                    num_solutions: 0,
                    solutions,
                    error: Some(
                        "No feasible solutions found. Try relaxing constraints.".to_string(),
                    ),
                }
            } else {
                MultiScheduleResponse {
                    success: true,
                    num_solutions: solutions.len(),
                    solutions,
                    error: None,
                }
            }
        }
        Err(e) => MultiScheduleResponse {
            success: false,
            num_solutions: 0,
            solutions: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}
