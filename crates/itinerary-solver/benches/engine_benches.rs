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

use criterion::{criterion_group, criterion_main, Criterion};
use itinerary_model::prelude::{Instance, ScheduleConfig};
use itinerary_solver::cp::{solve, SearchLimits};
use itinerary_solver::model::SessionModel;

fn two_candidate_instance() -> Instance {
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

fn bench_model_build(c: &mut Criterion) {
    let instance = two_candidate_instance();
    c.bench_function("session_model_build", |b| {
        b.iter(|| SessionModel::build(&instance).unwrap())
    });
}

fn bench_solve(c: &mut Criterion) {
    let instance = two_candidate_instance();
    c.bench_function("solve_two_candidates", |b| {
        b.iter(|| {
            let model = SessionModel::build(&instance).unwrap();
            solve(model.cp(), &SearchLimits::default())
        })
    });
}

criterion_group!(benches, bench_model_build, bench_solve);
criterion_main!(benches);
