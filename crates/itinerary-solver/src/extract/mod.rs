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

//! Decodes a raw variable assignment into a schedule and its summary.

use crate::cp::Assignment;
use crate::model::SessionModel;
use itinerary_model::common::{CandidateIdentifier, PanelIdentifier};
use itinerary_model::prelude::{Instance, Schedule, ScheduleStatus, Session, Summary};
use itinerary_core::prelude::{SlotInterval, SlotPoint};

/// Reads every session's start value and assembles the chronological
/// schedule.
pub fn extract_schedule(
    instance: &Instance,
    model: &SessionModel,
    assignment: &Assignment,
) -> Schedule {
    let mut sessions = Vec::with_capacity(instance.session_count());
    for c in 0..instance.candidate_count() {
        for (p, panel) in instance.panels().iter().enumerate() {
            let start = SlotPoint::new(assignment.value(model.start_var(c, p)));
            sessions.push(Session::new(
                CandidateIdentifier::new(c),
                PanelIdentifier::new(p),
                SlotInterval::new(start, start + panel.duration()),
            ));
        }
    }
    Schedule::from_sessions(instance.candidate_count(), sessions)
}

/// Computes the headline metrics of an extracted schedule.
pub fn summarize(instance: &Instance, schedule: &Schedule, status: ScheduleStatus) -> Summary {
    Summary {
        status,
        order_breaks: schedule.count_order_breaks(instance),
        day_end_time: instance.slot_label(schedule.makespan()),
        max_gap_enforced: instance.max_gap_minutes(),
    }
}
