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

use crate::common::{CandidateIdentifier, PanelIdentifier};
use crate::instance::SessionPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingSessionError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
}

impl MissingSessionError {
    pub fn new(candidate: CandidateIdentifier, panel: PanelIdentifier) -> Self {
        Self { candidate, panel }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }
}

impl std::fmt::Display for MissingSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no session of panel {} for candidate {}",
            self.panel, self.candidate
        )
    }
}

impl std::error::Error for MissingSessionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateSessionError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
}

impl DuplicateSessionError {
    pub fn new(candidate: CandidateIdentifier, panel: PanelIdentifier) -> Self {
        Self { candidate, panel }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }
}

impl std::fmt::Display for DuplicateSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate {} attends panel {} more than once",
            self.candidate, self.panel
        )
    }
}

impl std::error::Error for DuplicateSessionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionLengthError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
    expected_slots: i64,
    actual_slots: i64,
}

impl SessionLengthError {
    pub fn new(
        candidate: CandidateIdentifier,
        panel: PanelIdentifier,
        expected_slots: i64,
        actual_slots: i64,
    ) -> Self {
        Self {
            candidate,
            panel,
            expected_slots,
            actual_slots,
        }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }
}

impl std::fmt::Display for SessionLengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "session of panel {} for candidate {} lasts {} slots, expected {}",
            self.panel, self.candidate, self.actual_slots, self.expected_slots
        )
    }
}

impl std::error::Error for SessionLengthError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayBoundsError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
}

impl DayBoundsError {
    pub fn new(candidate: CandidateIdentifier, panel: PanelIdentifier) -> Self {
        Self { candidate, panel }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }
}

impl std::fmt::Display for DayBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "session of panel {} for candidate {} leaves the day window",
            self.panel, self.candidate
        )
    }
}

impl std::error::Error for DayBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutsideAvailabilityError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
}

impl OutsideAvailabilityError {
    pub fn new(candidate: CandidateIdentifier, panel: PanelIdentifier) -> Self {
        Self { candidate, panel }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }
}

impl std::fmt::Display for OutsideAvailabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "session of panel {} for candidate {} lies outside the panel's availability",
            self.panel, self.candidate
        )
    }
}

impl std::error::Error for OutsideAvailabilityError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleBookingError {
    candidate: CandidateIdentifier,
    first: PanelIdentifier,
    second: PanelIdentifier,
}

impl DoubleBookingError {
    pub fn new(
        candidate: CandidateIdentifier,
        first: PanelIdentifier,
        second: PanelIdentifier,
    ) -> Self {
        Self {
            candidate,
            first,
            second,
        }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn first(&self) -> PanelIdentifier {
        self.first
    }

    pub fn second(&self) -> PanelIdentifier {
        self.second
    }
}

impl std::fmt::Display for DoubleBookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate {} is double-booked between panels {} and {}",
            self.candidate, self.first, self.second
        )
    }
}

impl std::error::Error for DoubleBookingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapacityOverlapError {
    panel: PanelIdentifier,
    first: CandidateIdentifier,
    second: CandidateIdentifier,
}

impl CapacityOverlapError {
    pub fn new(
        panel: PanelIdentifier,
        first: CandidateIdentifier,
        second: CandidateIdentifier,
    ) -> Self {
        Self {
            panel,
            first,
            second,
        }
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }

    pub fn first(&self) -> CandidateIdentifier {
        self.first
    }

    pub fn second(&self) -> CandidateIdentifier {
        self.second
    }
}

impl std::fmt::Display for CapacityOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "panel {} hosts candidates {} and {} at the same time",
            self.panel, self.first, self.second
        )
    }
}

impl std::error::Error for CapacityOverlapError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConflictOverlapError {
    group: usize,
    first_candidate: CandidateIdentifier,
    first_panel: PanelIdentifier,
    second_candidate: CandidateIdentifier,
    second_panel: PanelIdentifier,
}

impl ConflictOverlapError {
    pub fn new(
        group: usize,
        first_candidate: CandidateIdentifier,
        first_panel: PanelIdentifier,
        second_candidate: CandidateIdentifier,
        second_panel: PanelIdentifier,
    ) -> Self {
        Self {
            group,
            first_candidate,
            first_panel,
            second_candidate,
            second_panel,
        }
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn first(&self) -> (CandidateIdentifier, PanelIdentifier) {
        (self.first_candidate, self.first_panel)
    }

    pub fn second(&self) -> (CandidateIdentifier, PanelIdentifier) {
        (self.second_candidate, self.second_panel)
    }
}

impl std::fmt::Display for ConflictOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "conflict group {}: session ({}, {}) overlaps session ({}, {})",
            self.group,
            self.first_candidate,
            self.first_panel,
            self.second_candidate,
            self.second_panel
        )
    }
}

impl std::error::Error for ConflictOverlapError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GapExceededError {
    candidate: CandidateIdentifier,
    earlier: PanelIdentifier,
    later: PanelIdentifier,
    gap_slots: i64,
    limit_slots: i64,
}

impl GapExceededError {
    pub fn new(
        candidate: CandidateIdentifier,
        earlier: PanelIdentifier,
        later: PanelIdentifier,
        gap_slots: i64,
        limit_slots: i64,
    ) -> Self {
        Self {
            candidate,
            earlier,
            later,
            gap_slots,
            limit_slots,
        }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn gap_slots(&self) -> i64 {
        self.gap_slots
    }
}

impl std::fmt::Display for GapExceededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate {} idles {} slots between panels {} and {} (limit {})",
            self.candidate, self.gap_slots, self.earlier, self.later, self.limit_slots
        )
    }
}

impl std::error::Error for GapExceededError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionViolationError {
    candidate: CandidateIdentifier,
    panel: PanelIdentifier,
    expected: SessionPosition,
    actual_rank: usize,
}

impl PositionViolationError {
    pub fn new(
        candidate: CandidateIdentifier,
        panel: PanelIdentifier,
        expected: SessionPosition,
        actual_rank: usize,
    ) -> Self {
        Self {
            candidate,
            panel,
            expected,
            actual_rank,
        }
    }

    pub fn candidate(&self) -> CandidateIdentifier {
        self.candidate
    }

    pub fn panel(&self) -> PanelIdentifier {
        self.panel
    }

    pub fn expected(&self) -> SessionPosition {
        self.expected
    }

    pub fn actual_rank(&self) -> usize {
        self.actual_rank
    }
}

impl std::fmt::Display for PositionViolationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "panel {} sits at rank {} for candidate {}, constrained to '{}'",
            self.panel, self.actual_rank, self.candidate, self.expected
        )
    }
}

impl std::error::Error for PositionViolationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreakCountError {
    claimed: usize,
    actual: usize,
}

impl BreakCountError {
    pub fn new(claimed: usize, actual: usize) -> Self {
        Self { claimed, actual }
    }

    pub fn claimed(&self) -> usize {
        self.claimed
    }

    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl std::fmt::Display for BreakCountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "summary claims {} order breaks, schedule shows {}",
            self.claimed, self.actual
        )
    }
}

impl std::error::Error for BreakCountError {}

/// A violated hard invariant in a solver-returned schedule. Any of these is
/// a modeling or extraction bug, never a user error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    MissingSession(MissingSessionError),
    DuplicateSession(DuplicateSessionError),
    SessionLength(SessionLengthError),
    DayBounds(DayBoundsError),
    OutsideAvailability(OutsideAvailabilityError),
    DoubleBooking(DoubleBookingError),
    CapacityOverlap(CapacityOverlapError),
    ConflictOverlap(ConflictOverlapError),
    GapExceeded(GapExceededError),
    PositionViolation(PositionViolationError),
    BreakCount(BreakCountError),
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use VerificationError::*;
        match self {
            MissingSession(e) => write!(f, "{e}"),
            DuplicateSession(e) => write!(f, "{e}"),
            SessionLength(e) => write!(f, "{e}"),
            DayBounds(e) => write!(f, "{e}"),
            OutsideAvailability(e) => write!(f, "{e}"),
            DoubleBooking(e) => write!(f, "{e}"),
            CapacityOverlap(e) => write!(f, "{e}"),
            ConflictOverlap(e) => write!(f, "{e}"),
            GapExceeded(e) => write!(f, "{e}"),
            PositionViolation(e) => write!(f, "{e}"),
            BreakCount(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for VerificationError {}

impl From<MissingSessionError> for VerificationError {
    fn from(e: MissingSessionError) -> Self {
        VerificationError::MissingSession(e)
    }
}

impl From<DuplicateSessionError> for VerificationError {
    fn from(e: DuplicateSessionError) -> Self {
        VerificationError::DuplicateSession(e)
    }
}

impl From<SessionLengthError> for VerificationError {
    fn from(e: SessionLengthError) -> Self {
        VerificationError::SessionLength(e)
    }
}

impl From<DayBoundsError> for VerificationError {
    fn from(e: DayBoundsError) -> Self {
        VerificationError::DayBounds(e)
    }
}

impl From<OutsideAvailabilityError> for VerificationError {
    fn from(e: OutsideAvailabilityError) -> Self {
        VerificationError::OutsideAvailability(e)
    }
}

impl From<DoubleBookingError> for VerificationError {
    fn from(e: DoubleBookingError) -> Self {
        VerificationError::DoubleBooking(e)
    }
}

impl From<CapacityOverlapError> for VerificationError {
    fn from(e: CapacityOverlapError) -> Self {
        VerificationError::CapacityOverlap(e)
    }
}

impl From<ConflictOverlapError> for VerificationError {
    fn from(e: ConflictOverlapError) -> Self {
        VerificationError::ConflictOverlap(e)
    }
}

impl From<GapExceededError> for VerificationError {
    fn from(e: GapExceededError) -> Self {
        VerificationError::GapExceeded(e)
    }
}

impl From<PositionViolationError> for VerificationError {
    fn from(e: PositionViolationError) -> Self {
        VerificationError::PositionViolation(e)
    }
}

impl From<BreakCountError> for VerificationError {
    fn from(e: BreakCountError) -> Self {
        VerificationError::BreakCount(e)
    }
}
