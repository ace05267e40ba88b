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

use crate::common::PanelIdentifier;

/// Structural inconsistencies in the canonical instance. Configurations that
/// went through the validator can never trigger these; they guard direct
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    NoPanels,
    EmptyHorizon,
    NoCandidates,
    PanelIndexMismatch {
        expected: usize,
        found: PanelIdentifier,
    },
    DurationTooShort {
        panel: PanelIdentifier,
    },
    WindowOutsideHorizon {
        panel: PanelIdentifier,
    },
    BadPanelIndex {
        context: &'static str,
        panel: PanelIdentifier,
    },
    DuplicateOrderIndex {
        panel: PanelIdentifier,
    },
    BadPositionRank {
        panel: PanelIdentifier,
        rank: usize,
        panel_count: usize,
    },
    ConflictGroupTooSmall {
        index: usize,
    },
    NegativeGap,
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InstanceError::*;
        match self {
            NoPanels => write!(f, "instance has no panels"),
            EmptyHorizon => write!(f, "instance horizon is empty"),
            NoCandidates => write!(f, "instance has no candidates"),
            PanelIndexMismatch { expected, found } => write!(
                f,
                "panel at catalog position {expected} carries id {found}"
            ),
            DurationTooShort { panel } => {
                write!(f, "panel {panel} must last at least one slot")
            }
            WindowOutsideHorizon { panel } => {
                write!(f, "panel {panel} has a window outside the day horizon")
            }
            BadPanelIndex { context, panel } => {
                write!(f, "{context} references out-of-range panel {panel}")
            }
            DuplicateOrderIndex { panel } => {
                write!(f, "preferred order lists panel {panel} more than once")
            }
            BadPositionRank {
                panel,
                rank,
                panel_count,
            } => write!(
                f,
                "position rank {rank} for panel {panel} is outside [0, {panel_count})"
            ),
            ConflictGroupTooSmall { index } => {
                write!(f, "conflict group {index} has fewer than 2 panels")
            }
            NegativeGap => write!(f, "maximum gap cannot be negative"),
        }
    }
}

impl std::error::Error for InstanceError {}
