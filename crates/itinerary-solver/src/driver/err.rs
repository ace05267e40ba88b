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

use crate::model::ModelError;
use itinerary_model::prelude::VerificationError;

/// Fatal solver-side failures. Infeasibility and timeouts are ordinary
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    Model(ModelError),
    Verification(VerificationError),
    ObjectiveMismatch { expected: i64, reported: i64 },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Model(e) => write!(f, "model build failed: {e}"),
            SolveError::Verification(e) => write!(f, "schedule verification failed: {e}"),
            SolveError::ObjectiveMismatch { expected, reported } => write!(
                f,
                "solver objective {reported} does not match the extracted schedule ({expected})"
            ),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<ModelError> for SolveError {
    fn from(e: ModelError) -> Self {
        SolveError::Model(e)
    }
}

impl From<VerificationError> for SolveError {
    fn from(e: VerificationError) -> Self {
        SolveError::Verification(e)
    }
}
