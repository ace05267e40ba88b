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

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

/// A typed index. Panel and candidate indices share representation but can
/// never be mixed up.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub const fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> I
    where
        I: Copy,
    {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelIdentifierMarker;

impl IdentifierMarkerName for PanelIdentifierMarker {
    const NAME: &'static str = "PanelId";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateIdentifierMarker;

impl IdentifierMarkerName for CandidateIdentifierMarker {
    const NAME: &'static str = "CandidateId";
}

/// Interned panel index, assigned in catalog order at the config boundary.
pub type PanelIdentifier = Identifier<usize, PanelIdentifierMarker>;

/// Candidate index in `[0, num_candidates)`.
pub type CandidateIdentifier = Identifier<usize, CandidateIdentifierMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_display_with_marker_name() {
        assert_eq!(format!("{}", PanelIdentifier::new(3)), "PanelId(3)");
        assert_eq!(format!("{}", CandidateIdentifier::new(0)), "CandidateId(0)");
    }

    #[test]
    fn test_identifiers_order_by_value() {
        assert!(PanelIdentifier::new(1) < PanelIdentifier::new(2));
    }
}
