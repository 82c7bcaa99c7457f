//! Alphabetic jump table over a visible view.
use std::collections::BTreeMap;

use crate::state::AppRecord;

/// Ordered `(label, first_index)` pairs derived from one visible view.
///
/// Owns its data; rebuilt whenever the view changes, so it never points into
/// a stale list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionIndex {
    sections: Vec<(char, usize)>,
}

impl SectionIndex {
    /// Derive the jump table: one section per distinct upper-cased first
    /// character, keeping the first index where it appears. Records with
    /// empty names are skipped.
    pub fn build(records: &[AppRecord]) -> Self {
        let mut first: BTreeMap<char, usize> = BTreeMap::new();
        for (i, rec) in records.iter().enumerate() {
            let Some(ch) = rec.display_name.chars().next() else {
                continue;
            };
            let label = ch.to_uppercase().next().unwrap_or(ch);
            first.entry(label).or_insert(i);
        }
        Self {
            sections: first.into_iter().collect(),
        }
    }

    /// Section labels in label order.
    pub fn labels(&self) -> Vec<char> {
        self.sections.iter().map(|(label, _)| *label).collect()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First row index of the section at `ordinal`, clamped to the last
    /// section when asked past the end. `None` only when empty.
    pub fn jump(&self, ordinal: usize) -> Option<usize> {
        let last = self.sections.len().checked_sub(1)?;
        Some(self.sections[ordinal.min(last)].1)
    }
}
