//! Checked-note tracking for one rendered list.
//!
//! The aggregate "select all" checkbox state is derived from the selection
//! and the currently visible ids on every call; it is never stored.
//! Changing page does not prune the selection.

use std::collections::BTreeSet;

use crate::models::NoteId;

/// Tri-state of the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Set of checked note ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<NoteId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `id` if unchecked, uncheck it otherwise.
    pub fn toggle_one(&mut self, id: NoteId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Clear the selection if it already equals `visible`, otherwise select
    /// exactly `visible`.
    pub fn toggle_all(&mut self, visible: &[NoteId]) {
        let visible: BTreeSet<NoteId> = visible.iter().copied().collect();
        if self.selected == visible {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    pub fn check_state(&self, visible: &[NoteId]) -> CheckState {
        if self.selected.is_empty() {
            return CheckState::Unchecked;
        }
        let visible: BTreeSet<NoteId> = visible.iter().copied().collect();
        if self.selected == visible {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    pub fn is_selected(&self, id: NoteId) -> bool {
        self.selected.contains(&id)
    }

    /// Drop ids that no longer exist in `existing`.
    ///
    /// Call after the collection changed (delete, archive out of the tab).
    /// Ids that merely scrolled to another page must be passed in `existing`
    /// too, so they survive.
    pub fn retain_existing(&mut self, existing: &[NoteId]) {
        let existing: BTreeSet<NoteId> = existing.iter().copied().collect();
        self.selected.retain(|id| existing.contains(id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected ids in ascending order, ready for a bulk call.
    pub fn ids(&self) -> Vec<NoteId> {
        self.selected.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
