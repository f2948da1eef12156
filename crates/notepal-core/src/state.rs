//! Session state and the reducer that owns every mutation of it.
//!
//! The session mirrors the remote collection for the lifetime of one
//! session. Actions are dispatched only after the store confirmed the
//! change, so the reducer never has to roll anything back.

use std::collections::HashSet;

use crate::defaults::FIRST_PAGE;
use crate::models::{Note, NoteId};

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Local mirror of the remote collection. Order carries no meaning.
    pub notes: Vec<Note>,
    /// Current list page, 1-indexed.
    pub cur_page: usize,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            cur_page: FIRST_PAGE,
            is_loading: false,
        }
    }
}

impl SessionState {
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetNotes(Vec<Note>),
    AddNote(Note),
    EditNote(Note),
    DeleteNote(Note),
    ArchiveNote(Note),
    ArchiveMultiple(Vec<NoteId>),
    UnarchiveMultiple(Vec<NoteId>),
    DeleteMultiple(Vec<NoteId>),
    SetCurrentPage(usize),
    /// Flips the loading flag; it is not a setter.
    SetLoading,
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetNotes(_) => "SET_NOTES",
            Action::AddNote(_) => "ADD_NOTE",
            Action::EditNote(_) => "EDIT_NOTE",
            Action::DeleteNote(_) => "DELETE_NOTE",
            Action::ArchiveNote(_) => "ARCHIVE_NOTE",
            Action::ArchiveMultiple(_) => "ARCHIVE_MULTIPLE",
            Action::UnarchiveMultiple(_) => "UNARCHIVE_MULTIPLE",
            Action::DeleteMultiple(_) => "DELETE_MULTIPLE",
            Action::SetCurrentPage(_) => "SET_CURRENT_PAGE",
            Action::SetLoading => "SET_LOADING",
        }
    }
}

/// Apply one action to the state.
pub fn reduce(state: &mut SessionState, action: Action) {
    tracing::trace!(action = action.name(), "Reducing action");

    match action {
        Action::SetNotes(notes) => {
            state.notes = dedup_by_id(notes);
        }
        Action::AddNote(note) => match state.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => state.notes.push(note),
        },
        Action::EditNote(note) => {
            if let Some(existing) = state.notes.iter_mut().find(|n| n.id == note.id) {
                *existing = note;
            }
        }
        Action::DeleteNote(note) => {
            state.notes.retain(|n| n.id != note.id);
        }
        Action::ArchiveNote(note) => {
            if let Some(existing) = state.notes.iter_mut().find(|n| n.id == note.id) {
                existing.archived = note.archived;
            }
        }
        Action::ArchiveMultiple(ids) => {
            set_archived(&mut state.notes, &ids, true);
            state.cur_page = FIRST_PAGE;
        }
        Action::UnarchiveMultiple(ids) => {
            set_archived(&mut state.notes, &ids, false);
            state.cur_page = FIRST_PAGE;
        }
        Action::DeleteMultiple(ids) => {
            let ids: HashSet<NoteId> = ids.into_iter().collect();
            state.notes.retain(|n| !ids.contains(&n.id));
            state.cur_page = FIRST_PAGE;
        }
        Action::SetCurrentPage(page) => {
            state.cur_page = page.max(FIRST_PAGE);
        }
        Action::SetLoading => {
            state.is_loading = !state.is_loading;
        }
    }
}

fn set_archived(notes: &mut [Note], ids: &[NoteId], archived: bool) {
    let ids: HashSet<NoteId> = ids.iter().copied().collect();
    for note in notes.iter_mut().filter(|n| ids.contains(&n.id)) {
        note.archived = archived;
    }
}

/// Keep one note per id; a later row replaces an earlier one in place.
fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut out: Vec<Note> = Vec::with_capacity(notes.len());
    for note in notes {
        match out.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => out.push(note),
        }
    }
    out
}
