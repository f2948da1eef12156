//! Core traits for NotePal abstractions.
//!
//! The session layer talks to the remote note store only through
//! [`NoteRepository`], so the HTTP client and the in-memory mock are
//! interchangeable.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteDraft, NoteId};

/// Repository for note CRUD operations against the remote store.
///
/// Every method is a single remote call. Nothing is retried.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Fetch every note visible to the session.
    async fn fetch_all(&self) -> Result<Vec<Note>>;

    /// Fetch a single note by id.
    async fn fetch(&self, id: NoteId) -> Result<Note>;

    /// Fetch the notes matching a list of ids. Unknown ids are skipped.
    async fn fetch_many(&self, ids: &[NoteId]) -> Result<Vec<Note>>;

    /// Insert a note; the store assigns `id` and `created_at`.
    async fn create(&self, draft: NoteDraft) -> Result<Note>;

    /// Replace the title and content of a note. Never touches `archived`.
    async fn update(&self, id: NoteId, draft: NoteDraft) -> Result<Note>;

    /// Delete a note and return its last representation.
    async fn remove(&self, id: NoteId) -> Result<Note>;

    /// Delete every listed note, returning the rows actually deleted.
    async fn remove_many(&self, ids: &[NoteId]) -> Result<Vec<Note>>;

    /// Toggle the archive flag.
    ///
    /// `current` is the note's *current* archived value; the stored value
    /// becomes `!current`.
    async fn set_archived(&self, id: NoteId, current: bool) -> Result<Note>;

    /// Set the archive flag of every listed note to exactly `archived`.
    async fn set_archived_many(&self, ids: &[NoteId], archived: bool) -> Result<Vec<Note>>;
}
