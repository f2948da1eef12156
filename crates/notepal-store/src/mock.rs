//! In-memory note repository for deterministic testing.
//!
//! Behaves like the remote store for the operations NotePal uses: ids are
//! assigned sequentially, `created_at` advances one minute per insert, and
//! bulk calls silently skip unknown ids. Failures and latency can be
//! injected per operation.
//!
//! ## Usage
//!
//! ```rust
//! use notepal_core::{NoteDraft, NoteRepository};
//! use notepal_store::mock::InMemoryNoteStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryNoteStore::new().failing_on("remove");
//!
//!     let note = store.create(NoteDraft::new("a", "b")).await.unwrap();
//!     assert!(store.remove(note.id).await.is_err());
//!     assert_eq!(store.call_count("remove"), 1);
//! }
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use notepal_core::{Error, Note, NoteDraft, NoteId, NoteRepository, Result};

/// One recorded repository call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub ids: Vec<NoteId>,
    pub timestamp: Instant,
}

#[derive(Debug)]
struct MockState {
    notes: Vec<Note>,
    next_id: NoteId,
    failing: HashSet<String>,
    calls: Vec<MockCall>,
}

/// Mock note store for tests.
#[derive(Clone)]
pub struct InMemoryNoteStore {
    state: Arc<Mutex<MockState>>,
    latency: Duration,
    epoch: DateTime<Utc>,
}

impl InMemoryNoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                notes: Vec::new(),
                next_id: 1,
                failing: HashSet::new(),
                calls: Vec::new(),
            })),
            latency: Duration::ZERO,
            epoch: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    /// Seed the store with existing rows.
    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        {
            let mut state = self.lock();
            state.next_id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
            state.notes = notes;
        }
        self
    }

    /// Seed `count` notes titled "Note 1".."Note N", all active.
    pub fn with_sample_notes(self, count: usize) -> Self {
        let epoch = self.epoch;
        let notes = (1..=count as NoteId)
            .map(|id| Note {
                id,
                title: format!("Note {}", id),
                content: format!("Content of note {}", id),
                created_at: epoch + chrono::Duration::minutes(id),
                archived: false,
            })
            .collect();
        self.with_notes(notes)
    }

    /// Delay every call by `latency_ms`.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency = Duration::from_millis(latency_ms);
        self
    }

    /// Make every call of `operation` fail.
    pub fn failing_on(self, operation: &str) -> Self {
        self.fail_on(operation);
        self
    }

    /// Make every call of `operation` fail from now on.
    pub fn fail_on(&self, operation: &str) {
        self.lock().failing.insert(operation.to_string());
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    /// Current rows, in insertion order.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `operation`.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log the call, wait out the latency, then report injected failure.
    async fn enter(
        &self,
        operation: &str,
        ids: &[NoteId],
        fail_as: fn(String) -> Error,
    ) -> Result<()> {
        let failing = {
            let mut state = self.lock();
            state.calls.push(MockCall {
                operation: operation.to_string(),
                ids: ids.to_vec(),
                timestamp: Instant::now(),
            });
            state.failing.contains(operation)
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if failing {
            return Err(fail_as(format!("simulated {} failure", operation)));
        }
        Ok(())
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteStore {
    async fn fetch_all(&self) -> Result<Vec<Note>> {
        self.enter("fetch_all", &[], Error::Fetch).await?;
        Ok(self.notes())
    }

    async fn fetch(&self, id: NoteId) -> Result<Note> {
        self.enter("fetch", &[id], Error::Fetch).await?;
        self.lock()
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn fetch_many(&self, ids: &[NoteId]) -> Result<Vec<Note>> {
        self.enter("fetch_many", ids, Error::Fetch).await?;
        Ok(self
            .lock()
            .notes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: NoteDraft) -> Result<Note> {
        self.enter("create", &[], Error::Write).await?;
        let epoch = self.epoch;
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let note = Note {
            id,
            title: draft.title,
            content: draft.content,
            created_at: epoch + chrono::Duration::minutes(id),
            archived: false,
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: NoteId, draft: NoteDraft) -> Result<Note> {
        self.enter("update", &[id], Error::Write).await?;
        let mut state = self.lock();
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::Write("update: no row returned".to_string()))?;
        note.title = draft.title;
        note.content = draft.content;
        Ok(note.clone())
    }

    async fn remove(&self, id: NoteId) -> Result<Note> {
        self.enter("remove", &[id], Error::Write).await?;
        let mut state = self.lock();
        let index = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::Write("remove: no row returned".to_string()))?;
        Ok(state.notes.remove(index))
    }

    async fn remove_many(&self, ids: &[NoteId]) -> Result<Vec<Note>> {
        self.enter("remove_many", ids, Error::Write).await?;
        let mut state = self.lock();
        let (removed, kept): (Vec<Note>, Vec<Note>) = state
            .notes
            .drain(..)
            .partition(|n| ids.contains(&n.id));
        state.notes = kept;
        Ok(removed)
    }

    async fn set_archived(&self, id: NoteId, current: bool) -> Result<Note> {
        self.enter("set_archived", &[id], Error::Write).await?;
        let mut state = self.lock();
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::Write("set_archived: no row returned".to_string()))?;
        note.archived = !current;
        Ok(note.clone())
    }

    async fn set_archived_many(&self, ids: &[NoteId], archived: bool) -> Result<Vec<Note>> {
        self.enter("set_archived_many", ids, Error::Write).await?;
        let mut state = self.lock();
        let mut updated = Vec::new();
        for note in state.notes.iter_mut().filter(|n| ids.contains(&n.id)) {
            note.archived = archived;
            updated.push(note.clone());
        }
        Ok(updated)
    }
}
