//! Session context: the single writable owner of the note collection.
//!
//! Every mutating operation follows the same protocol:
//!
//! 1. toggle the loading flag,
//! 2. call the repository (a suspension point, raced against cancellation),
//! 3. on success dispatch the matching action and emit a success
//!    notification; on failure emit an error notification and leave the
//!    collection untouched,
//! 4. toggle the loading flag back.
//!
//! Changes are applied only after the store confirmed them. Overlapping
//! operations each flip the loading flag, so the flag can flicker while
//! two requests are in flight. Identical concurrent requests are not
//! collapsed.

use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use notepal_core::{
    compute_view, reduce, Action, CancelToken, Error, Note, NoteDraft, NoteId, NoteRepository,
    NoteView, Notification, NotificationBus, Result, SearchField, SessionState, SortKey, Tab,
    ViewSpec,
};
use notepal_store::RestNoteStore;

/// Tab and search/sort controls of the note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListControls {
    pub tab: Tab,
    pub spec: ViewSpec,
}

struct Shared<R> {
    repo: R,
    state: RwLock<SessionState>,
    controls: RwLock<ListControls>,
    bus: NotificationBus,
    initialized: AtomicBool,
}

/// Explicitly constructed session context.
///
/// Cloning is cheap and every clone shares the same state. [`scoped`]
/// clones with a child cancellation token so a view can abort its own
/// requests on teardown without touching the rest of the session.
///
/// [`scoped`]: NoteSession::scoped
pub struct NoteSession<R> {
    shared: Arc<Shared<R>>,
    cancel: CancelToken,
}

impl<R> Clone for NoteSession<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
        }
    }
}

impl NoteSession<RestNoteStore> {
    /// Connect to the remote store configured through `NOTEPAL_STORE_*`.
    ///
    /// Loads `.env` from the working directory first; variables already set
    /// in the process take precedence.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::new(RestNoteStore::from_env()?))
    }

    /// Like [`from_env`](Self::from_env) but reads the given dotenv file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|e| {
            Error::Config(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Ok(Self::new(RestNoteStore::from_env()?))
    }
}

impl<R: NoteRepository> NoteSession<R> {
    pub fn new(repo: R) -> Self {
        Self::with_bus(repo, NotificationBus::default())
    }

    /// Create a session publishing into an existing notification bus.
    pub fn with_bus(repo: R, bus: NotificationBus) -> Self {
        Self {
            shared: Arc::new(Shared {
                repo,
                state: RwLock::new(SessionState::default()),
                controls: RwLock::new(ListControls::default()),
                bus,
                initialized: AtomicBool::new(false),
            }),
            cancel: CancelToken::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.shared.repo
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.shared.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.bus.subscribe()
    }

    /// Clone sharing this session's state with a child cancellation token.
    pub fn scoped(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.child(),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Abort in-flight operations started through this handle or its scopes.
    ///
    /// Aborted operations apply nothing and emit no notification.
    pub fn teardown(&self) {
        info!(
            subsystem = "session",
            component = "note_session",
            op = "teardown",
            "Tearing down session scope"
        );
        self.cancel.cancel();
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::SeqCst)
    }

    /// Load the collection from the store, once per session.
    ///
    /// Returns `Ok(false)` without a request when the session was already
    /// initialized, including after a failed first load.
    pub async fn init(&self) -> Result<bool> {
        if self.shared.initialized.swap(true, Ordering::SeqCst) {
            debug!(
                subsystem = "session",
                component = "note_session",
                op = "init",
                "Session already initialized, skipping fetch"
            );
            return Ok(false);
        }

        info!(
            subsystem = "session",
            component = "note_session",
            op = "init",
            "Loading notes"
        );

        self.perform(
            "init",
            "There was an error loading your notes",
            self.shared.repo.fetch_all(),
            |notes: &Vec<Note>| (Action::SetNotes(notes.clone()), None),
        )
        .await
        .map(|_| true)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.shared.state.read().await.clone()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.shared.state.read().await.notes.clone()
    }

    /// Local copy of one note, e.g. to prefill the edit form.
    pub async fn note(&self, id: NoteId) -> Option<Note> {
        self.shared.state.read().await.note(id).cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.shared.state.read().await.is_loading
    }

    pub async fn cur_page(&self) -> usize {
        self.shared.state.read().await.cur_page
    }

    /// Fetch one note straight from the store for the detail view.
    ///
    /// Does not touch session state.
    pub async fn load_note(&self, id: NoteId) -> Result<Note> {
        debug!(
            subsystem = "session",
            component = "note_session",
            op = "load_note",
            note_id = id,
            "Loading note"
        );
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled("load_note")),
            result = self.shared.repo.fetch(id) => result,
        }
    }

    // ── List controls ───────────────────────────────────────────────

    pub async fn controls(&self) -> ListControls {
        self.shared.controls.read().await.clone()
    }

    pub async fn set_current_page(&self, page: usize) {
        self.dispatch(Action::SetCurrentPage(page)).await;
    }

    /// Switch tabs. Returns to the first page when the tab changes.
    pub async fn set_tab(&self, tab: Tab) {
        let changed = {
            let mut controls = self.shared.controls.write().await;
            let changed = controls.tab != tab;
            controls.tab = tab;
            changed
        };
        if changed {
            self.dispatch(Action::SetCurrentPage(1)).await;
        }
    }

    /// Set the search query. Returns to the first page when it changes.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        debug!(
            subsystem = "session",
            component = "list_controls",
            op = "set_query",
            query = %query,
            "Search query changed"
        );
        let changed = {
            let mut controls = self.shared.controls.write().await;
            let changed = controls.spec.query != query;
            controls.spec.query = query;
            changed
        };
        if changed {
            self.dispatch(Action::SetCurrentPage(1)).await;
        }
    }

    /// Choose the searched field. Clears the query and returns to the first
    /// page when the field changes.
    pub async fn set_search_field(&self, field: SearchField) {
        let changed = {
            let mut controls = self.shared.controls.write().await;
            let changed = controls.spec.search_field != field;
            if changed {
                controls.spec.search_field = field;
                controls.spec.query.clear();
            }
            changed
        };
        if changed {
            self.dispatch(Action::SetCurrentPage(1)).await;
        }
    }

    /// Change the sort order. The current page is kept.
    pub async fn set_sort(&self, sort: SortKey) {
        self.shared.controls.write().await.spec.sort = sort;
    }

    /// Run the view pipeline over the current state and controls.
    pub async fn current_view(&self) -> NoteView {
        let controls = self.controls().await;
        let state = self.shared.state.read().await;
        compute_view(&state.notes, controls.tab, &controls.spec, state.cur_page)
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub async fn add_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note> {
        let draft = NoteDraft::new(title, content);
        self.perform(
            "add_note",
            "Error adding your note",
            self.shared.repo.create(draft),
            |note: &Note| {
                (
                    Action::AddNote(note.clone()),
                    Some(format!(
                        "You have successfully created a new note: {}",
                        note.title
                    )),
                )
            },
        )
        .await
    }

    pub async fn edit_note(
        &self,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note> {
        let draft = NoteDraft::new(title, content);
        self.perform(
            "edit_note",
            "Error editing your note",
            self.shared.repo.update(id, draft),
            |note: &Note| {
                (
                    Action::EditNote(note.clone()),
                    Some(format!("You have successfully edited note: {}", note.title)),
                )
            },
        )
        .await
    }

    pub async fn delete_note(&self, id: NoteId) -> Result<Note> {
        self.perform(
            "delete_note",
            "Error deleting your note",
            self.shared.repo.remove(id),
            |note: &Note| {
                (
                    Action::DeleteNote(note.clone()),
                    Some(format!("You have successfully deleted note: {}", note.title)),
                )
            },
        )
        .await
    }

    /// Delete the listed notes. Returns the ids the store actually deleted.
    pub async fn delete_multiple(&self, ids: &[NoteId]) -> Result<Vec<NoteId>> {
        self.perform(
            "delete_multiple",
            "Error deleting your notes",
            returned_ids(self.shared.repo.remove_many(ids)),
            |deleted: &Vec<NoteId>| {
                (
                    Action::DeleteMultiple(deleted.clone()),
                    Some("You have successfully deleted some notes".to_string()),
                )
            },
        )
        .await
    }

    /// Toggle the archive flag of one note.
    ///
    /// `archived` is the note's current value; the note ends up with the
    /// opposite.
    pub async fn archive_note(&self, id: NoteId, archived: bool) -> Result<Note> {
        self.perform(
            "archive_note",
            "Error archiving your note",
            self.shared.repo.set_archived(id, archived),
            |note: &Note| {
                let verb = if note.archived { "archived" } else { "unarchived" };
                (
                    Action::ArchiveNote(note.clone()),
                    Some(format!("You have successfully {}: {}", verb, note.title)),
                )
            },
        )
        .await
    }

    pub async fn archive_multiple(&self, ids: &[NoteId]) -> Result<Vec<NoteId>> {
        self.perform(
            "archive_multiple",
            "Error archiving your notes",
            returned_ids(self.shared.repo.set_archived_many(ids, true)),
            |archived: &Vec<NoteId>| {
                (
                    Action::ArchiveMultiple(archived.clone()),
                    Some("You have successfully archived some notes.".to_string()),
                )
            },
        )
        .await
    }

    pub async fn unarchive_multiple(&self, ids: &[NoteId]) -> Result<Vec<NoteId>> {
        self.perform(
            "unarchive_multiple",
            "Error unarchiving your notes",
            returned_ids(self.shared.repo.set_archived_many(ids, false)),
            |unarchived: &Vec<NoteId>| {
                (
                    Action::UnarchiveMultiple(unarchived.clone()),
                    Some("You have successfully unarchived some notes.".to_string()),
                )
            },
        )
        .await
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn dispatch(&self, action: Action) {
        debug!(
            subsystem = "session",
            component = "reducer",
            action = action.name(),
            "Dispatching action"
        );
        let mut state = self.shared.state.write().await;
        reduce(&mut state, action);
    }

    /// Run one store call under the loading/notify protocol.
    ///
    /// `confirm` maps the store's response to the action to apply and an
    /// optional success message.
    async fn perform<T, Fut, F>(
        &self,
        op: &'static str,
        failure: &'static str,
        call: Fut,
        confirm: F,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
        F: FnOnce(&T) -> (Action, Option<String>),
    {
        if self.cancel.is_cancelled() {
            debug!(
                subsystem = "session",
                component = "note_session",
                op,
                "Scope already torn down, not sending request"
            );
            return Err(Error::Cancelled(op));
        }

        self.dispatch(Action::SetLoading).await;
        let start = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled(op)),
            result = call => result,
        };

        match &outcome {
            Ok(value) => {
                let (action, message) = confirm(value);
                self.dispatch(action).await;
                if let Some(message) = message {
                    self.shared.bus.emit(Notification::success(message));
                }
                info!(
                    subsystem = "session",
                    component = "note_session",
                    op,
                    success = true,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Operation complete"
                );
            }
            Err(e) if e.is_cancelled() => {
                debug!(
                    subsystem = "session",
                    component = "note_session",
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Operation cancelled, request dropped"
                );
            }
            Err(e) => {
                warn!(
                    subsystem = "session",
                    component = "note_session",
                    op,
                    success = false,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Operation failed"
                );
                self.shared
                    .bus
                    .emit(Notification::error(format!("{}: {}", failure, e)));
            }
        }

        self.dispatch(Action::SetLoading).await;
        outcome
    }
}

/// Reduce a bulk response to the ids it contains.
async fn returned_ids<Fut>(call: Fut) -> Result<Vec<NoteId>>
where
    Fut: Future<Output = Result<Vec<Note>>>,
{
    Ok(call.await?.into_iter().map(|note| note.id).collect())
}
