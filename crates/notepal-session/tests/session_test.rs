//! End-to-end tests of the session protocol against the in-memory store.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

use notepal_core::{
    Error, Note, Notification, NotificationKind, SearchField, Selection, SortKey, Tab,
};
use notepal_session::NoteSession;
use notepal_store::mock::InMemoryNoteStore;

fn note(id: i64, title: &str, archived: bool) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: format!("{} body", title),
        created_at: Utc.with_ymd_and_hms(2024, 3, id as u32, 9, 0, 0).unwrap(),
        archived,
    }
}

async fn ready(store: InMemoryNoteStore) -> NoteSession<InMemoryNoteStore> {
    let session = NoteSession::new(store);
    assert!(session.init().await.unwrap());
    session
}

/// Drain everything published so far.
fn drain(rx: &mut Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(n) => out.push(n),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return out,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

// ── init ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_loads_once() {
    let store = InMemoryNoteStore::new().with_sample_notes(3);
    let session = NoteSession::new(store.clone());
    let mut rx = session.subscribe();

    assert!(session.init().await.unwrap());
    assert!(!session.init().await.unwrap());

    assert_eq!(store.call_count("fetch_all"), 1);
    assert_eq!(session.notes().await.len(), 3);
    assert!(!session.is_loading().await);
    assert!(drain(&mut rx).is_empty(), "successful load is silent");
}

#[tokio::test]
async fn test_init_failure_notifies_and_keeps_state() {
    let store = InMemoryNoteStore::new()
        .with_sample_notes(2)
        .failing_on("fetch_all");
    let session = NoteSession::new(store.clone());
    let mut rx = session.subscribe();

    let err = session.init().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
    assert!(session.notes().await.is_empty());
    assert!(!session.is_loading().await);

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Error);
    assert!(sent[0]
        .description
        .starts_with("There was an error loading your notes"));

    // The latch stays set; no retry.
    store.clear_failures();
    assert!(!session.init().await.unwrap());
    assert_eq!(store.call_count("fetch_all"), 1);
}

// ── single-note mutations ───────────────────────────────────────

#[tokio::test]
async fn test_add_note_appends_and_notifies() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(2)).await;
    let mut rx = session.subscribe();

    let created = session.add_note("Groceries", "milk, eggs").await.unwrap();
    assert_eq!(created.id, 3);
    assert!(!created.archived);

    let notes = session.notes().await;
    assert_eq!(notes.len(), 3);
    assert_eq!(notes.last().unwrap().title, "Groceries");

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Success);
    assert_eq!(
        sent[0].description,
        "You have successfully created a new note: Groceries"
    );
    assert!(!session.is_loading().await);
}

#[tokio::test]
async fn test_edit_note_replaces_in_place() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(3)).await;
    let mut rx = session.subscribe();

    session.edit_note(2, "Renamed", "new body").await.unwrap();

    let edited = session.note(2).await.unwrap();
    assert_eq!(edited.title, "Renamed");
    assert_eq!(edited.content, "new body");
    let ids: Vec<_> = session.notes().await.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].description, "You have successfully edited note: Renamed");
}

#[tokio::test]
async fn test_delete_note_removes_and_notifies() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(3)).await;
    let mut rx = session.subscribe();

    session.delete_note(1).await.unwrap();

    assert!(session.note(1).await.is_none());
    assert_eq!(session.notes().await.len(), 2);
    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].description, "You have successfully deleted note: Note 1");
}

#[tokio::test]
async fn test_archive_note_flips_current_value() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(2)).await;
    let mut rx = session.subscribe();

    let archived = session.archive_note(1, false).await.unwrap();
    assert!(archived.archived);
    assert!(session.note(1).await.unwrap().archived);

    let restored = session.archive_note(1, true).await.unwrap();
    assert!(!restored.archived);
    assert!(!session.note(1).await.unwrap().archived);

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].description, "You have successfully archived: Note 1");
    assert_eq!(sent[1].description, "You have successfully unarchived: Note 1");
}

#[tokio::test]
async fn test_failed_mutation_leaves_state_unchanged() {
    let store = InMemoryNoteStore::new().with_sample_notes(3);
    let session = ready(store.clone()).await;
    let before = session.snapshot().await;
    let mut rx = session.subscribe();

    store.fail_on("remove");
    store.fail_on("update");

    assert!(matches!(session.delete_note(2).await, Err(Error::Write(_))));
    assert!(matches!(
        session.edit_note(2, "x", "y").await,
        Err(Error::Write(_))
    ));

    assert_eq!(session.snapshot().await, before);
    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.kind == NotificationKind::Error));
    assert!(sent[0].description.starts_with("Error deleting your note: "));
    assert!(sent[1].description.starts_with("Error editing your note: "));
}

// ── bulk operations ─────────────────────────────────────────────

#[tokio::test]
async fn test_delete_multiple_resets_page() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(7)).await;
    session.set_current_page(2).await;
    assert_eq!(session.cur_page().await, 2);

    let deleted = session.delete_multiple(&[1, 2]).await.unwrap();

    assert_eq!(deleted, vec![1, 2]);
    assert_eq!(session.notes().await.len(), 5);
    assert_eq!(session.cur_page().await, 1);
}

#[tokio::test]
async fn test_bulk_applies_only_returned_ids() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(3)).await;
    let mut rx = session.subscribe();

    let archived = session.archive_multiple(&[2, 3, 42]).await.unwrap();
    assert_eq!(archived, vec![2, 3]);

    let flags: Vec<_> = session.notes().await.iter().map(|n| n.archived).collect();
    assert_eq!(flags, vec![false, true, true]);

    let unarchived = session.unarchive_multiple(&[3]).await.unwrap();
    assert_eq!(unarchived, vec![3]);
    assert!(!session.note(3).await.unwrap().archived);

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].description, "You have successfully archived some notes.");
    assert_eq!(sent[1].description, "You have successfully unarchived some notes.");
}

#[tokio::test]
async fn test_bulk_failure_keeps_page_and_notes() {
    let store = InMemoryNoteStore::new().with_sample_notes(7);
    let session = ready(store.clone()).await;
    session.set_current_page(2).await;
    store.fail_on("remove_many");
    let mut rx = session.subscribe();

    let err = session.delete_multiple(&[1, 2]).await.unwrap_err();
    assert!(matches!(err, Error::Write(_)));
    assert_eq!(session.notes().await.len(), 7);
    assert_eq!(session.cur_page().await, 2);

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].description.starts_with("Error deleting your notes: "));
}

#[tokio::test]
async fn test_bulk_archive_moves_selection_out_of_tab() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(4)).await;
    let view = session.current_view().await;

    let mut selection = Selection::new();
    selection.toggle_all(&view.visible_ids());
    session.archive_multiple(&selection.ids()).await.unwrap();

    let view = session.current_view().await;
    assert!(view.page_items.is_empty());
    assert_eq!(view.tab_count, 0);

    selection.retain_existing(&view.visible_ids());
    assert!(selection.is_empty());
}

// ── view controls ───────────────────────────────────────────────

#[tokio::test]
async fn test_alpha_sort_scenario() {
    let store = InMemoryNoteStore::new().with_notes(vec![note(1, "B", false), note(2, "A", true)]);
    let session = ready(store).await;
    session.set_sort(SortKey::Alpha).await;

    let view = session.current_view().await;
    assert_eq!(view.visible_ids(), vec![1]);
    assert_eq!(view.total_pages, 1);
}

#[tokio::test]
async fn test_list_controls_reset_page() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(12)).await;

    session.set_current_page(3).await;
    session.set_tab(Tab::All).await;
    assert_eq!(session.cur_page().await, 1);

    session.set_current_page(2).await;
    session.set_query("note 1").await;
    assert_eq!(session.cur_page().await, 1);
    let view = session.current_view().await;
    // "Note 1", "Note 10", "Note 11", "Note 12"
    assert_eq!(view.match_count, 4);

    session.set_search_field(SearchField::Content).await;
    let controls = session.controls().await;
    assert_eq!(controls.spec.search_field, SearchField::Content);
    assert!(controls.spec.query.is_empty());
    assert_eq!(session.current_view().await.match_count, 12);
}

#[tokio::test]
async fn test_page_zero_is_clamped_to_first() {
    let session = ready(InMemoryNoteStore::new().with_sample_notes(6)).await;
    session.set_current_page(0).await;
    assert_eq!(session.cur_page().await, 1);
    assert_eq!(session.current_view().await.page_items.len(), 5);
}

// ── detail loader ───────────────────────────────────────────────

#[tokio::test]
async fn test_load_note_does_not_touch_state() {
    let store = InMemoryNoteStore::new().with_sample_notes(2);
    let session = NoteSession::new(store.clone());
    let mut rx = session.subscribe();

    let loaded = session.load_note(2).await.unwrap();
    assert_eq!(loaded.title, "Note 2");
    assert!(session.notes().await.is_empty());
    assert!(drain(&mut rx).is_empty());

    let err = session.load_note(99).await.unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(99)));
}

// ── concurrency and cancellation ────────────────────────────────

#[tokio::test]
async fn test_concurrent_adds_are_not_collapsed() {
    let store = InMemoryNoteStore::new().with_latency_ms(5);
    let session = ready(store.clone()).await;

    let (a, b) = tokio::join!(session.add_note("Same", ""), session.add_note("Same", ""));
    assert!(a.is_ok() && b.is_ok());

    assert_eq!(store.call_count("create"), 2);
    assert_eq!(session.notes().await.len(), 2);
    assert!(!session.is_loading().await);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_in_flight_request() {
    let store = InMemoryNoteStore::new().with_latency_ms(100);
    let session = ready(store.clone()).await;
    let before = session.snapshot().await;
    let mut rx = session.subscribe();

    let worker = session.clone();
    let handle = tokio::spawn(async move { worker.add_note("Late", "").await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    session.teardown();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(Error::Cancelled("add_note"))));
    assert_eq!(session.snapshot().await, before);
    assert!(drain(&mut rx).is_empty(), "cancelled work stays silent");

    // Later calls on the torn-down session fail without a request.
    let creates = store.call_count("create");
    assert!(matches!(
        session.add_note("After", "").await,
        Err(Error::Cancelled(_))
    ));
    assert_eq!(store.call_count("create"), creates);
}

#[tokio::test(start_paused = true)]
async fn test_scoped_teardown_leaves_parent_running() {
    let store = InMemoryNoteStore::new().with_latency_ms(50);
    let session = ready(store).await;

    let view = session.scoped();
    let pending = view.clone();
    let handle = tokio::spawn(async move { pending.delete_note(1).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    view.teardown();
    assert!(matches!(handle.await.unwrap(), Err(Error::Cancelled(_))));

    assert!(!session.cancel_token().is_cancelled());
    session.add_note("Still works", "").await.unwrap();
    assert_eq!(session.notes().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_set_while_request_in_flight() {
    let store = InMemoryNoteStore::new().with_latency_ms(100);
    let session = ready(store).await;
    assert!(!session.is_loading().await);

    let worker = session.clone();
    let handle = tokio::spawn(async move { worker.add_note("Slow", "").await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(session.is_loading().await, "loading while the store call runs");

    handle.await.unwrap().unwrap();
    assert!(!session.is_loading().await);
    assert_eq!(session.notes().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_requests_toggle_loading_twice() {
    let store = InMemoryNoteStore::new().with_latency_ms(100);
    let session = ready(store).await;

    let first = session.clone();
    let second = session.clone();
    let a = tokio::spawn(async move { first.add_note("One", "").await });
    let b = tokio::spawn(async move { second.add_note("Two", "").await });

    // Each operation flips the flag, so two in flight cancel out.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!session.is_loading().await);

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert!(!session.is_loading().await);
    assert_eq!(session.notes().await.len(), 2);
}
