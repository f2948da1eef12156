//! # notepal-store
//!
//! Remote note store access for NotePal.
//!
//! The store is a hosted PostgREST endpoint exposing a `notes` table.
//! [`RestNoteStore`] implements [`notepal_core::NoteRepository`] on top of
//! it; with the `mock` feature, [`mock::InMemoryNoteStore`] provides an
//! in-process stand-in for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use notepal_core::{NoteDraft, NoteRepository};
//! use notepal_store::{RestNoteStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StoreConfig {
//!         base_url: "https://project.supabase.co/rest/v1".to_string(),
//!         api_key: Some("anon-key".to_string()),
//!         ..Default::default()
//!     };
//!     let store = RestNoteStore::new(config).unwrap();
//!
//!     let note = store.create(NoteDraft::new("Groceries", "milk")).await.unwrap();
//!     let all = store.fetch_all().await.unwrap();
//!     assert!(all.iter().any(|n| n.id == note.id));
//! }
//! ```

pub mod config;
#[cfg(feature = "mock")]
pub mod mock;
pub mod rest;

pub use config::{ConfigError, ConfigResult, StoreConfig};
pub use rest::{to_notepal_error, Access, RestNoteStore, StoreErrorCode};
