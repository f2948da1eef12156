//! # notepal-core
//!
//! Core types, traits, and pure state logic for NotePal.
//!
//! This crate holds everything the session layer builds on: the note model,
//! the repository trait implemented by remote stores, the session reducer,
//! the derived view pipeline, selection tracking, notifications, and
//! cancellation tokens.

pub mod cancel;
pub mod defaults;
pub mod error;
pub mod events;
pub mod format;
pub mod logging;
pub mod models;
pub mod selection;
pub mod state;
pub mod traits;
pub mod view;

// Re-export commonly used types at crate root
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use events::{Notification, NotificationBus, NotificationKind};
pub use models::*;
pub use selection::{CheckState, Selection};
pub use state::{reduce, Action, SessionState};
pub use traits::*;
pub use view::{compute_view, NoteView, SearchField, SortKey, Tab, ViewSpec};
