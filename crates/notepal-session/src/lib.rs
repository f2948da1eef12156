//! # notepal-session
//!
//! The session context that views share: one [`NoteSession`] owns the local
//! mirror of the remote notes, runs every mutation through the reducer once
//! the store has confirmed it, and publishes one notification per completed
//! operation.
//!
//! # Example
//!
//! ```rust,no_run
//! use notepal_session::NoteSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     notepal_session::telemetry::init_tracing()?;
//!
//!     let session = NoteSession::from_env()?;
//!     session.init().await?;
//!
//!     let list = session.scoped();
//!     list.add_note("Groceries", "milk, eggs").await?;
//!     let view = list.current_view().await;
//!     println!("{} of {} pages", view.page_items.len(), view.total_pages);
//!
//!     session.teardown();
//!     Ok(())
//! }
//! ```

pub mod routes;
pub mod session;
pub mod telemetry;

pub use routes::Route;
pub use session::{ListControls, NoteSession};
