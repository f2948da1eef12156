//! PostgREST-backed note repository.
//!
//! Works with any PostgREST endpoint, including:
//!
//! - Supabase hosted projects (`https://<project>.supabase.co/rest/v1`)
//! - a local Supabase stack
//! - a plain PostgREST server in front of Postgres
//!
//! The remote table needs the columns `id`, `title`, `content`,
//! `created_at` and `archived`; `id` and `created_at` are generated.

mod client;
mod error;
mod types;

pub use client::RestNoteStore;
pub use error::{to_notepal_error, Access, StoreErrorCode};
pub use types::{eq_filter, in_filter, PostgrestError};
