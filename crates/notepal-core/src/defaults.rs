//! Centralized default constants for NotePal.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// VIEW
// =============================================================================

/// Number of notes rendered per list page.
pub const PAGE_SIZE: usize = 5;

/// First page of every list (pages are 1-indexed).
pub const FIRST_PAGE: usize = 1;

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Name of the remote table holding note records.
pub const NOTES_TABLE: &str = "notes";

/// Default REST endpoint for a locally running store.
pub const STORE_URL: &str = "http://localhost:54321/rest/v1";

/// Request timeout for remote store calls, in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Buffered notifications per subscriber before it starts lagging.
pub const NOTIFICATION_CAPACITY: usize = 64;
