//! Structured logging field name constants for NotePal.
//!
//! All crates use these constants for structured `tracing` fields so that
//! log output can be queried by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unexpected internal failure |
//! | WARN  | Operation failed and was surfaced as an error notification |
//! | INFO  | Lifecycle events (init, teardown), operation completions |
//! | DEBUG | Decision points, request construction, reducer actions |
//! | TRACE | Per-item iteration (view stages, row decoding) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "store", "session", "view"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "rest_client", "mock_store", "reducer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "fetch_all", "add_note", "archive_multiple"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// Remote table affected.
pub const DB_TABLE: &str = "db_table";

/// Search query text, logged when the list query changes.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a store call.
pub const RESULT_COUNT: &str = "result_count";

/// Number of ids sent in a bulk store call.
pub const INPUT_COUNT: &str = "input_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// HTTP status code returned by the store.
pub const STATUS: &str = "status";
