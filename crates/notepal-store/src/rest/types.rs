//! PostgREST wire types and filter helpers.

use serde::{Deserialize, Serialize};

use notepal_core::NoteId;

/// Error body returned by PostgREST on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    /// Message plus details, when present.
    pub fn describe(&self) -> String {
        match (&self.code, &self.details) {
            (Some(code), Some(details)) => format!("{} ({}): {}", self.message, code, details),
            (Some(code), None) => format!("{} ({})", self.message, code),
            (None, Some(details)) => format!("{}: {}", self.message, details),
            (None, None) => self.message.clone(),
        }
    }
}

/// Body of an archive-flag update.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ArchivePatch {
    pub archived: bool,
}

/// `id=eq.<id>` filter value.
pub fn eq_filter(id: NoteId) -> String {
    format!("eq.{}", id)
}

/// `id=in.(<a>,<b>,...)` filter value.
pub fn in_filter(ids: &[NoteId]) -> String {
    let list: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("in.({})", list.join(","))
}
