//! Derived view pipeline for the note list.
//!
//! Given the session's notes, the active tab, and the list controls,
//! [`compute_view`] produces the page of notes to render. The pipeline is
//! pure and keeps no state between calls; stages always run in the same
//! order: tab filter, sort, search, paginate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::PAGE_SIZE;
use crate::error::Error;
use crate::models::{Note, NoteId};

/// Fixed views over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Active,
    All,
    Archived,
}

impl Tab {
    pub fn matches(self, note: &Note) -> bool {
        match self {
            Tab::Active => !note.archived,
            Tab::Archived => note.archived,
            Tab::All => true,
        }
    }

    /// List heading, e.g. "Active notes".
    pub fn heading(self) -> String {
        format!("{} notes", crate::format::capitalise(&self.to_string()))
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "all" => Ok(Self::All),
            "archived" | "archive" => Ok(Self::Archived),
            _ => Err(Error::InvalidInput(format!("unknown tab: {}", s))),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::All => write!(f, "all"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Sort order of the list. Both orders are ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// By title, comparing strings ordinally.
    Alpha,
    /// By creation time.
    #[default]
    Created,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(Self::Alpha),
            "created" => Ok(Self::Created),
            _ => Err(Error::InvalidInput(format!("unknown sort: {}", s))),
        }
    }
}

/// Which field the search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Title,
    Content,
}

impl FromStr for SearchField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            _ => Err(Error::InvalidInput(format!("unknown search field: {}", s))),
        }
    }
}

/// Search and sort controls of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub sort: SortKey,
    pub search_field: SearchField,
    /// Case-insensitive substring; empty matches everything.
    pub query: String,
}

impl ViewSpec {
    fn matches(&self, note: &Note, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystack = match self.search_field {
            SearchField::Title => &note.title,
            SearchField::Content => &note.content,
        };
        haystack.to_lowercase().contains(needle)
    }
}

/// Output of the pipeline for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteView {
    pub page_items: Vec<Note>,
    pub total_pages: usize,
    /// Notes in the tab before searching.
    pub tab_count: usize,
    /// Notes left after searching, across all pages.
    pub match_count: usize,
}

impl NoteView {
    pub fn visible_ids(&self) -> Vec<NoteId> {
        self.page_items.iter().map(|n| n.id).collect()
    }
}

/// Number of pages needed for `count` items.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Run the full pipeline for one page (1-indexed).
///
/// A page beyond the last one, or page 0, yields no items. Clamping the
/// page is the caller's job.
pub fn compute_view(notes: &[Note], tab: Tab, spec: &ViewSpec, cur_page: usize) -> NoteView {
    let mut filtered: Vec<&Note> = notes.iter().filter(|n| tab.matches(n)).collect();
    let tab_count = filtered.len();

    // sort_by is stable; equal keys keep collection order
    match spec.sort {
        SortKey::Alpha => filtered.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::Created => filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }

    let needle = spec.query.to_lowercase();
    let matched: Vec<&Note> = filtered
        .into_iter()
        .filter(|n| spec.matches(n, &needle))
        .collect();
    let match_count = matched.len();

    let page_items = match cur_page.checked_sub(1) {
        Some(index) => matched
            .into_iter()
            .skip(index.saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    tracing::trace!(
        tab = %tab,
        tab_count,
        match_count,
        cur_page,
        page_len = page_items.len(),
        "Computed note view"
    );

    NoteView {
        page_items,
        total_pages: total_pages(match_count),
        tab_count,
        match_count,
    }
}
