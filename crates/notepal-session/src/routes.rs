//! Navigation targets of the note views.

use std::fmt;
use std::str::FromStr;

use notepal_core::{Error, NoteId};

/// Screen a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Paginated note list (`/` and `/notes`).
    Notes,
    /// Empty create form.
    NewNote,
    /// Edit form prefilled from the local copy of a note.
    EditNote(NoteId),
    /// Detail view that loads the note from the store.
    NoteDetail(NoteId),
}

impl Route {
    /// Note the route points at, if any.
    pub fn note_id(&self) -> Option<NoteId> {
        match self {
            Route::EditNote(id) | Route::NoteDetail(id) => Some(*id),
            Route::Notes | Route::NewNote => None,
        }
    }
}

fn parse_id(path: &str, raw: &str) -> Result<NoteId, Error> {
    // Older links carry the router placeholder colon, e.g. "/note/:12".
    let raw = raw.strip_prefix(':').unwrap_or(raw);
    raw.parse::<NoteId>()
        .map_err(|_| Error::InvalidInput(format!("Invalid note id in path: {}", path)))
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let segments: Vec<&str> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["notes"] => Ok(Route::Notes),
            ["new"] => Ok(Route::NewNote),
            ["edit", id] => Ok(Route::EditNote(parse_id(path, id)?)),
            ["note", id] => Ok(Route::NoteDetail(parse_id(path, id)?)),
            _ => Err(Error::InvalidInput(format!("Unknown route: {}", path))),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Notes => write!(f, "/notes"),
            Route::NewNote => write!(f, "/new"),
            Route::EditNote(id) => write!(f, "/edit/{}", id),
            Route::NoteDetail(id) => write!(f, "/note/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_routes() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Notes);
        assert_eq!("/notes".parse::<Route>().unwrap(), Route::Notes);
        assert_eq!("/notes/".parse::<Route>().unwrap(), Route::Notes);
        assert_eq!("/new".parse::<Route>().unwrap(), Route::NewNote);
    }

    #[test]
    fn test_parse_note_routes() {
        assert_eq!("/edit/4".parse::<Route>().unwrap(), Route::EditNote(4));
        assert_eq!("/note/12".parse::<Route>().unwrap(), Route::NoteDetail(12));
    }

    #[test]
    fn test_parse_legacy_colon_form() {
        assert_eq!("/note/:12".parse::<Route>().unwrap(), Route::NoteDetail(12));
        assert_eq!("/edit/:3".parse::<Route>().unwrap(), Route::EditNote(3));
    }

    #[test]
    fn test_parse_rejects_unknown_and_bad_ids() {
        assert!(matches!("/settings".parse::<Route>(), Err(Error::InvalidInput(_))));
        assert!(matches!("/note/abc".parse::<Route>(), Err(Error::InvalidInput(_))));
        assert!(matches!("/edit".parse::<Route>(), Err(Error::InvalidInput(_))));
        assert!(matches!("/note/1/extra".parse::<Route>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_display_parses_back() {
        for route in [
            Route::Notes,
            Route::NewNote,
            Route::EditNote(7),
            Route::NoteDetail(8),
        ] {
            assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        }
    }

    #[test]
    fn test_note_id() {
        assert_eq!(Route::EditNote(2).note_id(), Some(2));
        assert_eq!(Route::NoteDetail(5).note_id(), Some(5));
        assert_eq!(Route::Notes.note_id(), None);
    }
}
