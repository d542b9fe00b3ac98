//! Routes and client-side navigation.

use std::fmt;

use regex::Regex;

use crate::note::Nid;

/// A navigable location in the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No note open.
    Home,
    /// Detail page of one note.
    Note { nid: Nid },
}

impl Route {
    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Note { nid } => format!("/notes/{nid}"),
        }
    }

    /// Parse a path into a route. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        if path.trim_end_matches('/').is_empty() {
            return Some(Route::Home);
        }
        let nid = note_param(path)?.parse().ok()?;
        Some(Route::Note { nid })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Raw note identifier segment of a `/notes/{id}` path.
///
/// The segment is returned as-is; it is not guaranteed to be numeric.
pub fn note_param(path: &str) -> Option<&str> {
    let re = Regex::new(r"^/notes/([^/?#]+)/?(?:[?#].*)?$").ok()?;
    let caps = re.captures(path)?;
    caps.get(1).map(|m| m.as_str())
}

/// Client-side navigation history.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: String,
    history: Vec<String>,
}

impl Navigator {
    /// Start at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: path.into(),
            history: Vec::new(),
        }
    }

    /// Current path.
    pub fn path(&self) -> &str {
        &self.current
    }

    /// Route for the current path, if recognized.
    pub fn route(&self) -> Option<Route> {
        Route::parse(&self.current)
    }

    /// The note identifier of the current location, unparsed.
    pub fn note_param(&self) -> Option<&str> {
        note_param(&self.current)
    }

    /// Navigate to `route`. Returns false if already there.
    pub fn push(&mut self, route: Route) -> bool {
        let path = route.path();
        if path == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, path);
        self.history.push(previous);
        true
    }

    /// Go back one entry. Returns false when there is no history.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path() {
        assert_eq!(Route::Note { nid: 42 }.path(), "/notes/42");
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Note { nid: 7 }.to_string(), "/notes/7");
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/notes/42"), Some(Route::Note { nid: 42 }));
        assert_eq!(Route::parse("/notes/42/"), Some(Route::Note { nid: 42 }));
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/notes/abc"), None);
        assert_eq!(Route::parse("/posts/42"), None);
    }

    #[test]
    fn test_note_param() {
        assert_eq!(note_param("/notes/42"), Some("42"));
        assert_eq!(note_param("/notes/42?from=timeline"), Some("42"));
        assert_eq!(note_param("/notes/draft"), Some("draft"));
        assert_eq!(note_param("/notes/"), None);
        assert_eq!(note_param("/"), None);
    }

    #[test]
    fn test_navigator_push_and_back() {
        let mut nav = Navigator::new("/notes/42");
        assert_eq!(nav.note_param(), Some("42"));
        assert!(!nav.can_go_back());

        assert!(nav.push(Route::Note { nid: 43 }));
        assert_eq!(nav.path(), "/notes/43");
        assert_eq!(nav.route(), Some(Route::Note { nid: 43 }));

        assert!(!nav.push(Route::Note { nid: 43 }));

        assert!(nav.back());
        assert_eq!(nav.path(), "/notes/42");
        assert!(!nav.back());
    }
}
