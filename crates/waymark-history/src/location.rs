//! Address-bar location and navigation events
//!
//! A location is the triple shown in the address bar after the origin:
//! ```text
//! /signup/email?ref=home#top
//! └─pathname──┘└search─┘└hash┘
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    pub search: String,
    /// Fragment including the leading `#`, or empty
    pub hash: String,
}

impl Location {
    pub fn new(
        pathname: impl Into<String>,
        search: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
            hash: hash.into(),
        }
    }

    /// Pathname plus query string, the part compared when deciding whether
    /// a navigation would change anything.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }

    /// Pathname, query string and fragment joined back together.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        parse_path(path)
    }
}

/// Split a path into pathname, query string and fragment.
///
/// The fragment is cut first, then the query string is searched for in what
/// remains. Bare `?` and `#` markers normalize to empty strings. An empty
/// input yields the root pathname.
pub fn parse_path(path: &str) -> Location {
    let mut pathname = if path.is_empty() { "/" } else { path };
    let mut search = "";
    let mut hash = "";

    if let Some(idx) = pathname.find('#') {
        hash = &pathname[idx..];
        pathname = &pathname[..idx];
    }

    if let Some(idx) = pathname.find('?') {
        search = &pathname[idx..];
        pathname = &pathname[..idx];
    }

    Location {
        pathname: pathname.to_string(),
        search: if search == "?" { "" } else { search }.to_string(),
        hash: if hash == "#" { "" } else { hash }.to_string(),
    }
}

/// How the address bar got to its current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NavigationMethod {
    /// A new history entry was added
    Push,
    /// The current history entry was overwritten
    Replace,
    /// The browser moved back or forward through existing entries
    Pop,
}

impl NavigationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMethod::Push => "PUSH",
            NavigationMethod::Replace => "REPLACE",
            NavigationMethod::Pop => "POP",
        }
    }
}

impl std::fmt::Display for NavigationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NavigationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PUSH" => Ok(NavigationMethod::Push),
            "REPLACE" => Ok(NavigationMethod::Replace),
            "POP" => Ok(NavigationMethod::Pop),
            _ => Err(format!("Unknown navigation method: {}", s)),
        }
    }
}

/// Emitted every time the location changes.
///
/// `method` and `initial` describe the transition only; the stored location
/// keeps just the pathname, search and hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub method: NavigationMethod,
    pub pathname: String,
    pub search: String,
    pub hash: String,
    /// Set only for the replay a module receives when it is first bound
    #[serde(default)]
    pub initial: bool,
}

impl NavigationEvent {
    pub fn new(method: NavigationMethod, location: Location) -> Self {
        Self {
            method,
            pathname: location.pathname,
            search: location.search,
            hash: location.hash,
            initial: false,
        }
    }

    /// Event for a back/forward traversal to `location`.
    pub fn pop(location: Location) -> Self {
        Self::new(NavigationMethod::Pop, location)
    }

    /// Synthetic POP replayed when a module binds under `location`.
    pub fn initial(location: Location) -> Self {
        Self {
            initial: true,
            ..Self::pop(location)
        }
    }

    pub fn location(&self) -> Location {
        Location {
            pathname: self.pathname.clone(),
            search: self.search.clone(),
            hash: self.hash.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let loc = parse_path("/a/b");
        assert_eq!(loc.pathname, "/a/b");
        assert_eq!(loc.search, "");
        assert_eq!(loc.hash, "");
    }

    #[test]
    fn test_parse_full_path() {
        let loc = parse_path("/a/b?x=1#frag");
        assert_eq!(loc.pathname, "/a/b");
        assert_eq!(loc.search, "?x=1");
        assert_eq!(loc.hash, "#frag");
        assert_eq!(loc.href(), "/a/b?x=1#frag");
        assert_eq!(loc.full_path(), "/a/b?x=1");
    }

    #[test]
    fn test_empty_markers_normalized() {
        let loc = parse_path("/a?#");
        assert_eq!(loc, Location::new("/a", "", ""));

        let loc = parse_path("/a?");
        assert_eq!(loc, Location::new("/a", "", ""));

        let loc = parse_path("/a#");
        assert_eq!(loc, Location::new("/a", "", ""));
    }

    #[test]
    fn test_question_mark_inside_fragment() {
        // The fragment is cut before the query string is looked for
        let loc = parse_path("/a#section?x=1");
        assert_eq!(loc.pathname, "/a");
        assert_eq!(loc.search, "");
        assert_eq!(loc.hash, "#section?x=1");
    }

    #[test]
    fn test_empty_input_is_root() {
        assert_eq!(parse_path("").pathname, "/");
    }

    #[test]
    fn test_method_serializes_upper_case() {
        let json = serde_json::to_string(&NavigationMethod::Replace).unwrap();
        assert_eq!(json, "\"REPLACE\"");
        assert_eq!("pop".parse::<NavigationMethod>(), Ok(NavigationMethod::Pop));
        assert!("jump".parse::<NavigationMethod>().is_err());
    }

    #[test]
    fn test_initial_event_is_pop() {
        let event = NavigationEvent::initial(parse_path("/signup/premium"));
        assert_eq!(event.method, NavigationMethod::Pop);
        assert!(event.initial);
        assert_eq!(event.location().pathname, "/signup/premium");
    }
}
