//! Route patterns
//!
//! Syntax:
//! - literal text matches itself; `\` escapes the next character
//! - `:name` captures one non-empty path segment
//! - `:name(regex)` captures a segment matching `regex`
//! - `(regex)` captures unnamed, keyed `"0"`, `"1"`, ... in order
//! - `*` captures the rest of the path, keyed like unnamed groups
//! - a parameter or group may be followed by `?` (optional), `+` (one or
//!   more segments) or `*` (zero or more segments)
//!
//! Matching is exact (anchored at both ends), case-insensitive and
//! tolerant of a single trailing slash, so `/signup` matches `/signup/`
//! but never `/signup/email`.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::BindingError;
use crate::Result;

/// Parameter name to captured value.
pub type Params = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct RoutePattern {
    pattern: String,
    regex: regex::Regex,
    /// Capture group `i + 1` holds `param_names[i]`
    param_names: Vec<String>,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let (regex_str, param_names) = Self::compile(pattern)?;

        let regex = regex::Regex::new(&regex_str).map_err(|e| BindingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }

    fn compile(pattern: &str) -> Result<(String, Vec<String>)> {
        let invalid = |reason: String| BindingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let body = pattern.strip_suffix('/').unwrap_or(pattern);

        let mut regex_str = String::from("(?i)^");
        let mut param_names: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut unnamed = 0usize;
        let mut chars = body.chars().peekable();

        while let Some(c) = chars.next() {
            let (name, group) = match c {
                '\\' => {
                    literal.push(chars.next().unwrap_or('\\'));
                    continue;
                }
                ':' => {
                    let name = take_name(&mut chars);
                    if name.is_empty() {
                        return Err(invalid("missing parameter name after ':'".to_string()));
                    }
                    if name.starts_with(|ch: char| ch.is_ascii_digit()) {
                        return Err(invalid(format!(
                            "parameter name {:?} starts with a digit",
                            name
                        )));
                    }
                    if param_names.contains(&name) {
                        return Err(invalid(format!("duplicate parameter {:?}", name)));
                    }

                    let group = if chars.next_if_eq(&'(').is_some() {
                        Some(take_group(&mut chars).map_err(invalid)?)
                    } else {
                        None
                    };
                    (name, group)
                }
                '(' => {
                    let group = take_group(&mut chars).map_err(invalid)?;
                    unnamed += 1;
                    ((unnamed - 1).to_string(), Some(group))
                }
                '*' => {
                    let prefix = take_prefix(&mut literal);
                    regex_str.push_str(&regex::escape(&literal));
                    literal.clear();
                    regex_str.push_str(&escape_char(prefix));
                    regex_str.push_str("(.*)");
                    param_names.push(unnamed.to_string());
                    unnamed += 1;
                    continue;
                }
                _ => {
                    literal.push(c);
                    continue;
                }
            };

            let modifier = chars.next_if(|ch| matches!(*ch, '?' | '+' | '*'));
            let prefix = take_prefix(&mut literal);
            regex_str.push_str(&regex::escape(&literal));
            literal.clear();

            let delimiter = escape_char(prefix.or(Some('/')));
            let prefix = escape_char(prefix);
            let segment = group.unwrap_or_else(|| format!("[^{}]+?", delimiter));

            let mut capture = format!("(?:{})", segment);
            if matches!(modifier, Some('+' | '*')) {
                capture = format!("{capture}(?:{prefix}{capture})*");
            }
            if matches!(modifier, Some('?' | '*')) {
                regex_str.push_str(&format!("(?:{prefix}({capture}))?"));
            } else {
                regex_str.push_str(&format!("{prefix}({capture})"));
            }
            param_names.push(name);
        }

        regex_str.push_str(&regex::escape(&literal));
        regex_str.push_str("/?$");
        Ok((regex_str, param_names))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match `path` exactly, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;

        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(next) = chars.next_if(|ch| ch.is_ascii_alphanumeric() || *ch == '_') {
        name.push(next);
    }
    name
}

/// Read a custom group body up to its closing `)`.
///
/// Nested unescaped parentheses are rejected so capture indices stay aligned
/// with parameter names.
fn take_group(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<String, String> {
    let mut group = String::new();
    loop {
        match chars.next() {
            Some(')') if group.is_empty() => return Err("empty group".to_string()),
            Some(')') => return Ok(group),
            Some('(') => return Err("nested groups are not allowed".to_string()),
            Some('\\') => {
                group.push('\\');
                match chars.next() {
                    Some(escaped) => group.push(escaped),
                    None => return Err("unclosed group".to_string()),
                }
            }
            Some(c) => group.push(c),
            None => return Err("unclosed group".to_string()),
        }
    }
}

/// Split a trailing `/` or `.` off `literal`; it becomes part of the
/// parameter so an optional parameter takes its separator with it.
fn take_prefix(literal: &mut String) -> Option<char> {
    if literal.ends_with(&['/', '.'][..]) {
        literal.pop()
    } else {
        None
    }
}

fn escape_char(c: Option<char>) -> String {
    c.map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_exact() {
        let pattern = RoutePattern::new("/signup").unwrap();
        assert!(pattern.is_match("/signup"));
        assert!(pattern.is_match("/signup/"));
        assert!(!pattern.is_match("/signup/email"));
        assert!(!pattern.is_match("/sign"));
        assert!(pattern.param_names().is_empty());
    }

    #[test]
    fn test_named_segment() {
        let pattern = RoutePattern::new("/signup/:type").unwrap();
        let params = pattern.matches("/signup/premium").unwrap();
        assert_eq!(params.get("type").map(String::as_str), Some("premium"));

        assert!(pattern.matches("/signup").is_none());
        assert!(pattern.matches("/signup/premium/extra").is_none());
    }

    #[test]
    fn test_multiple_segments() {
        let pattern = RoutePattern::new("/users/:user_id/posts/:post").unwrap();
        let params = pattern.matches("/users/42/posts/hello-world").unwrap();
        assert_eq!(params["user_id"], "42");
        assert_eq!(params["post"], "hello-world");
        assert_eq!(pattern.param_names(), ["user_id", "post"]);
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = RoutePattern::new("/Signup").unwrap();
        assert!(pattern.is_match("/signup"));
    }

    #[test]
    fn test_wildcard() {
        let pattern = RoutePattern::new("/files/*").unwrap();
        let params = pattern.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(params["0"], "a/b/c.txt");
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let pattern = RoutePattern::new("/v1.0/\\(beta\\)").unwrap();
        assert!(pattern.is_match("/v1.0/(beta)"));
        assert!(!pattern.is_match("/v1x0/(beta)"));
        assert!(pattern.param_names().is_empty());
    }

    #[test]
    fn test_optional_segment() {
        let pattern = RoutePattern::new("/signup/:type?").unwrap();

        let params = pattern.matches("/signup").unwrap();
        assert!(params.get("type").is_none());
        assert!(pattern.is_match("/signup/"));

        let params = pattern.matches("/signup/email").unwrap();
        assert_eq!(params["type"], "email");

        assert!(!pattern.is_match("/signup/email/extra"));
        assert!(!pattern.is_match("/signupemail"));
    }

    #[test]
    fn test_custom_group() {
        let pattern = RoutePattern::new("/user/:id(\\d+)").unwrap();
        assert_eq!(pattern.matches("/user/42").unwrap()["id"], "42");
        assert!(!pattern.is_match("/user/abc"));

        let pattern = RoutePattern::new("/release/(beta|rc)/:n").unwrap();
        let params = pattern.matches("/release/rc/2").unwrap();
        assert_eq!(params["0"], "rc");
        assert_eq!(params["n"], "2");
        assert_eq!(pattern.param_names(), ["0", "n"]);
        assert!(!pattern.is_match("/release/alpha/2"));
    }

    #[test]
    fn test_repeated_segments() {
        let one_or_more = RoutePattern::new("/docs/:path+").unwrap();
        assert_eq!(one_or_more.matches("/docs/a/b/c").unwrap()["path"], "a/b/c");
        assert!(!one_or_more.is_match("/docs"));

        let zero_or_more = RoutePattern::new("/docs/:path*").unwrap();
        assert!(zero_or_more.is_match("/docs"));
        assert_eq!(zero_or_more.matches("/docs/a/b").unwrap()["path"], "a/b");
    }

    #[test]
    fn test_dot_prefix() {
        let pattern = RoutePattern::new("/files/:name.:ext?").unwrap();
        let params = pattern.matches("/files/report.pdf").unwrap();
        assert_eq!(params["name"], "report");
        assert_eq!(params["ext"], "pdf");
        assert!(pattern.matches("/files/report").unwrap().get("ext").is_none());
    }

    #[test]
    fn test_root() {
        let pattern = RoutePattern::new("/").unwrap();
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/a"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            RoutePattern::new("/a/:"),
            Err(BindingError::InvalidPattern { .. })
        ));
        assert!(RoutePattern::new("/a/:1st").is_err());
        assert!(RoutePattern::new("/:id/:id").is_err());
        assert!(RoutePattern::new("/a/(b").is_err());
        assert!(RoutePattern::new("/a/()").is_err());
        assert!(RoutePattern::new("/a/((b))").is_err());
        assert!(RoutePattern::new("/a/:id([)").is_err());
    }
}
