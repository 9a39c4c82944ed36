//! Ordered route tables

use waymark_history::{NavigationEvent, NavigationMethod};

use crate::pattern::{Params, RoutePattern};
use crate::Result;

/// A successful match, handed to URL → action handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Pattern as declared
    pub pattern: String,
    /// Application path that matched (decoded, transformed)
    pub path: String,
    pub params: Params,
    /// The location change that triggered the match
    pub event: NavigationEvent,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn method(&self) -> NavigationMethod {
        self.event.method
    }

    /// True for the replay a module receives when it is first bound.
    pub fn is_initial(&self) -> bool {
        self.event.initial
    }
}

/// Patterns in declaration order; the first match wins.
pub struct RouteTable<H> {
    routes: Vec<(RoutePattern, H)>,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn add(&mut self, pattern: &str, handler: H) -> Result<()> {
        let pattern = RoutePattern::new(pattern)?;
        if self.routes.iter().any(|(p, _)| p == &pattern) {
            tracing::warn!(pattern = %pattern, "Route declared twice, later handler is unreachable");
        }
        self.routes.push((pattern, handler));
        Ok(())
    }

    pub fn first_match(&self, path: &str) -> Option<(&RoutePattern, &H, Params)> {
        self.routes
            .iter()
            .find_map(|(pattern, handler)| pattern.matches(path).map(|p| (pattern, handler, p)))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &RoutePattern> {
        self.routes.iter().map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
