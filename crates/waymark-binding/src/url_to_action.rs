//! URL → action binding

use std::sync::Arc;

use waymark_history::NavigationEvent;
use waymark_store::{Action, Actions};

use crate::route::{RouteMatch, RouteTable};
use crate::transform::PathTransforms;
use crate::Result;

/// Characters whose escapes stay encoded, so `%2F` inside a segment is
/// never mistaken for a separator.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode `path` except for escapes of reserved characters.
///
/// Returns `None` when the escapes do not form valid UTF-8.
fn decode_uri(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut decoded = String::with_capacity(path.len());
    let mut start = 0;
    let mut i = 0;

    while i + 2 < bytes.len() {
        let escaped = match (bytes[i], hex(bytes[i + 1]), hex(bytes[i + 2])) {
            (b'%', Some(hi), Some(lo)) => Some(hi << 4 | lo),
            _ => None,
        };

        match escaped {
            Some(byte) if RESERVED.contains(&byte) => {
                decoded.push_str(&urlencoding::decode(&path[start..i]).ok()?);
                decoded.push_str(&path[i..i + 3]);
                i += 3;
                start = i;
            }
            _ => i += 1,
        }
    }

    decoded.push_str(&urlencoding::decode(&path[start..]).ok()?);
    Some(decoded)
}

fn hex(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

pub type RouteHandler<A> = Arc<dyn Fn(&RouteMatch, &Actions<A>) + Send + Sync>;

/// Routes a module reacts to, in declaration order.
///
/// ```ignore
/// let binding = UrlToActionBinding::new()
///     .route("/signup/:type", |m, actions| {
///         actions.dispatch(Signup::Select(m.param("type").unwrap_or_default().into()))
///     })?
///     .route("/signup", |_, actions| actions.dispatch(Signup::Clear))?;
/// ```
pub struct UrlToActionBinding<A: Action> {
    routes: RouteTable<RouteHandler<A>>,
}

impl<A: Action> UrlToActionBinding<A> {
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
        }
    }

    pub fn route<F>(mut self, pattern: &str, handler: F) -> Result<Self>
    where
        F: Fn(&RouteMatch, &Actions<A>) + Send + Sync + 'static,
    {
        self.routes.add(pattern, Arc::new(handler))?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build the location-changed listener for `actions`.
    pub(crate) fn into_listener(
        self,
        actions: Actions<A>,
        transforms: PathTransforms,
    ) -> impl Fn(&NavigationEvent) + Send + Sync + 'static {
        let routes = self.routes;
        move |event: &NavigationEvent| {
            let path_in_window =
                decode_uri(&event.pathname).unwrap_or_else(|| event.pathname.clone());
            let path_in_routes = transforms.to_routes(&path_in_window);

            match routes.first_match(&path_in_routes) {
                Some((pattern, handler, params)) => {
                    tracing::debug!(
                        pattern = %pattern,
                        path = %path_in_routes,
                        method = %event.method,
                        initial = event.initial,
                        "Route matched"
                    );
                    let route_match = RouteMatch {
                        pattern: pattern.pattern().to_string(),
                        path: path_in_routes,
                        params,
                        event: event.clone(),
                    };
                    handler(&route_match, &actions);
                }
                None => {
                    tracing::trace!(path = %path_in_routes, "No route matched");
                }
            }
        }
    }
}

impl<A: Action> Default for UrlToActionBinding<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> std::fmt::Debug for UrlToActionBinding<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.routes.patterns().map(|p| p.pattern()))
            .finish()
    }
}
