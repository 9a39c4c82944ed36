//! Path transforms between the address bar and the route tables
//!
//! Route tables are written against application paths. When the app is
//! served somewhere other than the origin root, the two transforms convert
//! between what the window shows and what the routes expect.

use std::sync::Arc;

pub type PathTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct PathTransforms {
    routes_to_window: PathTransform,
    window_to_routes: PathTransform,
}

impl PathTransforms {
    pub fn new(routes_to_window: PathTransform, window_to_routes: PathTransform) -> Self {
        Self {
            routes_to_window,
            window_to_routes,
        }
    }

    pub fn identity() -> Self {
        Self::new(
            Arc::new(|path: &str| path.to_string()),
            Arc::new(|path: &str| path.to_string()),
        )
    }

    /// Serve the routes under `base` (e.g. `/app`).
    ///
    /// Window paths outside `base` pass through unchanged.
    pub fn with_base_path(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        if base.is_empty() {
            return Self::identity();
        }

        let to_window_base = base.clone();
        let routes_to_window: PathTransform = Arc::new(move |path: &str| {
            if path.starts_with('/') {
                format!("{}{}", to_window_base, path)
            } else {
                format!("{}/{}", to_window_base, path)
            }
        });

        let window_to_routes: PathTransform = Arc::new(move |path: &str| {
            match path.strip_prefix(base.as_str()) {
                Some("") => "/".to_string(),
                Some(rest) if rest.starts_with('/') => rest.to_string(),
                _ => path.to_string(),
            }
        });

        Self::new(routes_to_window, window_to_routes)
    }

    pub fn with_routes_to_window(mut self, transform: PathTransform) -> Self {
        self.routes_to_window = transform;
        self
    }

    pub fn with_window_to_routes(mut self, transform: PathTransform) -> Self {
        self.window_to_routes = transform;
        self
    }

    pub fn to_window(&self, path_in_routes: &str) -> String {
        (self.routes_to_window)(path_in_routes)
    }

    pub fn to_routes(&self, path_in_window: &str) -> String {
        (self.window_to_routes)(path_in_window)
    }
}

impl Default for PathTransforms {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for PathTransforms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathTransforms").finish_non_exhaustive()
    }
}
