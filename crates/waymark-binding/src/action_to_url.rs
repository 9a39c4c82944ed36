//! Action → URL binding

use std::collections::HashMap;
use std::sync::Arc;

use waymark_store::{Action, LocationStore};

use crate::transform::PathTransforms;

pub type UrlMapper<A> = Arc<dyn Fn(&A) -> String + Send + Sync>;

/// Target paths for a module's actions, keyed by action kind.
pub struct ActionToUrlBinding<A: Action> {
    mappings: HashMap<A::Kind, UrlMapper<A>>,
}

impl<A: Action> ActionToUrlBinding<A> {
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Map every action of `kind` to the path returned by `mapper`.
    ///
    /// Mapping the same kind twice keeps the last mapper.
    pub fn map<F>(mut self, kind: A::Kind, mapper: F) -> Self
    where
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        if self.mappings.insert(kind, Arc::new(mapper)).is_some() {
            tracing::warn!(kind = ?kind, "Action kind mapped twice");
        }
        self
    }

    /// Application path `action` maps to, if its kind is mapped.
    pub fn url_for(&self, action: &A) -> Option<String> {
        self.mappings.get(&action.kind()).map(|mapper| mapper(action))
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Build the action listener that pushes through `store`.
    pub(crate) fn into_listener(
        self,
        store: LocationStore,
        transforms: PathTransforms,
    ) -> impl Fn(&A) + Send + Sync + 'static {
        move |action: &A| {
            let Some(path_in_routes) = self.url_for(action) else {
                return;
            };
            let path_in_window = transforms.to_window(&path_in_routes);

            let current = store.location().full_path();
            if current == path_in_window {
                tracing::trace!(url = %path_in_window, "Already at target path");
                return;
            }

            if let Err(e) = store.navigate_push(path_in_window) {
                tracing::warn!(kind = ?action.kind(), error = %e, "Action navigation failed");
            }
        }
    }
}

impl<A: Action> Default for ActionToUrlBinding<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> std::fmt::Debug for ActionToUrlBinding<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.mappings.keys()).finish()
    }
}
