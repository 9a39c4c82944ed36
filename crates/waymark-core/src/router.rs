//! Router context
//!
//! Owns the location store and the binding installer. Everything a module
//! needs to take part in routing goes through here, instead of through
//! process-wide state.

use std::sync::Arc;

use waymark_binding::{
    ActionToUrlBinding, BindingInstaller, Installation, PathTransform, PathTransforms,
    UrlToActionBinding,
};
use waymark_history::{Environment, History, Location, LocationSource, MemoryHistory, Subscription};
use waymark_store::{Action, LocationStore, Logic, StoreOptions, DEFAULT_MAX_REDIRECT_DEPTH};

use crate::config::Config;
use crate::Result;

/// Overrides for the router; everything left unset uses the platform
/// default (the browser when there is one) and identity path transforms.
#[derive(Default, Clone)]
pub struct RouterOptions {
    pub history: Option<Arc<dyn History>>,
    pub location: Option<Arc<dyn LocationSource>>,
    pub path_from_routes_to_window: Option<PathTransform>,
    pub path_from_window_to_routes: Option<PathTransform>,
    pub max_redirect_depth: Option<usize>,
}

impl RouterOptions {
    pub fn with_history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_location(mut self, location: Arc<dyn LocationSource>) -> Self {
        self.location = Some(location);
        self
    }

    /// Use `history` both to navigate and to read the current location.
    pub fn with_memory_history(self, history: MemoryHistory) -> Self {
        let env = Environment::memory(history);
        self.with_history(env.history).with_location(env.location)
    }

    pub fn with_transforms(mut self, transforms: PathTransforms) -> Self {
        let to_window = transforms.clone();
        let to_routes = transforms;
        self.path_from_routes_to_window = Some(Arc::new(move |p: &str| to_window.to_window(p)));
        self.path_from_window_to_routes = Some(Arc::new(move |p: &str| to_routes.to_routes(p)));
        self
    }

    pub fn with_path_from_routes_to_window(mut self, transform: PathTransform) -> Self {
        self.path_from_routes_to_window = Some(transform);
        self
    }

    pub fn with_path_from_window_to_routes(mut self, transform: PathTransform) -> Self {
        self.path_from_window_to_routes = Some(transform);
        self
    }

    pub fn with_max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = Some(depth);
        self
    }

    fn environment(&self) -> Environment {
        let platform = Environment::platform();
        Environment::new(
            self.history.clone().unwrap_or(platform.history),
            self.location.clone().unwrap_or(platform.location),
        )
    }

    fn transforms(&self) -> PathTransforms {
        let mut transforms = PathTransforms::identity();
        if let Some(t) = &self.path_from_routes_to_window {
            transforms = transforms.with_routes_to_window(Arc::clone(t));
        }
        if let Some(t) = &self.path_from_window_to_routes {
            transforms = transforms.with_window_to_routes(Arc::clone(t));
        }
        transforms
    }
}

impl std::fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterOptions")
            .field("history", &self.history.is_some())
            .field("location", &self.location.as_ref().map(|l| l.current()))
            .field("max_redirect_depth", &self.max_redirect_depth)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Router {
    store: LocationStore,
    installer: BindingInstaller,
}

impl Router {
    /// Create the location store and start listening for native navigation.
    pub fn new(options: RouterOptions) -> Self {
        let store = LocationStore::new(
            options.environment(),
            StoreOptions {
                max_redirect_depth: options
                    .max_redirect_depth
                    .unwrap_or(DEFAULT_MAX_REDIRECT_DEPTH),
            },
        );
        store.mount();

        tracing::info!(location = %store.location(), "Router initialized");

        let installer = BindingInstaller::new(store.clone(), options.transforms());
        Self { store, installer }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.into_options()?))
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn installer(&self) -> &BindingInstaller {
        &self.installer
    }

    pub fn location(&self) -> Location {
        self.store.location()
    }

    pub fn push(&self, url: &str) -> Result<()> {
        Ok(self.store.navigate_push(url)?)
    }

    pub fn replace(&self, url: &str) -> Result<()> {
        Ok(self.store.navigate_replace(url)?)
    }

    /// Bind a module's routes. `None` when it declares neither half.
    pub fn register<A: Action>(
        &self,
        logic: &Logic<A>,
        url_to_action: Option<UrlToActionBinding<A>>,
        action_to_url: Option<ActionToUrlBinding<A>>,
    ) -> Option<Installation> {
        self.installer.install(logic, url_to_action, action_to_url)
    }

    pub fn bind_urls<A: Action>(
        &self,
        logic: &Logic<A>,
        binding: UrlToActionBinding<A>,
    ) -> Subscription {
        self.installer.attach_url_to_action(logic, binding)
    }

    pub fn bind_actions<A: Action>(
        &self,
        logic: &Logic<A>,
        binding: ActionToUrlBinding<A>,
    ) -> Subscription {
        self.installer.attach_action_to_url(logic, binding)
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.store.unmount();
    }
}
