//! Location store
//!
//! ```text
//! navigate_push / navigate_replace ──► History::push_state / replace_state
//!                                        │
//! native back/forward ──► POP            ▼
//!                          └──────► location-changed ──► reducer ──► listeners
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use waymark_history::{
    parse_path, Environment, Location, NavigationEvent, NavigationMethod, PopCallback,
    Subscription,
};

use crate::channel::EventChannel;
use crate::error::StoreError;
use crate::Result;

/// Nested location changes allowed before a navigation is treated as a loop.
pub const DEFAULT_MAX_REDIRECT_DEPTH: usize = 16;

/// A request to change the address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    Push(String),
    Replace(String),
}

impl NavigationIntent {
    pub fn method(&self) -> NavigationMethod {
        match self {
            NavigationIntent::Push(_) => NavigationMethod::Push,
            NavigationIntent::Replace(_) => NavigationMethod::Replace,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            NavigationIntent::Push(url) | NavigationIntent::Replace(url) => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub max_redirect_depth: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_redirect_depth: DEFAULT_MAX_REDIRECT_DEPTH,
        }
    }
}

struct StoreInner {
    env: Environment,
    location: RwLock<Location>,
    changes: EventChannel<NavigationEvent>,
    /// Native back/forward listener, present while mounted
    pop_listener: Mutex<Option<Subscription>>,
    mounted: Mutex<bool>,
    /// Location-changed notifications currently running, per thread
    depths: Mutex<HashMap<ThreadId, usize>>,
    options: StoreOptions,
}

/// Single source of truth for the current location.
#[derive(Clone)]
pub struct LocationStore {
    inner: Arc<StoreInner>,
}

/// Nesting depth of location-changed notifications on the calling thread.
///
/// Depth is counted per thread so that navigations on one thread never
/// count towards a loop running on another.
struct DepthGuard<'a> {
    depths: &'a Mutex<HashMap<ThreadId, usize>>,
    thread: ThreadId,
}

impl<'a> DepthGuard<'a> {
    fn enter(depths: &'a Mutex<HashMap<ThreadId, usize>>) -> Self {
        let thread = thread::current().id();
        *depths.lock().entry(thread).or_insert(0) += 1;
        Self { depths, thread }
    }

    fn current(depths: &Mutex<HashMap<ThreadId, usize>>) -> usize {
        depths
            .lock()
            .get(&thread::current().id())
            .copied()
            .unwrap_or(0)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let mut depths = self.depths.lock();
        if let Some(depth) = depths.get_mut(&self.thread) {
            *depth -= 1;
            if *depth == 0 {
                depths.remove(&self.thread);
            }
        }
    }
}

impl LocationStore {
    /// Create a store holding the environment's current location.
    ///
    /// The store does not hear native back/forward navigation until
    /// [`LocationStore::mount`] is called.
    pub fn new(env: Environment, options: StoreOptions) -> Self {
        let location = env.location.current();

        Self {
            inner: Arc::new(StoreInner {
                env,
                location: RwLock::new(location),
                changes: EventChannel::new(),
                pop_listener: Mutex::new(None),
                mounted: Mutex::new(false),
                depths: Mutex::new(HashMap::new()),
                options,
            }),
        }
    }

    pub fn location(&self) -> Location {
        self.inner.location.read().clone()
    }

    pub fn environment(&self) -> &Environment {
        &self.inner.env
    }

    pub fn options(&self) -> StoreOptions {
        self.inner.options
    }

    pub fn dispatch(&self, intent: NavigationIntent) -> Result<()> {
        let depth = DepthGuard::current(&self.inner.depths);
        if depth >= self.inner.options.max_redirect_depth {
            tracing::warn!(
                url = %intent.url(),
                depth,
                "Refusing navigation, location changes are looping"
            );
            return Err(StoreError::RedirectLoop {
                url: intent.url().to_string(),
                depth,
            });
        }

        let history = &self.inner.env.history;
        match &intent {
            NavigationIntent::Push(url) => history.push_state(url)?,
            NavigationIntent::Replace(url) => history.replace_state(url)?,
        }

        tracing::debug!(url = %intent.url(), method = %intent.method(), "Navigating");

        let event = NavigationEvent::new(intent.method(), parse_path(intent.url()));
        self.emit_location_changed(event);
        Ok(())
    }

    pub fn navigate_push(&self, url: impl Into<String>) -> Result<()> {
        self.dispatch(NavigationIntent::Push(url.into()))
    }

    pub fn navigate_replace(&self, url: impl Into<String>) -> Result<()> {
        self.dispatch(NavigationIntent::Replace(url.into()))
    }

    /// Store the event's location, then notify listeners.
    pub fn emit_location_changed(&self, event: NavigationEvent) {
        Self::reduce(&mut self.inner.location.write(), &event);

        let _depth = DepthGuard::enter(&self.inner.depths);
        self.inner.changes.emit(&event);
    }

    fn reduce(state: &mut Location, event: &NavigationEvent) {
        *state = event.location();
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&NavigationEvent) + Send + Sync + 'static,
    {
        self.inner.changes.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.changes.listener_count()
    }

    /// Start listening for native back/forward navigation.
    pub fn mount(&self) {
        let mut mounted = self.inner.mounted.lock();
        if *mounted {
            return;
        }
        *mounted = true;

        let weak = Arc::downgrade(&self.inner);
        let on_pop: PopCallback = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                LocationStore { inner }.handle_pop();
            }
        });

        match self.inner.env.history.listen(on_pop) {
            Some(listener) => {
                *self.inner.pop_listener.lock() = Some(listener);
                tracing::debug!("Location store mounted");
            }
            None => {
                tracing::debug!("Location store mounted without native navigation events");
            }
        }
    }

    /// Stop listening for native back/forward navigation.
    pub fn unmount(&self) {
        let mut mounted = self.inner.mounted.lock();
        if !*mounted {
            return;
        }
        *mounted = false;

        if let Some(listener) = self.inner.pop_listener.lock().take() {
            listener.detach();
        }
        tracing::debug!("Location store unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        *self.inner.mounted.lock()
    }

    fn handle_pop(&self) {
        let location = self.inner.env.location.current();
        tracing::debug!(location = %location, "Native navigation");
        self.emit_location_changed(NavigationEvent::pop(location));
    }
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore")
            .field("location", &self.location())
            .field("mounted", &self.is_mounted())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
