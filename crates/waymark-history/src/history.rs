//! History handles
//!
//! The router only needs three things from its host: a way to add or
//! overwrite an address-bar entry, a way to read the current location, and a
//! notification when the user moves back or forward.

use std::sync::Arc;

use crate::location::Location;
use crate::memory::MemoryHistory;
use crate::subscription::Subscription;
use crate::Result;

/// Called after a native back/forward traversal.
pub type PopCallback = Arc<dyn Fn() + Send + Sync>;

pub trait History: Send + Sync {
    /// Add a new entry for `url`.
    fn push_state(&self, url: &str) -> Result<()>;

    /// Overwrite the current entry with `url`.
    fn replace_state(&self, url: &str) -> Result<()>;

    /// Register for back/forward notifications.
    ///
    /// Returns `None` when the environment has no such notification.
    fn listen(&self, callback: PopCallback) -> Option<Subscription>;
}

pub trait LocationSource: Send + Sync {
    fn current(&self) -> Location;
}

impl LocationSource for Location {
    fn current(&self) -> Location {
        self.clone()
    }
}

/// Stand-in used when there is no browser: mutations do nothing and no
/// back/forward notification exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHistory;

impl History for NoopHistory {
    fn push_state(&self, url: &str) -> Result<()> {
        tracing::trace!(url = %url, "push_state ignored without a browser");
        Ok(())
    }

    fn replace_state(&self, url: &str) -> Result<()> {
        tracing::trace!(url = %url, "replace_state ignored without a browser");
        Ok(())
    }

    fn listen(&self, _callback: PopCallback) -> Option<Subscription> {
        None
    }
}

/// The history and location handles shared by the store and the bindings.
#[derive(Clone)]
pub struct Environment {
    pub history: Arc<dyn History>,
    pub location: Arc<dyn LocationSource>,
}

impl Environment {
    pub fn new(history: Arc<dyn History>, location: Arc<dyn LocationSource>) -> Self {
        Self { history, location }
    }

    /// No browser: no-op history and an empty location.
    pub fn detached() -> Self {
        Self {
            history: Arc::new(NoopHistory),
            location: Arc::new(Location::default()),
        }
    }

    /// Back both handles with the same in-memory history.
    pub fn memory(history: MemoryHistory) -> Self {
        Self {
            history: Arc::new(history.clone()),
            location: Arc::new(history),
        }
    }

    /// The real browser when one is reachable, otherwise [`Environment::detached`].
    pub fn platform() -> Self {
        #[cfg(all(target_arch = "wasm32", feature = "browser"))]
        {
            if let Some(browser) = crate::browser::BrowserHistory::new() {
                return Self {
                    history: Arc::new(browser),
                    location: Arc::new(browser),
                };
            }
        }

        Self::detached()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::platform()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("location", &self.location.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_environment() {
        let env = Environment::detached();
        assert_eq!(env.location.current(), Location::default());
        assert!(env.history.push_state("/a").is_ok());
        assert!(env.history.listen(Arc::new(|| {})).is_none());
    }

    #[test]
    fn test_memory_environment_shares_state() {
        let memory = MemoryHistory::new("/start");
        let env = Environment::memory(memory);

        env.history.push_state("/next?x=1").unwrap();
        assert_eq!(env.location.current().full_path(), "/next?x=1");
    }
}
