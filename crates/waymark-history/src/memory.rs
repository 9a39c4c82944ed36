//! In-memory history
//!
//! Keeps an entry stack with a cursor, the way a browser tab does. Useful
//! outside the browser and in tests, where `back()` and `forward()` stand in
//! for the user pressing the browser buttons.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

use crate::history::{History, LocationSource, PopCallback};
use crate::location::{parse_path, Location};
use crate::subscription::Subscription;
use crate::Result;

struct MemoryState {
    entries: Vec<Location>,
    index: usize,
    next_listener_id: u64,
    listeners: Vec<(u64, PopCallback)>,
}

#[derive(Clone)]
pub struct MemoryHistory {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                entries: vec![parse_path(initial_path)],
                index: 0,
                next_listener_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Move `delta` entries through the stack, clamped to its ends.
    ///
    /// Listeners are notified only if the cursor actually moved.
    pub fn go(&self, delta: isize) {
        let listeners: Vec<PopCallback> = {
            let mut state = self.state.write();
            let last = state.entries.len() as isize - 1;
            let target = (state.index as isize + delta).clamp(0, last) as usize;
            if target == state.index {
                return;
            }
            state.index = target;
            tracing::debug!(
                index = target,
                location = %state.entries[target],
                "Memory history traversal"
            );
            state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener();
        }
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<Location> {
        self.state.read().entries.clone()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.state.read().index
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.state.read().listeners.len()
    }

    fn remove_listener(state: &Weak<RwLock<MemoryState>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state.write().listeners.retain(|(lid, _)| *lid != id);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn push_state(&self, url: &str) -> Result<()> {
        let mut state = self.state.write();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(parse_path(url));
        state.index = keep;
        Ok(())
    }

    fn replace_state(&self, url: &str) -> Result<()> {
        let mut state = self.state.write();
        let index = state.index;
        state.entries[index] = parse_path(url);
        Ok(())
    }

    fn listen(&self, callback: PopCallback) -> Option<Subscription> {
        let id = {
            let mut state = self.state.write();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push((id, callback));
            id
        };

        let weak = Arc::downgrade(&self.state);
        Some(Subscription::new(move || {
            MemoryHistory::remove_listener(&weak, id)
        }))
    }
}

impl LocationSource for MemoryHistory {
    fn current(&self) -> Location {
        let state = self.state.read();
        state.entries[state.index].clone()
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryHistory")
            .field("entries", &state.entries)
            .field("index", &state.index)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push_state("/a").unwrap();
        history.push_state("/b").unwrap();
        history.back();
        assert_eq!(history.current().pathname, "/a");

        history.push_state("/c").unwrap();
        let paths: Vec<String> = history.entries().into_iter().map(|l| l.pathname).collect();
        assert_eq!(paths, vec!["/", "/a", "/c"]);
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn test_replace_keeps_length() {
        let history = MemoryHistory::new("/signup");
        history.replace_state("/signup/email#top").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().href(), "/signup/email#top");
    }

    #[test]
    fn test_traversal_notifies_listeners() {
        let history = MemoryHistory::new("/");
        history.push_state("/a").unwrap();

        let pops = Arc::new(AtomicUsize::new(0));
        let p = Arc::clone(&pops);
        let sub = history
            .listen(Arc::new(move || {
                p.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        history.back();
        history.back(); // already at the start
        history.forward();
        assert_eq!(pops.load(Ordering::SeqCst), 2);

        drop(sub);
        assert_eq!(history.listener_count(), 0);
        history.back();
        assert_eq!(pops.load(Ordering::SeqCst), 2);
    }
}
