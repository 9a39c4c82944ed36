//! Synchronous event channel
//!
//! Listeners run in registration order, on the emitting thread, before
//! `emit` returns. The listener list is copied out before any listener
//! runs, so a listener may emit again or (un)subscribe without deadlocking.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

use waymark_history::Subscription;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct ChannelState<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

pub struct EventChannel<E> {
    state: Arc<RwLock<ChannelState<E>>>,
}

impl<E: 'static> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ChannelState {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut state = self.state.write();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak = Arc::downgrade(&self.state);
        Subscription::new(move || Self::unsubscribe(&weak, id))
    }

    pub fn emit(&self, event: &E) {
        let listeners: Vec<Listener<E>> = self
            .state
            .read()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.read().listeners.len()
    }

    fn unsubscribe(state: &Weak<RwLock<ChannelState<E>>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state.write().listeners.retain(|(lid, _)| *lid != id);
        }
    }
}

impl<E: 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.state.read().listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_listeners_run_in_order() {
        let channel = EventChannel::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s1 = Arc::clone(&seen);
        let _a = channel.subscribe(move |v| s1.lock().push(("a", *v)));
        let s2 = Arc::clone(&seen);
        let _b = channel.subscribe(move |v| s2.lock().push(("b", *v)));

        channel.emit(&7);
        assert_eq!(*seen.lock(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let channel = EventChannel::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        let sub = channel.subscribe(move |v| s.lock().push(*v));
        channel.emit(&1);
        drop(sub);
        channel.emit(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_reentrant_emit() {
        let channel = EventChannel::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = channel.clone();
        let s = Arc::clone(&seen);
        let _sub = channel.subscribe(move |v| {
            s.lock().push(*v);
            if *v > 0 {
                inner.emit(&(v - 1));
            }
        });

        channel.emit(&2);
        assert_eq!(*seen.lock(), vec![2, 1, 0]);
    }
}
