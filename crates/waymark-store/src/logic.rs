//! Feature modules and their actions
//!
//! A `Logic` is one feature module: a name plus a stream of typed actions.
//! Dispatch is synchronous; every listener has run when `dispatch` returns.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use waymark_history::Subscription;

use crate::channel::EventChannel;

/// An action a feature module can dispatch.
///
/// `Kind` identifies the variant without its payload, so route mappings can
/// be keyed by it when they are registered.
pub trait Action: Clone + Send + Sync + 'static {
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

pub struct Logic<A: Action> {
    name: Arc<str>,
    actions: EventChannel<A>,
}

impl<A: Action> Logic<A> {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            actions: EventChannel::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dispatch handle that can be moved into listeners.
    pub fn actions(&self) -> Actions<A> {
        Actions {
            logic: Arc::clone(&self.name),
            channel: self.actions.clone(),
        }
    }

    pub fn dispatch(&self, action: A) {
        self.actions().dispatch(action);
    }

    pub fn on_action<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.actions.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.actions.listener_count()
    }
}

impl<A: Action> Clone for Logic<A> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            actions: self.actions.clone(),
        }
    }
}

impl<A: Action> std::fmt::Debug for Logic<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logic")
            .field("name", &self.name)
            .field("listeners", &self.actions.listener_count())
            .finish()
    }
}

/// Dispatch side of a [`Logic`].
pub struct Actions<A: Action> {
    logic: Arc<str>,
    channel: EventChannel<A>,
}

impl<A: Action> Actions<A> {
    pub fn dispatch(&self, action: A) {
        tracing::trace!(logic = %self.logic, kind = ?action.kind(), "Dispatching action");
        self.channel.emit(&action);
    }
}

impl<A: Action> Clone for Actions<A> {
    fn clone(&self) -> Self {
        Self {
            logic: Arc::clone(&self.logic),
            channel: self.channel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Counter {
        Add(i32),
        Reset,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum CounterKind {
        Add,
        Reset,
    }

    impl Action for Counter {
        type Kind = CounterKind;

        fn kind(&self) -> CounterKind {
            match self {
                Counter::Add(_) => CounterKind::Add,
                Counter::Reset => CounterKind::Reset,
            }
        }
    }

    #[test]
    fn test_dispatch_reaches_listeners() {
        let logic = Logic::<Counter>::new("counter");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        let _sub = logic.on_action(move |a| s.lock().push(a.clone()));

        logic.dispatch(Counter::Add(2));
        logic.actions().dispatch(Counter::Reset);

        assert_eq!(*seen.lock(), vec![Counter::Add(2), Counter::Reset]);
        assert_eq!(Counter::Reset.kind(), CounterKind::Reset);
        assert_eq!(logic.name(), "counter");
    }
}
