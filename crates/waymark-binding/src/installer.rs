//! Binding installer
//!
//! Attaches a module's route bindings to the location store. Each half is
//! optional and independent; a module with neither costs nothing.

use std::sync::Arc;

use waymark_history::{NavigationEvent, Subscription};
use waymark_store::{Action, LocationStore, Logic};

use crate::action_to_url::ActionToUrlBinding;
use crate::transform::PathTransforms;
use crate::url_to_action::UrlToActionBinding;

#[derive(Debug, Clone)]
pub struct BindingInstaller {
    store: LocationStore,
    transforms: PathTransforms,
}

impl BindingInstaller {
    pub fn new(store: LocationStore, transforms: PathTransforms) -> Self {
        Self { store, transforms }
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn transforms(&self) -> &PathTransforms {
        &self.transforms
    }

    /// Dispatch into `logic` whenever the location matches one of the
    /// binding's routes.
    ///
    /// The current location is replayed once, tagged POP and `initial`,
    /// before this returns, so a module mounted on a deep link sees it.
    pub fn attach_url_to_action<A: Action>(
        &self,
        logic: &Logic<A>,
        binding: UrlToActionBinding<A>,
    ) -> Subscription {
        let routes = binding.len();
        let listener = Arc::new(binding.into_listener(logic.actions(), self.transforms.clone()));

        let on_change = Arc::clone(&listener);
        let subscription = self.store.subscribe(move |event| on_change(event));

        tracing::debug!(logic = %logic.name(), routes, "URL to action binding attached");

        listener(&NavigationEvent::initial(self.store.location()));
        subscription
    }

    /// Push a new entry whenever `logic` dispatches a mapped action whose
    /// target differs from the current path.
    pub fn attach_action_to_url<A: Action>(
        &self,
        logic: &Logic<A>,
        binding: ActionToUrlBinding<A>,
    ) -> Subscription {
        let mappings = binding.len();
        let listener = binding.into_listener(self.store.clone(), self.transforms.clone());
        let subscription = logic.on_action(listener);

        tracing::debug!(logic = %logic.name(), mappings, "Action to URL binding attached");
        subscription
    }

    /// Attach whichever halves are present.
    ///
    /// Returns `None` without touching the store or the module when both
    /// are absent.
    pub fn install<A: Action>(
        &self,
        logic: &Logic<A>,
        url_to_action: Option<UrlToActionBinding<A>>,
        action_to_url: Option<ActionToUrlBinding<A>>,
    ) -> Option<Installation> {
        if url_to_action.is_none() && action_to_url.is_none() {
            return None;
        }

        let mut subscriptions = Vec::with_capacity(2);

        // Action listeners first, so actions dispatched by the initial
        // replay already see them.
        if let Some(binding) = action_to_url {
            subscriptions.push(self.attach_action_to_url(logic, binding));
        }
        if let Some(binding) = url_to_action {
            subscriptions.push(self.attach_url_to_action(logic, binding));
        }

        tracing::info!(logic = %logic.name(), "Router bindings installed");

        Some(Installation {
            logic: logic.name().to_string(),
            subscriptions,
        })
    }
}

/// Listeners installed for one module. Dropping it detaches them all.
#[derive(Debug)]
#[must_use = "dropping an Installation detaches its listeners"]
pub struct Installation {
    logic: String,
    subscriptions: Vec<Subscription>,
}

impl Installation {
    pub fn logic(&self) -> &str {
        &self.logic
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn detach(self) {
        tracing::debug!(logic = %self.logic, "Router bindings detached");
    }
}
