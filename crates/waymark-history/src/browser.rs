//! Browser history backed by `web-sys`
//!
//! JS closures are not `Send`, so popstate handlers live in a thread-local
//! table and the returned [`Subscription`] only carries their key.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Event;

use crate::error::HistoryError;
use crate::history::{History, LocationSource, PopCallback};
use crate::location::Location;
use crate::subscription::Subscription;
use crate::Result;

type PopHandler = Closure<dyn FnMut(Event)>;

thread_local! {
    static POP_HANDLERS: RefCell<HashMap<u64, PopHandler>> = RefCell::new(HashMap::new());
}

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(0);

/// `window.history` and `window.location` of the running page.
#[derive(Debug, Clone, Copy)]
pub struct BrowserHistory {
    _private: (),
}

impl BrowserHistory {
    /// Returns `None` when there is no `window` (e.g. inside a worker).
    pub fn new() -> Option<Self> {
        web_sys::window().map(|_| Self { _private: () })
    }

    fn window() -> Result<web_sys::Window> {
        web_sys::window().ok_or(HistoryError::NoWindow)
    }

    fn history() -> Result<web_sys::History> {
        Self::window()?.history().map_err(js_error)
    }
}

fn js_error(value: JsValue) -> HistoryError {
    HistoryError::Browser(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

fn remove_pop_handler(id: u64) {
    let handler = POP_HANDLERS.with(|handlers| handlers.borrow_mut().remove(&id));
    if let (Some(handler), Some(window)) = (handler, web_sys::window()) {
        if let Err(e) = window
            .remove_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "Failed to remove popstate listener");
        }
    }
}

impl History for BrowserHistory {
    fn push_state(&self, url: &str) -> Result<()> {
        Self::history()?
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(js_error)
    }

    fn replace_state(&self, url: &str) -> Result<()> {
        Self::history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(js_error)
    }

    fn listen(&self, callback: PopCallback) -> Option<Subscription> {
        let window = web_sys::window()?;

        let handler = Closure::wrap(Box::new(move |_event: Event| {
            callback();
        }) as Box<dyn FnMut(_)>);

        if let Err(e) =
            window.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "Failed to add popstate listener");
            return None;
        }

        let id = NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed);
        POP_HANDLERS.with(|handlers| handlers.borrow_mut().insert(id, handler));

        Some(Subscription::new(move || remove_pop_handler(id)))
    }
}

impl LocationSource for BrowserHistory {
    fn current(&self) -> Location {
        let Some(window) = web_sys::window() else {
            return Location::default();
        };
        let location = window.location();

        Location {
            pathname: location.pathname().unwrap_or_default(),
            search: location.search().unwrap_or_default(),
            hash: location.hash().unwrap_or_default(),
        }
    }
}
