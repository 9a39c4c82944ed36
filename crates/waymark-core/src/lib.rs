//! Waymark Core
//!
//! Keeps an application's state and the address bar in step.
//! The `Router` is the context shared by the location store and every
//! module's route bindings; create one per application.

mod config;
mod error;
mod router;

pub use config::Config;
pub use error::CoreError;
pub use router::{Router, RouterOptions};

// Re-export the pieces modules are written against
pub use waymark_binding::{
    ActionToUrlBinding, BindingError, BindingInstaller, Installation, Params, PathTransform,
    PathTransforms, RouteMatch, RoutePattern, UrlToActionBinding,
};
pub use waymark_history::{
    parse_path, Environment, History, HistoryError, Location, LocationSource, MemoryHistory,
    NavigationEvent, NavigationMethod, NoopHistory, Subscription,
};
pub use waymark_store::{
    Action, Actions, LocationStore, Logic, NavigationIntent, StoreError, StoreOptions,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
