//! Waymark Store
//!
//! The location store owns the current address-bar location. Feature
//! modules never write it directly: they request navigation through
//! `NavigationIntent`s or listen for location changes.
//!
//! Also hosts the small action plumbing the bindings attach to:
//! `EventChannel`, `Logic` and the `Action` trait.

mod channel;
mod error;
mod logic;
mod store;

pub use channel::EventChannel;
pub use error::StoreError;
pub use logic::{Action, Actions, Logic};
pub use store::{LocationStore, NavigationIntent, StoreOptions, DEFAULT_MAX_REDIRECT_DEPTH};

pub use waymark_history::Subscription;

pub type Result<T> = std::result::Result<T, StoreError>;
