//! Waymark History
//!
//! Address-bar locations and the handles used to drive them:
//! - `Location` and `parse_path` for the path / query / fragment triple
//! - `NavigationEvent` tagged PUSH, REPLACE or POP
//! - `History` and `LocationSource` seams with in-memory and browser backends

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
mod browser;
mod error;
mod history;
mod location;
mod memory;
mod subscription;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub use browser::BrowserHistory;
pub use error::HistoryError;
pub use history::{Environment, History, LocationSource, NoopHistory, PopCallback};
pub use location::{parse_path, Location, NavigationEvent, NavigationMethod};
pub use memory::MemoryHistory;
pub use subscription::Subscription;

pub type Result<T> = std::result::Result<T, HistoryError>;
