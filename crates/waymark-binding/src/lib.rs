//! Waymark Binding
//!
//! Wires a feature module's declared routes into live listeners:
//! - URL → action: location changes are matched against an ordered route
//!   table and the first exact match's handler runs
//! - action → URL: mapped actions push a new entry unless the address bar
//!   already shows the target path
//!
//! ```text
//! '/signup/:type'  ──►  |m, actions| actions.dispatch(Signup::Select(..))
//! Signup::Select   ──►  |a| format!("/signup/{}", ..)
//! ```

mod action_to_url;
mod error;
mod installer;
mod pattern;
mod route;
mod transform;
mod url_to_action;

pub use action_to_url::{ActionToUrlBinding, UrlMapper};
pub use error::BindingError;
pub use installer::{BindingInstaller, Installation};
pub use pattern::{Params, RoutePattern};
pub use route::{RouteMatch, RouteTable};
pub use transform::{PathTransform, PathTransforms};
pub use url_to_action::{RouteHandler, UrlToActionBinding};

pub type Result<T> = std::result::Result<T, BindingError>;
