//! Binding error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
