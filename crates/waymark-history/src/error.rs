//! History error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Browser history call failed: {0}")]
    Browser(String),

    #[error("No window object available")]
    NoWindow,
}
