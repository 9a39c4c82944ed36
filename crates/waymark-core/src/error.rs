//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("History error: {0}")]
    History(#[from] waymark_history::HistoryError),

    #[error("Store error: {0}")]
    Store(#[from] waymark_store::StoreError),

    #[error("Binding error: {0}")]
    Binding(#[from] waymark_binding::BindingError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}
